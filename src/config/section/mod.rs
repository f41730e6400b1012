//! Configuration section definitions.
//!
//! | Section       | Purpose                                         |
//! |---------------|-------------------------------------------------|
//! | `[project]`   | Manifest location                               |
//! | `[scan]`      | Page files compared against navigation          |
//! | `[redirects]` | Chain resolution bound                          |
//! | `[links]`     | Link rewriting scope and extra mappings         |
//! | `[xref]`      | Cross-reference prefix rewrites                 |
//! | `[images]`    | Image verification fan-out                      |
//! | `[layout]`    | Directory layout used when moving pages         |

mod images;
mod layout;
mod links;
mod project;
mod redirects;
mod scan;

pub use images::ImagesConfig;
pub use layout::{LayoutConfig, title_case};
pub use links::{LinksConfig, XrefConfig};
pub use project::ProjectConfig;
pub use redirects::RedirectsConfig;
pub use scan::ScanConfig;
