//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `resolve_path`)
//! - [`route`]: URL utilities (`is_external_link`, `split_path_fragment`, `page_url`)

pub mod fs;
pub mod route;

// Re-export commonly used functions from fs (used in many places)
pub use fs::{normalize_path, relative_display, resolve_path};
