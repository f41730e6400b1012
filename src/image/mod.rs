//! Image reference verification.
//!
//! - `refs`: per-line extraction and path resolution
//! - `verify`: single-document check producing a [`FileReport`]
//! - `pool`: bounded fan-out used by directory mode

mod pool;
mod refs;
mod verify;

pub use pool::run_pool;
pub use refs::{ImageTarget, extract_image_refs, resolve_image};
pub use verify::{FileReport, ImageCheck, ImageStatus, verify_file};
