//! Config field path used in diagnostics.

use crate::logger::paint_err;
use owo_colors::Style;
use std::fmt;

/// Dotted path of a config field, e.g. `images.workers`.
///
/// Sections expose their fields as associated constants so validation
/// messages always name the key exactly as it appears in `docsweep.toml`:
///
/// ```ignore
/// impl ImagesConfig {
///     pub const WORKERS: FieldPath = FieldPath::new("images.workers");
/// }
///
/// diag.error(ImagesConfig::WORKERS, "must be at least 1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", paint_err(format_args!("`{}`", self.0), Style::new().bright_blue()))
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}
