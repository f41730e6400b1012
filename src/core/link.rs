//! Link classification utilities.

use crate::utils::path::route::is_external_link;

/// Syntactic classification of links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// External link with URL scheme (https://, mailto:, tel:, etc.)
    External(&'a str),
    /// Inline data URI (`data:image/png;base64,...`).
    Inline(&'a str),
    /// Pure fragment/anchor link (#section). Value is anchor without `#`.
    Fragment(&'a str),
    /// Site-root-relative path (/about, /guides/llm).
    SiteRoot(&'a str),
    /// Explicitly file-relative path (./image.png, ../other).
    FileRelative(&'a str),
    /// Bare path without a leading `/` or `./` (guides/llm).
    Bare(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a link string into its syntactic kind.
    #[inline]
    pub fn parse(link: &'a str) -> Self {
        if link.starts_with("data:") {
            Self::Inline(link)
        } else if is_external_link(link) {
            Self::External(link)
        } else if let Some(anchor) = link.strip_prefix('#') {
            Self::Fragment(anchor)
        } else if let Some(anchor) = link.strip_prefix("./#") {
            // ./#fragment is the current page anchor
            Self::Fragment(anchor)
        } else if link.starts_with('/') {
            Self::SiteRoot(link)
        } else if link.starts_with("./") || link.starts_with("../") {
            Self::FileRelative(link)
        } else {
            Self::Bare(link)
        }
    }

    /// Whether the link points into the site tree (root-relative or bare).
    #[inline]
    pub fn is_site_path(&self) -> bool {
        matches!(self, Self::SiteRoot(_) | Self::Bare(_))
    }
}
