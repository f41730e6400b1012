//! Canonical lookup keys for document links.

use crate::core::LinkKind;
use crate::utils::path::route::{split_path_fragment, strip_page_extension};

/// A site link split into its lookup path and fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkKey<'a> {
    /// Root-relative path, always starting with `/`.
    pub path: String,
    /// Fragment without `#`, if the link had one.
    pub fragment: Option<&'a str>,
}

impl LinkKey<'_> {
    /// Re-attach the fragment to a replacement URL.
    pub fn with_fragment(&self, url: &str) -> String {
        match self.fragment {
            Some(fragment) => format!("{url}#{fragment}"),
            None => url.to_string(),
        }
    }
}

/// Normalize a raw link for table lookup.
///
/// External links, data URIs, fragment-only links and explicit
/// `./`/`../` links have no key. Bare paths get a leading `/`.
///
/// # Examples
/// ```ignore
/// let key = normalize("guides/llm/#setup").unwrap();
/// assert_eq!(key.path, "/guides/llm/");
/// assert_eq!(key.fragment, Some("setup"));
/// ```
pub fn normalize(url: &str) -> Option<LinkKey<'_>> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let kind = LinkKind::parse(url);
    if !kind.is_site_path() {
        return None;
    }

    let (path, fragment) = split_path_fragment(url);
    let fragment = url.contains('#').then_some(fragment);
    if path.is_empty() {
        return None;
    }

    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    Some(LinkKey { path, fragment })
}

/// Candidate keys in lookup order: exact, extension-stripped,
/// trailing-slash-stripped, both. Duplicates are dropped and a lone `/` is
/// never stripped.
pub fn lookup_candidates(path: &str) -> Vec<String> {
    let stripped_ext = strip_page_extension(path);
    let stripped_slash = strip_trailing_slash(path);
    let stripped_both = strip_page_extension(strip_trailing_slash(path));

    let mut candidates: Vec<String> = Vec::with_capacity(4);
    for candidate in [path, stripped_ext, stripped_slash, stripped_both] {
        if !candidate.is_empty() && !candidates.iter().any(|c| c == candidate) {
            candidates.push(candidate.to_string());
        }
    }
    candidates
}

fn strip_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}
