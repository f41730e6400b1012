//! URL processing utilities.
//!
//! Provides consistent URL handling across the codebase:
//! - Link type detection (external vs internal)
//! - Fragment splitting
//! - Page path <-> site URL conversion

/// Strip leading slash from a URL path
///
/// # Examples
/// ```ignore
/// assert_eq!(strip_leading_slash("/blog/post"), "blog/post");
/// assert_eq!(strip_leading_slash("blog/post"), "blog/post");
/// assert_eq!(strip_leading_slash("/"), "");
/// ```
#[inline]
pub fn strip_leading_slash(url: &str) -> &str {
    url.trim_start_matches('/')
}

/// Check if a link is external (has a URL scheme like http:, mailto:, etc.)
///
/// A valid scheme must:
/// - Have at least 1 character before the colon
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
///
/// # Examples
/// ```ignore
/// assert!(is_external_link("https://example.com"));
/// assert!(is_external_link("mailto:user@example.com"));
/// assert!(!is_external_link("/about"));
/// assert!(!is_external_link("./file.txt"));
/// ```
#[inline]
pub fn is_external_link(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Split a URL into path and fragment parts
///
/// # Returns
/// A tuple of (path, fragment) where fragment is empty string if no `#` found
///
/// # Examples
/// ```ignore
/// assert_eq!(split_path_fragment("/about#team"), ("/about", "team"));
/// assert_eq!(split_path_fragment("/about"), ("/about", ""));
/// ```
#[inline]
pub fn split_path_fragment(url: &str) -> (&str, &str) {
    url.split_once('#').unwrap_or((url, ""))
}

/// Site URL of a page file path: `a/b.mdx` -> `/a/b`
///
/// Only a trailing `.md`/`.mdx` is removed.
pub fn page_url(page_path: &str) -> String {
    let trimmed = strip_leading_slash(page_path);
    let stem = strip_page_extension(trimmed);
    format!("/{stem}")
}

/// Remove a trailing `.mdx` or `.md` extension.
#[inline]
pub fn strip_page_extension(path: &str) -> &str {
    path.strip_suffix(".mdx")
        .or_else(|| path.strip_suffix(".md"))
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_leading_slash() {
        assert_eq!(strip_leading_slash("/blog/post"), "blog/post");
        assert_eq!(strip_leading_slash("blog/post"), "blog/post");
        assert_eq!(strip_leading_slash("/"), "");
        assert_eq!(strip_leading_slash(""), "");
    }

    #[test]
    fn test_is_external_link() {
        assert!(is_external_link("https://example.com"));
        assert!(is_external_link("http://example.com"));
        assert!(is_external_link("mailto:user@example.com"));
        assert!(is_external_link("tel:+1234567890"));
        assert!(!is_external_link("/about"));
        assert!(!is_external_link("./file.txt"));
        assert!(!is_external_link("#section"));
    }

    #[test]
    fn test_split_path_fragment() {
        assert_eq!(split_path_fragment("/about#team"), ("/about", "team"));
        assert_eq!(split_path_fragment("/about"), ("/about", ""));
        assert_eq!(split_path_fragment("#section"), ("", "section"));
    }

    #[test]
    fn test_page_url() {
        assert_eq!(page_url("guides/llm/intro.mdx"), "/guides/llm/intro");
        assert_eq!(page_url("/guides/readme.md"), "/guides/readme");
        assert_eq!(page_url("guides/plain"), "/guides/plain");
    }

    #[test]
    fn test_strip_page_extension() {
        assert_eq!(strip_page_extension("a/b.mdx"), "a/b");
        assert_eq!(strip_page_extension("a/b.md"), "a/b");
        assert_eq!(strip_page_extension("a/b.png"), "a/b.png");
    }
}
