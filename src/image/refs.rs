//! Image reference extraction and resolution.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::core::LinkKind;

/// Per-line image patterns; the last capture group is the path.
static PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        // ![alt](path)
        Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap(),
        // <img src="path">
        Regex::new(r#"(?i)<img[^>]+src=['"]([^'"]+)['"][^>]*>"#).unwrap(),
        // <img src={"path"}>
        Regex::new(r#"(?i)<img[^>]+src=\{['"]([^'"]+)['"]\}[^>]*>"#).unwrap(),
        // image: "path"
        Regex::new(r#"(?i)image:\s*['"]([^'"]+)['"]"#).unwrap(),
    ]
});

/// An image reference found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// 1-based line number.
    pub line: usize,
    pub path: String,
    /// The trimmed source line.
    pub line_content: String,
}

/// Extract image references line by line, in pattern order within a line.
pub fn extract_image_refs(text: &str) -> Vec<ImageRef> {
    let mut refs = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        for pattern in PATTERNS.iter() {
            for caps in pattern.captures_iter(line) {
                let Some(path) = caps.get(caps.len() - 1) else {
                    continue;
                };
                // drop a markdown title: ![a](img.png "title")
                let path = path.as_str().split_whitespace().next().unwrap_or_default();
                if path.is_empty() {
                    continue;
                }
                refs.push(ImageRef {
                    line: idx + 1,
                    path: path.to_string(),
                    line_content: line.trim().to_string(),
                });
            }
        }
    }
    refs
}

/// Where an image reference points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageTarget {
    /// `http`/`https` URL.
    External,
    /// `data:` URI.
    Inline,
    /// A local file, not checked for existence.
    Local(PathBuf),
}

/// Resolve `reference` as written in a document located in `doc_dir`.
///
/// `#fragment` and `?query` are stripped and the rest percent-decoded;
/// `/`-prefixed paths resolve against `root`, all others against `doc_dir`.
pub fn resolve_image(reference: &str, doc_dir: &Path, root: &Path) -> ImageTarget {
    match LinkKind::parse(reference) {
        LinkKind::Inline(_) => return ImageTarget::Inline,
        LinkKind::External(url) if is_web_url(url) => return ImageTarget::External,
        _ => {}
    }

    let clean = reference.split(['#', '?']).next().unwrap_or_default();
    let decoded = percent_decode_str(clean).decode_utf8_lossy();

    match decoded.strip_prefix('/') {
        Some(rel) => ImageTarget::Local(root.join(rel.trim_start_matches('/'))),
        None => ImageTarget::Local(doc_dir.join(decoded.as_ref())),
    }
}

fn is_web_url(link: &str) -> bool {
    url::Url::parse(link).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(text: &str) -> Vec<String> {
        extract_image_refs(text).into_iter().map(|r| r.path).collect()
    }

    #[test]
    fn test_markdown_images() {
        let refs = extract_image_refs("intro\n  ![Diagram](/images/a.png)  \n");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].line, 2);
        assert_eq!(refs[0].path, "/images/a.png");
        assert_eq!(refs[0].line_content, "![Diagram](/images/a.png)");
    }

    #[test]
    fn test_markdown_title_dropped() {
        assert_eq!(paths(r#"![x](img/b.png "Title")"#), vec!["img/b.png"]);
    }

    #[test]
    fn test_html_and_jsx() {
        assert_eq!(
            paths(r#"<img alt="x" src="/a.png" />"#),
            vec!["/a.png"]
        );
        assert_eq!(
            paths(r#"<IMG class='c' src='b.svg'>"#),
            vec!["b.svg"]
        );
        assert_eq!(
            paths(r#"<img width={300} src={"/c.png"} />"#),
            vec!["/c.png"]
        );
    }

    #[test]
    fn test_frontmatter_image() {
        assert_eq!(paths(r#"image: "/og/cover.png""#), vec!["/og/cover.png"]);
        assert_eq!(paths("Image: 'x.png'"), vec!["x.png"]);
    }

    #[test]
    fn test_plain_links_ignored() {
        assert!(paths("[not an image](/a.png)").is_empty());
    }

    #[test]
    fn test_resolve_kinds() {
        let doc = Path::new("/site/guides");
        let root = Path::new("/site");

        assert_eq!(
            resolve_image("https://cdn.io/a.png", doc, root),
            ImageTarget::External
        );
        assert_eq!(
            resolve_image("data:image/png;base64,AAA", doc, root),
            ImageTarget::Inline
        );
        assert_eq!(
            resolve_image("/images/a.png?v=2", doc, root),
            ImageTarget::Local(PathBuf::from("/site/images/a.png"))
        );
        assert_eq!(
            resolve_image("img/my%20pic.png#frag", doc, root),
            ImageTarget::Local(PathBuf::from("/site/guides/img/my pic.png"))
        );
    }
}
