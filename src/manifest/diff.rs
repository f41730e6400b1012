//! Navigation ⇄ page file comparison.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Mismatches between navigation entries and page files.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NavDiff {
    /// Navigation entries with no page file on disk, sorted.
    pub missing: Vec<String>,
    /// Page files not referenced by navigation, sorted.
    pub orphaned: Vec<String>,
}

impl NavDiff {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.orphaned.is_empty()
    }

    /// Missing entries keyed by their first path component.
    pub fn missing_by_section(&self) -> BTreeMap<&str, Vec<&str>> {
        by_section(&self.missing)
    }

    /// Orphaned pages keyed by their first path component (`root` for
    /// pages at the top level).
    pub fn orphaned_by_section(&self) -> BTreeMap<&str, Vec<&str>> {
        by_section(&self.orphaned)
    }
}

/// First path component, or `root` for top-level pages.
pub fn section_of(page: &str) -> &str {
    page.split_once('/').map_or("root", |(first, _)| first)
}

fn by_section(pages: &[String]) -> BTreeMap<&str, Vec<&str>> {
    let mut sections: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for page in pages {
        sections.entry(section_of(page)).or_default().push(page);
    }
    sections
}

/// Compare navigation pages against page ids found on disk.
///
/// A navigation entry is missing when `<root>/<entry>.<extension>` does not
/// exist. `page_ids` are root-relative, `/`-separated and extension-stripped.
pub fn diff(
    nav_pages: &BTreeSet<String>,
    page_ids: &BTreeSet<String>,
    root: &Path,
    extension: &str,
) -> NavDiff {
    let missing = nav_pages
        .iter()
        .filter(|page| !root.join(format!("{page}.{extension}")).is_file())
        .cloned()
        .collect();

    let orphaned = page_ids
        .iter()
        .filter(|id| !nav_pages.contains(*id))
        .cloned()
        .collect();

    NavDiff { missing, orphaned }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_diff_against_tree() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("guides/llm")).unwrap();
        fs::write(dir.path().join("guides/llm/intro.mdx"), "").unwrap();
        fs::write(dir.path().join("guides/extra.mdx"), "").unwrap();

        let nav = set(&["guides/llm/intro", "guides/gone", "index"]);
        let ids = set(&["guides/llm/intro", "guides/extra"]);
        let result = diff(&nav, &ids, dir.path(), "mdx");

        assert_eq!(result.missing, vec!["guides/gone", "index"]);
        assert_eq!(result.orphaned, vec!["guides/extra"]);
        assert!(!result.is_clean());
    }

    #[test]
    fn test_clean_diff() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.mdx"), "").unwrap();
        let result = diff(&set(&["index"]), &set(&["index"]), dir.path(), "mdx");
        assert!(result.is_clean());
    }

    #[test]
    fn test_by_section() {
        let result = NavDiff {
            missing: vec!["a/x".into(), "a/y".into(), "b/z".into()],
            orphaned: vec!["top".into()],
        };
        let missing = result.missing_by_section();
        assert_eq!(missing["a"], vec!["a/x", "a/y"]);
        assert_eq!(missing["b"], vec!["b/z"]);
        assert_eq!(result.orphaned_by_section()["root"], vec!["top"]);
    }
}
