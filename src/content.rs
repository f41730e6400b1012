//! Content tree scanning.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use crate::utils::path::relative_display;

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Recursively collect files under `dir` whose extension is in `extensions`.
///
/// Directories named in `exclude` are not descended into, at any depth.
/// The result is sorted.
pub fn collect_files(dir: &Path, extensions: &[String], exclude: &[String]) -> Vec<PathBuf> {
    let exclude = exclude.to_vec();
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .process_read_dir(move |_depth, _path, _state, children| {
            children.retain(|entry| {
                entry.as_ref().is_ok_and(|e| {
                    !(e.file_type().is_dir()
                        && e.file_name
                            .to_str()
                            .is_some_and(|name| exclude.iter().any(|x| x == name)))
                })
            });
        })
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.path())
        .filter(|path| has_extension(path, extensions))
        .collect();

    files.sort();
    files
}

/// Whether `path` has one of `extensions` (without dot, case-insensitive).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Page id of a file: root-relative, `/`-separated, extension stripped.
pub fn page_id(path: &Path, root: &Path) -> String {
    relative_display(&path.with_extension(""), root)
}

/// Page ids of every page file under `root`.
pub fn page_ids(root: &Path, extension: &str, exclude: &[String]) -> BTreeSet<String> {
    collect_files(root, &[extension.to_string()], exclude)
        .iter()
        .map(|path| page_id(path, root))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_collect_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "b.mdx");
        touch(root, "a/page.md");
        touch(root, "a/image.png");
        touch(root, "node_modules/pkg/readme.md");
        touch(root, "deep/images/diagram.mdx");

        let files = collect_files(
            root,
            &strings(&["md", "mdx"]),
            &strings(&["node_modules", "images"]),
        );
        let rel: Vec<_> = files.iter().map(|p| relative_display(p, root)).collect();
        assert_eq!(rel, vec!["a/page.md", "b.mdx"]);
    }

    #[test]
    fn test_page_ids() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "guides/llm/intro.mdx");
        touch(root, "index.mdx");
        touch(root, "scripts/tool.mdx");

        let ids = page_ids(root, "mdx", &strings(&["scripts"]));
        assert_eq!(
            ids.into_iter().collect::<Vec<_>>(),
            vec!["guides/llm/intro", "index"]
        );
    }

    #[test]
    fn test_has_extension() {
        let exts = strings(&["md", "MDX"]);
        assert!(has_extension(Path::new("a/b.md"), &exts));
        assert!(has_extension(Path::new("a/b.mdx"), &exts));
        assert!(!has_extension(Path::new("a/b.txt"), &exts));
        assert!(!has_extension(Path::new("a/md"), &exts));
    }
}
