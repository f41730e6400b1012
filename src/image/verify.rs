//! Single-file image verification.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::refs::{ImageTarget, extract_image_refs, resolve_image};
use crate::utils::path::relative_display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    External,
    Inline,
    Found,
    Missing,
}

/// One checked reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCheck {
    pub line: usize,
    pub path: String,
    pub status: ImageStatus,
    /// Root-relative location looked up on disk, for local images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
    pub line_content: String,
}

/// Verification result for one document.
///
/// This is also the `--json` wire format between the directory fan-out and
/// the per-file child process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// Root-relative path of the document.
    pub file: String,
    pub checks: Vec<ImageCheck>,
}

impl FileReport {
    pub fn total(&self) -> usize {
        self.checks.len()
    }

    pub fn count(&self, status: ImageStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    pub fn has_images(&self) -> bool {
        !self.checks.is_empty()
    }

    pub fn passed(&self) -> bool {
        self.count(ImageStatus::Missing) == 0
    }

    pub fn with_status(&self, status: ImageStatus) -> impl Iterator<Item = &ImageCheck> {
        self.checks.iter().filter(move |c| c.status == status)
    }
}

/// Read `file` and verify its image references against `root`.
pub fn verify_file(file: &Path, root: &Path) -> Result<FileReport> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    Ok(verify_text(&text, file, root))
}

/// Verify the image references of `text`, a document located at `file`.
pub fn verify_text(text: &str, file: &Path, root: &Path) -> FileReport {
    let doc_dir = file.parent().unwrap_or(root);

    let checks = extract_image_refs(text)
        .into_iter()
        .map(|image| {
            let (status, resolved) = match resolve_image(&image.path, doc_dir, root) {
                ImageTarget::External => (ImageStatus::External, None),
                ImageTarget::Inline => (ImageStatus::Inline, None),
                ImageTarget::Local(path) => {
                    let status = if path.is_file() {
                        ImageStatus::Found
                    } else {
                        ImageStatus::Missing
                    };
                    (status, Some(relative_display(&path, root)))
                }
            };
            ImageCheck {
                line: image.line,
                path: image.path,
                status,
                resolved,
                line_content: image.line_content,
            }
        })
        .collect();

    FileReport {
        file: relative_display(file, root),
        checks,
    }
}
