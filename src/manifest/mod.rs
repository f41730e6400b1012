//! The site manifest (`docs.json`): navigation tree and redirect list.
//!
//! The document is kept as an ordered JSON object; only `navigation` and
//! `redirects` are interpreted, everything else is written back untouched.

mod diff;
mod nav;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::redirect::RedirectEntry;

pub use diff::{NavDiff, diff, section_of};
pub use nav::{NavLocation, NavNode, Navigation, ShapeError};

/// Errors raised while loading or saving the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected manifest shape at {0}")]
    Shape(#[from] ShapeError),
}

/// A loaded manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    doc: Map<String, Value>,
}

impl Manifest {
    /// Read and parse the manifest, preserving key order.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.is_file() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parse manifest text that belongs to `path`.
    pub fn parse(path: &Path, text: &str) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(text).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        match value {
            Value::Object(doc) => Ok(Self {
                path: path.to_path_buf(),
                doc,
            }),
            _ => Err(shape("$", "expected a JSON object")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The redirect list in file order; empty when absent.
    pub fn redirects(&self) -> Result<Vec<RedirectEntry>, ManifestError> {
        let Some(value) = self.doc.get("redirects") else {
            return Ok(Vec::new());
        };
        let items = value
            .as_array()
            .ok_or_else(|| shape("redirects", "expected a list"))?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value(item.clone())
                    .map_err(|e| shape(format!("redirects[{i}]"), e.to_string()))
            })
            .collect()
    }

    /// Replace the redirect list.
    pub fn set_redirects(&mut self, entries: &[RedirectEntry]) -> Result<(), ManifestError> {
        let value = serde_json::to_value(entries).map_err(|source| ManifestError::Parse {
            path: self.path.clone(),
            source,
        })?;
        self.doc.insert("redirects".to_string(), value);
        Ok(())
    }

    /// The typed navigation tree, or `None` when the manifest has none.
    pub fn navigation(&self) -> Result<Option<Navigation>, ManifestError> {
        self.doc
            .get("navigation")
            .map(Navigation::from_value)
            .transpose()
            .map_err(ManifestError::from)
    }

    pub fn set_navigation(&mut self, navigation: &Navigation) {
        self.doc
            .insert("navigation".to_string(), navigation.to_value());
    }

    /// Render as 2-space pretty JSON with a trailing newline.
    pub fn render(&self) -> Result<String, ManifestError> {
        let mut text =
            serde_json::to_string_pretty(&self.doc).map_err(|source| ManifestError::Parse {
                path: self.path.clone(),
                source,
            })?;
        text.push('\n');
        Ok(text)
    }

    /// Replace the file on disk with the current document.
    pub fn save(&self) -> Result<(), ManifestError> {
        let text = self.render()?;
        fs::write(&self.path, text).map_err(|source| ManifestError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn shape(path: impl Into<String>, reason: impl Into<String>) -> ManifestError {
    ManifestError::Shape(ShapeError {
        path: path.into(),
        reason: reason.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::RedirectRecord;
    use tempfile::TempDir;

    const DOCS: &str = r#"{
  "name": "Docs",
  "navigation": {
    "tabs": [
      {
        "tab": "Général",
        "groups": [
          {
            "group": "Start",
            "pages": [
              "index"
            ]
          }
        ]
      }
    ]
  },
  "redirects": [
    {
      "source": "/a",
      "destination": "/b"
    },
    {
      "source": "/broken"
    }
  ]
}
"#;

    fn write_docs(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("docs.json");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_load_and_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = write_docs(&dir, DOCS);

        let manifest = Manifest::load(&path).unwrap();
        let redirects = manifest.redirects().unwrap();
        assert_eq!(redirects.len(), 2);
        assert!(redirects[1].record().is_none());

        let mut manifest = manifest;
        manifest.set_redirects(&redirects).unwrap();
        let nav = manifest.navigation().unwrap().unwrap();
        manifest.set_navigation(&nav);
        manifest.save().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), DOCS);
    }

    #[test]
    fn test_set_redirects_appends() {
        let dir = TempDir::new().unwrap();
        let path = write_docs(&dir, DOCS);
        let mut manifest = Manifest::load(&path).unwrap();

        let mut redirects = manifest.redirects().unwrap();
        redirects.push(RedirectRecord::new("/c", "/d").into());
        manifest.set_redirects(&redirects).unwrap();

        let text = manifest.render().unwrap();
        assert!(text.contains("\"source\": \"/c\""));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_not_found() {
        let dir = TempDir::new().unwrap();
        let err = Manifest::load(&dir.path().join("docs.json")).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound(_)));
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = write_docs(&dir, "{ not json");
        let err = Manifest::load(&path).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn test_shape_errors() {
        let path = Path::new("docs.json");
        assert!(matches!(
            Manifest::parse(path, "[]").unwrap_err(),
            ManifestError::Shape(_)
        ));

        let manifest = Manifest::parse(path, r#"{"redirects": {}}"#).unwrap();
        assert!(matches!(
            manifest.redirects().unwrap_err(),
            ManifestError::Shape(_)
        ));

        let manifest = Manifest::parse(path, r#"{"navigation": {"tabs": [1]}}"#).unwrap();
        let err = manifest.navigation().unwrap_err();
        assert!(err.to_string().contains("navigation.tabs[0]"));
    }

    #[test]
    fn test_absent_sections() {
        let manifest = Manifest::parse(Path::new("docs.json"), "{}").unwrap();
        assert!(manifest.redirects().unwrap().is_empty());
        assert!(manifest.navigation().unwrap().is_none());
    }
}
