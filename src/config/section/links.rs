//! `[links]` and `[xref]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [links]
//! extensions = ["md", "mdx"]
//! exclude = [".git", "node_modules", ".next", "dist", "build"]
//!
//! [links.extra]               # merged after the manifest redirects
//! "/products/sce" = "/container-engine/explanation/overview"
//!
//! [xref.prefixes]             # old prefix → new prefix
//! "/guides/llm/" = "/container-engine/how-to-guides/llm/"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Link rewriting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Extensions of documents whose links are rewritten.
    pub extensions: Vec<String>,

    /// Directory names never descended into.
    pub exclude: Vec<String>,

    /// Mappings applied on top of the manifest's redirects.
    pub extra: BTreeMap<String, String>,
}

impl LinksConfig {
    pub const EXTENSIONS: FieldPath = FieldPath::new("links.extensions");
    pub const EXTRA: FieldPath = FieldPath::new("links.extra");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extensions.is_empty() {
            diag.error(Self::EXTENSIONS, "must list at least one extension");
        }
        if self.extra.keys().any(|k| k.trim().is_empty()) {
            diag.error(Self::EXTRA, "source paths must not be empty");
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["md".into(), "mdx".into()],
            exclude: [".git", "node_modules", ".next", "dist", "build"]
                .map(String::from)
                .to_vec(),
            extra: BTreeMap::new(),
        }
    }
}

/// Cross-reference prefix rewrites.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XrefConfig {
    pub prefixes: BTreeMap<String, String>,
}

impl XrefConfig {
    pub const PREFIXES: FieldPath = FieldPath::new("xref.prefixes");

    /// Prefix pairs as owned `(old, new)` tuples.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.prefixes
            .iter()
            .map(|(old, new)| (old.clone(), new.clone()))
            .collect()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.prefixes.keys().any(String::is_empty) {
            diag.error_with_hint(
                Self::PREFIXES,
                "an empty prefix matches every link",
                "remove the `\"\"` key",
            );
        }
        for (old, new) in &self.prefixes {
            if old == new && !old.is_empty() {
                diag.warn(Self::PREFIXES, format!("`{old}` maps to itself"));
            }
        }
    }
}
