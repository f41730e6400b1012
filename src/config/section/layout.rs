//! `[layout]` section configuration.
//!
//! Describes how the site is organised: `<product>/<category>/...`, with
//! images kept under `<product>/<images_dir>/`. Used by `move` to decide
//! where a page's images go and which navigation tab and group it joins.
//!
//! # Example
//!
//! ```toml
//! [layout]
//! images_dir = "images"
//!
//! [layout.products]           # first path component → tab label
//! container-engine = "Container Engine"
//!
//! [layout.categories]         # second path component → group label
//! how-to-guides = "How-to Guides"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub images_dir: String,
    pub products: BTreeMap<String, String>,
    pub categories: BTreeMap<String, String>,
}

impl LayoutConfig {
    pub const IMAGES_DIR: FieldPath = FieldPath::new("layout.images_dir");

    /// Tab label for a product directory.
    pub fn product_label(&self, dir: &str) -> String {
        self.products
            .get(dir)
            .cloned()
            .unwrap_or_else(|| title_case(dir))
    }

    /// Group label for a category directory.
    pub fn category_label(&self, dir: &str) -> String {
        self.categories
            .get(dir)
            .cloned()
            .unwrap_or_else(|| title_case(dir))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.images_dir.trim_matches('/').is_empty() {
            diag.error(Self::IMAGES_DIR, "must name a directory");
        } else if self.images_dir.contains('/') {
            diag.error(Self::IMAGES_DIR, "must be a single directory name");
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let pairs = |items: &[(&str, &str)]| {
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };
        Self {
            images_dir: "images".into(),
            products: pairs(&[
                ("general", "General"),
                ("container-engine", "Container Engine"),
                ("transcription", "Transcription"),
                ("gateway-service", "Gateway Service"),
                ("storage", "Storage"),
            ]),
            categories: pairs(&[
                ("tutorials", "Tutorials"),
                ("how-to-guides", "How-to Guides"),
                ("explanation", "Explanation"),
                ("reference", "Reference"),
            ]),
        }
    }
}

/// `getting-started` → `Getting Started`.
pub fn title_case(name: &str) -> String {
    name.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
