//! `[scan]` section configuration.
//!
//! Controls which files count as pages when navigation is compared
//! against the content tree.
//!
//! # Example
//!
//! ```toml
//! [scan]
//! page_extension = "mdx"
//! exclude = ["node_modules", ".git", "images"]   # directory names, any depth
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extension of page files, without the dot.
    pub page_extension: String,

    /// Directory names never descended into.
    pub exclude: Vec<String>,
}

impl ScanConfig {
    pub const PAGE_EXTENSION: FieldPath = FieldPath::new("scan.page_extension");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.page_extension.is_empty() {
            diag.error(Self::PAGE_EXTENSION, "must not be empty");
        } else if let Some(bare) = self.page_extension.strip_prefix('.') {
            diag.error_with_hint(
                Self::PAGE_EXTENSION,
                format!("`{}` starts with a dot", self.page_extension),
                format!("write `{bare}`"),
            );
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            page_extension: "mdx".into(),
            exclude: [
                "node_modules",
                ".git",
                ".github",
                "api-specs",
                "dictionaries",
                "images",
                "scripts",
                "site-scripts",
                "logo",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_scan_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.scan.page_extension, "mdx");
        assert!(config.scan.exclude.iter().any(|d| d == "site-scripts"));
        assert_eq!(config.scan.exclude.len(), 9);
    }

    #[test]
    fn test_scan_override_replaces_exclude() {
        let config = test_parse_config("[scan]\nexclude = [\"drafts\"]");
        assert_eq!(config.scan.exclude, vec!["drafts"]);
        assert_eq!(config.scan.page_extension, "mdx");
    }

    #[test]
    fn test_dotted_extension_rejected() {
        let config = test_parse_config("[scan]\npage_extension = \".mdx\"");
        let mut diag = ConfigDiagnostics::new();
        config.scan.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
        assert_eq!(diag.errors()[0].hint.as_deref(), Some("write `mdx`"));
    }
}
