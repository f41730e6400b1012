//! `[project]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [project]
//! manifest = "docs.json"      # relative to the site root
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Site manifest holding `navigation` and `redirects`.
    pub manifest: PathBuf,
}

impl ProjectConfig {
    pub const MANIFEST: FieldPath = FieldPath::new("project.manifest");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.manifest.as_os_str().is_empty() {
            diag.error(Self::MANIFEST, "must not be empty");
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("docs.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_project_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.project.manifest, PathBuf::from("docs.json"));
    }

    #[test]
    fn test_empty_manifest_rejected() {
        let config = test_parse_config("[project]\nmanifest = \"\"");
        let mut diag = ConfigDiagnostics::new();
        config.project.validate(&mut diag);
        assert_eq!(diag.errors()[0].field, ProjectConfig::MANIFEST);
    }
}
