//! `[images]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [images]
//! extensions = ["md", "mdx", "rst", "txt"]
//! workers = 4                 # concurrent per-file checks
//! timeout = 30                # seconds allowed per file
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Document extensions checked in directory mode.
    pub extensions: Vec<String>,

    /// Size of the worker pool.
    pub workers: usize,

    /// Per-file timeout in seconds.
    pub timeout: u64,
}

impl ImagesConfig {
    pub const EXTENSIONS: FieldPath = FieldPath::new("images.extensions");
    pub const WORKERS: FieldPath = FieldPath::new("images.workers");
    pub const TIMEOUT: FieldPath = FieldPath::new("images.timeout");

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.workers == 0 {
            diag.error(Self::WORKERS, "must be at least 1");
        }
        if self.timeout == 0 {
            diag.error(Self::TIMEOUT, "must be at least 1 second");
        }
        if self.extensions.is_empty() {
            diag.error(Self::EXTENSIONS, "must list at least one extension");
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            extensions: ["md", "mdx", "rst", "txt"].map(String::from).to_vec(),
            workers: 4,
            timeout: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_images_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.images.workers, 4);
        assert_eq!(config.images.timeout(), Duration::from_secs(30));
        assert_eq!(config.images.extensions.len(), 4);
    }

    #[test]
    fn test_images_validation() {
        let config = test_parse_config("[images]\nworkers = 0\ntimeout = 0");
        let mut diag = ConfigDiagnostics::new();
        config.images.validate(&mut diag);
        let fields: Vec<_> = diag.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![ImagesConfig::WORKERS, ImagesConfig::TIMEOUT]);
    }
}
