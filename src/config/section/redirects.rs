//! `[redirects]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [redirects]
//! max_depth = 20              # hops followed before a chain is cut off
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::redirect::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectsConfig {
    /// Upper bound on the length of a followed chain.
    pub max_depth: usize,
}

impl RedirectsConfig {
    pub const MAX_DEPTH: FieldPath = FieldPath::new("redirects.max_depth");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.max_depth == 0 {
            diag.error(Self::MAX_DEPTH, "must be at least 1");
        }
    }
}

impl Default for RedirectsConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_redirects_config() {
        assert_eq!(test_parse_config("").redirects.max_depth, 20);
        assert_eq!(
            test_parse_config("[redirects]\nmax_depth = 5").redirects.max_depth,
            5
        );
    }

    #[test]
    fn test_zero_depth_rejected() {
        let config = test_parse_config("[redirects]\nmax_depth = 0");
        let mut diag = ConfigDiagnostics::new();
        config.redirects.validate(&mut diag);
        assert!(!diag.errors().is_empty());
    }
}
