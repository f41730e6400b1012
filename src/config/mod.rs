//! Configuration management for `docsweep.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # One file per `[section]`
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # SweepConfig (this file)
//! ```
//!
//! The file is optional. It is searched upward from the working directory;
//! when none is found every section takes its defaults. Command-line flags
//! override file values, and the merged result is validated as a whole.

pub mod section;
pub mod types;
mod util;

use util::{expand_tilde, find_config_file};

pub use section::title_case;
pub use types::{ConfigDiagnostics, FieldPath};

use section::{
    ImagesConfig, LayoutConfig, LinksConfig, ProjectConfig, RedirectsConfig, ScanConfig,
    XrefConfig,
};
use types::ConfigError;

use crate::{
    cli::{Cli, Commands, ImagesArgs},
    log,
    utils::path::{normalize_path, relative_display, resolve_path},
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file name searched for when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "docsweep.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing docsweep.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Absolute path of the loaded config file, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Site root (internal use only)
    #[serde(skip)]
    root: PathBuf,

    /// Absolute manifest path after CLI overrides (internal use only)
    #[serde(skip)]
    manifest_path: PathBuf,

    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub redirects: RedirectsConfig,

    #[serde(default)]
    pub links: LinksConfig,

    #[serde(default)]
    pub xref: XrefConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    #[serde(default)]
    pub layout: LayoutConfig,
}

impl SweepConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// The site root is `--root`, else the directory holding the config
    /// file, else the working directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = Self::resolve_config_path(cli)?;

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        config.config_path = config_path;
        config.finalize(cli);
        config.validate()?;

        Ok(config)
    }

    /// Locate the config file; a missing non-default `--config` is an error.
    fn resolve_config_path(cli: &Cli) -> Result<Option<PathBuf>> {
        let requested = expand_tilde(&cli.config);
        match find_config_file(&requested) {
            Some(path) => Ok(Some(normalize_path(&path))),
            None if cli.config == Path::new(DEFAULT_CONFIG) => Ok(None),
            None => Err(ConfigError::NotFound(cli.config.clone()).into()),
        }
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Site root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the manifest.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Root-relative, `/`-separated rendering of `path`.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> String {
        relative_display(path.as_ref(), &self.root)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Resolve root and manifest, then apply command-specific overrides.
    fn finalize(&mut self, cli: &Cli) {
        let root = match &cli.root {
            Some(root) => expand_tilde(root),
            None => self
                .config_path
                .as_deref()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
                .or_else(|| std::env::current_dir().ok())
                .unwrap_or_default(),
        };
        self.set_root(&root);

        self.manifest_path = match &cli.manifest {
            Some(manifest) => resolve_path(&expand_tilde(manifest), &self.root),
            None => normalize_path(&self.root.join(expand_tilde(&self.project.manifest))),
        };

        self.apply_command_options(cli);
    }

    fn set_root(&mut self, path: &Path) {
        self.root = normalize_path(path);
    }

    fn apply_command_options(&mut self, cli: &Cli) {
        if let Commands::Images { args } = &cli.command {
            self.apply_images_args(args);
        }
    }

    fn apply_images_args(&mut self, args: &ImagesArgs) {
        Self::update_option(&mut self.images.workers, args.workers.as_ref());
        Self::update_option(&mut self.images.timeout, args.timeout.as_ref());
        Self::update_option(&mut self.images.extensions, args.extensions.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section, reporting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.project.validate(&mut diag);
        self.scan.validate(&mut diag);
        self.redirects.validate(&mut diag);
        self.links.validate(&mut diag);
        self.xref.validate(&mut diag);
        self.images.validate(&mut diag);
        self.layout.validate(&mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config from TOML, panicking on unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SweepConfig {
    let (parsed, ignored) = SweepConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Default config rooted at `root`, with the manifest at `<root>/docs.json`.
#[cfg(test)]
impl SweepConfig {
    pub fn for_root(root: &Path) -> Self {
        let mut config = Self::default();
        config.set_root(root);
        config.manifest_path = config.root.join(&config.project.manifest);
        config
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("docsweep").chain(args.iter().copied()))
    }

    #[test]
    fn test_invalid_toml() {
        assert!(SweepConfig::parse_with_ignored("[scan\npage_extension = \"mdx\"").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = SweepConfig::default();
        assert!(config.config_path.is_none());
        assert_eq!(config.project.manifest, PathBuf::from("docs.json"));
        assert_eq!(config.redirects.max_depth, 20);
        assert_eq!(config.images.workers, 4);
        assert_eq!(config.images.timeout, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[scan]\npage_extension = \"md\"\ntypo = 1\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SweepConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.scan.page_extension, "md");
        assert!(ignored.iter().any(|f| f == "scan.typo"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let (_, ignored) =
            SweepConfig::parse_with_ignored("[redirects]\nmax_depth = 3\n[images]\nworkers = 2")
                .unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let config = test_parse_config(
            "[redirects]\nmax_depth = 0\n[images]\nworkers = 0\n[scan]\npage_extension = \"\"",
        );
        let err = config.validate().unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err}");
        };
        assert_eq!(diag.errors().len(), 3);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sweep.toml");
        fs::write(&path, "[project]\nmanifest = \"site.json\"\n[images]\nworkers = 2").unwrap();

        let config = SweepConfig::load(&cli(&["-C", path.to_str().unwrap(), "validate"])).unwrap();
        assert_eq!(config.root(), normalize_path(dir.path()));
        assert_eq!(config.manifest_path(), config.root().join("site.json"));
        assert_eq!(config.images.workers, 2);
    }

    #[test]
    fn test_cli_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sweep.toml");
        fs::write(&path, "[images]\nworkers = 2\ntimeout = 10").unwrap();
        let other_root = TempDir::new().unwrap();
        let root = other_root.path().to_str().unwrap();

        let config = SweepConfig::load(&cli(&[
            "-C",
            path.to_str().unwrap(),
            "--root",
            root,
            "images",
            "guides",
            "--workers",
            "8",
            "--extensions",
            "md,mdx",
        ]))
        .unwrap();

        assert_eq!(config.root(), normalize_path(other_root.path()));
        assert_eq!(config.images.workers, 8);
        assert_eq!(config.images.timeout, 10);
        assert_eq!(config.images.extensions, vec!["md", "mdx"]);
    }

    #[test]
    fn test_cli_override_is_validated() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();
        let path = dir.path().join("sweep.toml");
        fs::write(&path, "").unwrap();

        let result = SweepConfig::load(&cli(&[
            "-C",
            path.to_str().unwrap(),
            "--root",
            root,
            "images",
            "a.md",
            "--workers",
            "0",
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let err = SweepConfig::load(&cli(&["-C", "/nonexistent/sweep.toml", "validate"]))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NotFound(_))
        ));
    }
}
