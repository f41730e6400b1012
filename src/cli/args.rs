//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG;

/// Maintenance toolkit for docs.json documentation sites
#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Print version
    #[arg(long, action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the working directory
    #[arg(short = 'C', long, global = true, default_value = DEFAULT_CONFIG, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Site root (default: directory of the config file, else the working directory)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Manifest path (default: `project.manifest`, `docs.json`)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub manifest: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check that navigation entries and page files match one to one
    #[command(visible_alias = "v")]
    Validate {
        /// Report mismatches without failing
        #[arg(long, short = 'w')]
        warn_only: bool,
    },

    /// Break navigation mismatches down by top-level section
    #[command(visible_alias = "a")]
    Analyze,

    /// Drop empty navigation groups and tabs
    #[command(visible_alias = "c")]
    CleanNav {
        #[command(flatten)]
        write: WriteArgs,
    },

    /// Remove duplicate redirect sources, keeping the last occurrence
    #[command(visible_alias = "d")]
    Dedupe {
        #[command(flatten)]
        write: WriteArgs,
    },

    /// Point every redirect at the end of its chain
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },

    /// Rewrite document links that point at redirected URLs
    #[command(visible_alias = "l")]
    Links {
        /// Directory to scan (default: site root)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Rewrite cross-reference prefixes from `[xref.prefixes]`
    #[command(visible_alias = "x")]
    Xref {
        /// Directory to scan (default: site root)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Verify image references of a file or every document under a directory
    #[command(visible_alias = "i")]
    Images {
        #[command(flatten)]
        args: ImagesArgs,
    },

    /// Move a page with its images, navigation entry and a redirect
    #[command(visible_alias = "m")]
    Move {
        /// Current page path, relative to the site root
        #[arg(value_hint = clap::ValueHint::FilePath)]
        src: PathBuf,

        /// New page path, relative to the site root (`.mdx` appended if missing)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        dest: PathBuf,

        /// Use a plain rename even inside a git repository
        #[arg(long)]
        no_git: bool,
    },
}

/// Shared flag of commands that write files.
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct WriteArgs {
    /// Report what would change without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Resolve command arguments.
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct ResolveArgs {
    /// Only report chains; exit non-zero if any exist
    #[arg(long, conflicts_with = "dry_run")]
    pub check: bool,

    /// Remove duplicate sources before resolving
    #[arg(long)]
    pub dedupe: bool,

    #[command(flatten)]
    pub write: WriteArgs,
}

/// Images command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ImagesArgs {
    /// Document or directory to check
    #[arg(value_hint = clap::ValueHint::AnyPath)]
    pub path: PathBuf,

    /// Concurrent per-file checks in directory mode
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Seconds allowed per file in directory mode
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Document extensions checked in directory mode (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// List files whose images all resolved
    #[arg(short = 's', long)]
    pub show_success: bool,

    /// List files without image references
    #[arg(long)]
    pub show_no_images: bool,

    /// Print the machine-readable report of a single file
    #[arg(long)]
    pub json: bool,
}
