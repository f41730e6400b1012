//! docsweep - maintenance toolkit for docs.json documentation sites.

mod cli;
mod config;
mod content;
mod core;
mod image;
mod link;
mod logger;
mod manifest;
mod redirect;
mod report;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SweepConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SweepConfig::load(&cli)?;

    match &cli.command {
        Commands::Validate { warn_only } => cli::validate::validate_navigation(&config, *warn_only),
        Commands::Analyze => cli::analyze::analyze_navigation(&config),
        Commands::CleanNav { write } => cli::clean::clean_navigation(&config, write.dry_run),
        Commands::Dedupe { write } => cli::redirects::dedupe_redirects(&config, write.dry_run),
        Commands::Resolve { args } => cli::redirects::resolve_redirects(&config, *args),
        Commands::Links { dir, write } => {
            cli::links::update_links(&config, dir.as_deref(), write.dry_run)
        }
        Commands::Xref { dir, write } => {
            cli::links::fix_cross_references(&config, dir.as_deref(), write.dry_run)
        }
        Commands::Images { args } => cli::images::verify_images(&config, args),
        Commands::Move { src, dest, no_git } => {
            cli::move_page::move_page(&config, src, dest, *no_git)
        }
    }
}
