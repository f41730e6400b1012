//! Navigation cleanup command.

use anyhow::Result;

use super::common::{load_manifest, require_navigation};
use crate::config::SweepConfig;
use crate::log;
use crate::utils::plural_count;

/// Drop empty groups (at any depth) and then empty tabs.
pub fn clean_navigation(config: &SweepConfig, dry_run: bool) -> Result<()> {
    let mut manifest = load_manifest(config)?;
    let nav = require_navigation(&manifest)?;

    let (cleaned, stats) = nav.pruned();
    if stats.is_empty() {
        log!("clean"; "no empty groups or tabs");
        return Ok(());
    }

    log!(
        "clean";
        "{} and {} empty",
        plural_count(stats.groups_removed, "group"),
        plural_count(stats.tabs_removed, "tab")
    );

    if dry_run {
        log!("dry-run"; "{} not written", config.root_relative(manifest.path()));
        return Ok(());
    }

    manifest.set_navigation(&cleaned);
    manifest.save()?;
    log!("done"; "updated {}", config.root_relative(manifest.path()));
    Ok(())
}
