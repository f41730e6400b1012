//! Document link commands: `links` and `xref`.

use std::path::Path;

use anyhow::Result;

use super::common::{load_manifest, print_summary, rewrite_files, target_dir};
use crate::config::SweepConfig;
use crate::content::collect_files;
use crate::link::{rewrite_links, rewrite_prefixes};
use crate::log;
use crate::redirect::RedirectTable;
use crate::utils::plural_count;

/// Rewrite links that point at redirect sources.
pub fn update_links(config: &SweepConfig, dir: Option<&Path>, dry_run: bool) -> Result<()> {
    let dir = target_dir(dir, config)?;
    let table = build_table(config)?;
    if table.is_empty() {
        log!("links"; "no redirects to apply");
        return Ok(());
    }

    let files = collect_files(&dir, &config.links.extensions, &config.links.exclude);
    log!(
        "links";
        "{} against {}",
        plural_count(files.len(), "file"),
        plural_count(table.len(), "redirect")
    );

    let max_depth = config.redirects.max_depth;
    let summary = rewrite_files("links", &files, config, dry_run, |text| {
        rewrite_links(text, &table, max_depth)
    });
    print_summary("links", &summary, dry_run);
    Ok(())
}

/// Replace configured path prefixes in every link.
pub fn fix_cross_references(config: &SweepConfig, dir: Option<&Path>, dry_run: bool) -> Result<()> {
    let prefixes = config.xref.pairs();
    if prefixes.is_empty() {
        log!("xref"; "no [xref.prefixes] configured");
        return Ok(());
    }

    let dir = target_dir(dir, config)?;
    let files = collect_files(&dir, &config.links.extensions, &config.links.exclude);
    log!(
        "xref";
        "{} with {}",
        plural_count(files.len(), "file"),
        plural_count(prefixes.len(), "prefix")
    );

    let summary = rewrite_files("xref", &files, config, dry_run, |text| {
        rewrite_prefixes(text, &prefixes)
    });
    print_summary("xref", &summary, dry_run);
    Ok(())
}

/// Manifest redirects, then `[links.extra]` on top.
fn build_table(config: &SweepConfig) -> Result<RedirectTable> {
    let manifest = load_manifest(config)?;
    let mut table = RedirectTable::from_entries(&manifest.redirects()?);
    table.extend(&config.links.extra);
    Ok(table)
}
