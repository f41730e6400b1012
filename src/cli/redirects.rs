//! Redirect list commands: `dedupe` and `resolve`.

use anyhow::{Result, bail};

use super::common::{load_manifest, print_summary};
use super::args::ResolveArgs;
use crate::config::SweepConfig;
use crate::manifest::Manifest;
use crate::redirect::{
    DedupeReport, RedirectEntry, RedirectTable, dedupe, find_chains, resolve_chain,
    resolve_entries,
};
use crate::report::Summary;
use crate::utils::plural_count;
use crate::{debug, log};

/// Remove duplicate sources, keeping the last occurrence of each.
pub fn dedupe_redirects(config: &SweepConfig, dry_run: bool) -> Result<()> {
    let mut manifest = load_manifest(config)?;
    let entries = manifest.redirects()?;
    log!("dedupe"; "{}", plural_count(entries.len(), "redirect"));

    let (cleaned, report) = dedupe(&entries);
    if report.is_empty() {
        log!("ok"; "no duplicate sources");
        return Ok(());
    }

    print_duplicates(&entries, &report);
    let summary = Summary {
        records: entries.len(),
        duplicates_removed: report.removed(),
        ..Default::default()
    };
    persist(&mut manifest, &cleaned, config, dry_run)?;
    print_summary("dedupe", &summary, dry_run);
    Ok(())
}

/// Point every redirect at the end of its chain, or with `--check` only
/// report chains.
pub fn resolve_redirects(config: &SweepConfig, args: ResolveArgs) -> Result<()> {
    let mut manifest = load_manifest(config)?;
    let mut entries = manifest.redirects()?;
    let max_depth = config.redirects.max_depth;
    log!("resolve"; "{}", plural_count(entries.len(), "redirect"));

    let mut summary = Summary {
        records: entries.len(),
        ..Default::default()
    };

    if args.dedupe {
        let (cleaned, report) = dedupe(&entries);
        if !report.is_empty() {
            print_duplicates(&entries, &report);
            summary.duplicates_removed = report.removed();
            entries = cleaned;
        }
    }

    if args.check {
        return check_chains(&entries, max_depth);
    }

    let outcome = resolve_entries(&entries, max_depth);
    for (_, chain) in outcome.cycles.iter().chain(&outcome.depth_exceeded) {
        if let Some(warning) = chain.warning() {
            log!("warning"; "{}", warning);
        }
    }
    for update in &outcome.updates {
        debug!("resolve"; "{}", update.chain.path.join(" → "));
        summary.change(&update.source, &update.old, &update.new);
    }
    summary.chains_resolved = outcome.updates.len();
    summary.cycles = outcome.cycles.len();
    summary.depth_exceeded = outcome.depth_exceeded.len();

    if outcome.changed() || summary.duplicates_removed > 0 {
        persist(&mut manifest, &outcome.entries, config, args.write.dry_run)?;
    } else {
        log!("ok"; "every redirect is already direct");
    }
    print_summary("resolve", &summary, args.write.dry_run);
    Ok(())
}

/// Fail when any destination is itself a redirect source.
fn check_chains(entries: &[RedirectEntry], max_depth: usize) -> Result<()> {
    let chains = find_chains(entries);
    if chains.is_empty() {
        log!("ok"; "no redirect chains, every redirect is direct");
        return Ok(());
    }

    let table = RedirectTable::from_entries(entries);
    for (source, _) in &chains {
        let chain = resolve_chain(source, &table, max_depth);
        log!("chain"; "{}", chain.path.join(" → "));
        if let Some(warning) = chain.warning() {
            log!("warning"; "{}", warning);
        }
    }
    bail!(
        "{} left, run `docsweep resolve` to flatten",
        plural_count(chains.len(), "redirect chain")
    )
}

fn print_duplicates(entries: &[RedirectEntry], report: &DedupeReport) {
    let destination = |idx: usize| {
        entries
            .get(idx)
            .and_then(RedirectEntry::record)
            .map_or("?", |r| r.destination.as_str())
    };

    for (source, dup) in &report.duplicates {
        log!(
            "duplicate";
            "{} ({} occurrences) keeps {}",
            source,
            dup.occurrences,
            destination(dup.kept_index)
        );
        for &idx in &dup.removed_indices {
            debug!("duplicate"; "drops #{} → {}", idx, destination(idx));
        }
    }
}

fn persist(
    manifest: &mut Manifest,
    entries: &[RedirectEntry],
    config: &SweepConfig,
    dry_run: bool,
) -> Result<()> {
    if dry_run {
        return Ok(());
    }
    manifest.set_redirects(entries)?;
    manifest.save()?;
    log!("done"; "updated {}", config.root_relative(manifest.path()));
    Ok(())
}
