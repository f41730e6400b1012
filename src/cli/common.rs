//! Common utilities shared across CLI commands.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use crossbeam::queue::SegQueue;
use rayon::prelude::*;

use crate::config::SweepConfig;
use crate::content::page_ids;
use crate::link::Rewrite;
use crate::logger::ProgressLine;
use crate::manifest::{Manifest, NavDiff, Navigation, diff};
use crate::report::Summary;
use crate::utils::path::resolve_path;
use crate::{debug, log};

/// Lock-free parallel result collector using `SegQueue`
pub struct ParallelCollector<T> {
    queue: SegQueue<T>,
}

impl<T> ParallelCollector<T> {
    /// Create a new empty collector.
    #[inline]
    pub fn new() -> Self {
        Self {
            queue: SegQueue::new(),
        }
    }

    /// Push an item (lock-free, wait-free).
    #[inline]
    pub fn push(&self, item: T) {
        self.queue.push(item);
    }

    /// Drain all items with pre-allocated capacity.
    pub fn drain_with_capacity(self, capacity: usize) -> Vec<T> {
        let mut results = Vec::with_capacity(capacity);
        while let Some(item) = self.queue.pop() {
            results.push(item);
        }
        results
    }
}

impl<T> Default for ParallelCollector<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the configured manifest.
pub fn load_manifest(config: &SweepConfig) -> Result<Manifest> {
    let path = config.manifest_path();
    let manifest = Manifest::load(path)?;
    debug!("manifest"; "loaded {}", path.display());
    Ok(manifest)
}

/// The manifest's navigation; a manifest without one is an error.
pub fn require_navigation(manifest: &Manifest) -> Result<Navigation> {
    match manifest.navigation()? {
        Some(nav) => Ok(nav),
        None => bail!("{} has no `navigation`", manifest.path().display()),
    }
}

/// Navigation entries compared against page files under the root.
pub struct NavCheck {
    pub nav_pages: BTreeSet<String>,
    pub page_files: usize,
    pub diff: NavDiff,
}

/// Compare the manifest's navigation with the page files on disk.
pub fn check_navigation(config: &SweepConfig) -> Result<NavCheck> {
    let manifest = load_manifest(config)?;
    let nav = require_navigation(&manifest)?;

    let nav_pages = nav.page_set();
    let files = page_ids(
        config.root(),
        &config.scan.page_extension,
        &config.scan.exclude,
    );
    let diff = diff(
        &nav_pages,
        &files,
        config.root(),
        &config.scan.page_extension,
    );

    Ok(NavCheck {
        nav_pages,
        page_files: files.len(),
        diff,
    })
}

/// Resolve a directory argument against the working directory, then the
/// site root; `None` means the root itself.
pub fn target_dir(dir: Option<&Path>, config: &SweepConfig) -> Result<PathBuf> {
    let Some(dir) = dir else {
        return Ok(config.root().to_path_buf());
    };
    let resolved = resolve_path(dir, config.root());
    if !resolved.is_dir() {
        bail!("not a directory: {}", dir.display());
    }
    Ok(resolved)
}

/// Apply `rewrite` to every file, in parallel, then persist changed files.
///
/// Reads and rewrites run on the rayon pool; writes happen afterwards on
/// the calling thread, in path order. A file that fails to read or write is
/// logged and counted, and does not stop the others.
pub fn rewrite_files<F>(
    module: &'static str,
    files: &[PathBuf],
    config: &SweepConfig,
    dry_run: bool,
    rewrite: F,
) -> Summary
where
    F: Fn(&str) -> Rewrite + Sync,
{
    let progress = ProgressLine::new(module, &[("files", files.len())]);
    let collector = ParallelCollector::new();

    files.par_iter().for_each(|file| {
        let result = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))
            .map(|text| rewrite(&text));
        progress.inc("files");
        collector.push((file, result));
    });
    progress.finish();

    let mut results = collector.drain_with_capacity(files.len());
    results.sort_by(|a, b| a.0.cmp(b.0));

    let mut summary = Summary {
        files_scanned: files.len(),
        ..Default::default()
    };

    for (file, result) in results {
        let rel = config.root_relative(file);
        let rewritten = match result {
            Ok(rewritten) => rewritten,
            Err(e) => {
                log!("error"; "{:#}", e);
                summary.files_failed += 1;
                continue;
            }
        };
        if !rewritten.changed() {
            continue;
        }

        if !dry_run
            && let Err(e) = fs::write(file, &rewritten.text)
        {
            log!("error"; "failed to write {}: {}", rel, e);
            summary.files_failed += 1;
            continue;
        }

        summary.files_changed += 1;
        for change in &rewritten.changes {
            summary.change(format!("{rel}:{}", change.line), &change.old, &change.new);
        }
    }

    summary
}

/// Print change lines and the closing summary.
pub fn print_summary(module: &str, summary: &Summary, dry_run: bool) {
    for line in summary.lines() {
        log!(module; "{}", line);
    }
    if dry_run && !summary.changes.is_empty() {
        log!("dry-run"; "no files written");
    }
    log!(module; "{}", summary);
}
