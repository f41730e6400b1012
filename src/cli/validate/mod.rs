//! Navigation validation command.

use anyhow::{Result, bail};

use super::common::check_navigation;
use crate::config::SweepConfig;
use crate::log;
use crate::manifest::NavDiff;
use crate::report::IssueReport;
use crate::utils::plural_count;

const MISSING: &str = "missing page files";
const ORPHANED: &str = "pages missing from navigation";

/// Check that navigation entries and page files match one to one.
pub fn validate_navigation(config: &SweepConfig, warn_only: bool) -> Result<()> {
    let check = check_navigation(config)?;

    log!(
        "validate";
        "{} in navigation, {} on disk",
        plural_count(check.nav_pages.len(), "entry"),
        plural_count(check.page_files, "page file")
    );

    if check.diff.is_clean() {
        log!("ok"; "navigation and page files match");
        return Ok(());
    }

    let report = build_report(&check.diff, &config.scan.page_extension);
    report.print();
    eprintln!();

    let missing = check.diff.missing.len();
    let orphaned = check.diff.orphaned.len();
    if warn_only {
        log!("warning"; "{}", report);
        return Ok(());
    }

    bail!(
        "validation failed: {} missing, {} not in navigation",
        plural_count(missing, "file"),
        plural_count(orphaned, "page")
    )
}

/// Group the mismatches by top-level section.
fn build_report(diff: &NavDiff, extension: &str) -> IssueReport {
    let mut report = IssueReport::default();
    for (section, pages) in diff.missing_by_section() {
        for page in pages {
            report.add(MISSING, section, page, format!("(no {page}.{extension})"));
        }
    }
    for (section, pages) in diff.orphaned_by_section() {
        for page in pages {
            report.add(ORPHANED, section, page, "");
        }
    }
    report
}
