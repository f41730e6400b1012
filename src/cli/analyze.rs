//! Navigation analysis command.
//!
//! Same comparison as `validate`, broken down by top-level section with
//! suggested fixes. Never fails on mismatches.

use std::collections::BTreeMap;

use anyhow::Result;
use owo_colors::Style;

use super::common::check_navigation;
use crate::config::SweepConfig;
use crate::log;
use crate::logger::paint;
use crate::manifest::{NavDiff, section_of};
use crate::utils::plural_count;

/// Per-section counts.
#[derive(Debug, Default, PartialEq, Eq)]
struct SectionStats<'a> {
    entries: usize,
    missing: Vec<&'a str>,
    orphaned: Vec<&'a str>,
}

pub fn analyze_navigation(config: &SweepConfig) -> Result<()> {
    let check = check_navigation(config)?;

    log!(
        "analyze";
        "{}, {}, {} missing, {} not in navigation",
        plural_count(check.nav_pages.len(), "navigation entry"),
        plural_count(check.page_files, "page file"),
        check.diff.missing.len(),
        check.diff.orphaned.len()
    );

    let sections = section_stats(check.nav_pages.iter().map(String::as_str), &check.diff);
    println!();
    println!("{}", paint("by section", Style::new().bold()));
    for (section, stats) in &sections {
        print_section(config, section, stats);
    }

    print_recommendations(config, &check.diff);
    Ok(())
}

fn section_stats<'a>(
    nav_pages: impl Iterator<Item = &'a str>,
    diff: &'a NavDiff,
) -> BTreeMap<&'a str, SectionStats<'a>> {
    let mut sections: BTreeMap<&str, SectionStats> = BTreeMap::new();
    for page in nav_pages {
        sections.entry(section_of(page)).or_default().entries += 1;
    }
    for page in &diff.missing {
        sections.entry(section_of(page)).or_default().missing.push(page);
    }
    for page in &diff.orphaned {
        sections.entry(section_of(page)).or_default().orphaned.push(page);
    }
    sections
}

fn print_section(config: &SweepConfig, section: &str, stats: &SectionStats) {
    let label = config.layout.product_label(section);
    println!(
        "\n  {} {}",
        paint(label, Style::new().cyan().bold()),
        paint(
            format!("({section}/, {})", plural_count(stats.entries, "entry")),
            Style::new().dimmed()
        )
    );

    if stats.missing.is_empty() && stats.orphaned.is_empty() {
        println!("    {} all entries have files", paint("✓", Style::new().green()));
        return;
    }
    if !stats.missing.is_empty() {
        println!("    {} {} missing", paint("✗", Style::new().red()), plural_count(stats.missing.len(), "file"));
        for page in &stats.missing {
            println!("      - {page}");
        }
    }
    if !stats.orphaned.is_empty() {
        println!(
            "    {} {} not in navigation",
            paint("!", Style::new().yellow()),
            plural_count(stats.orphaned.len(), "page")
        );
        for page in &stats.orphaned {
            println!("      - {page}");
        }
    }
}

fn print_recommendations(config: &SweepConfig, diff: &NavDiff) {
    if diff.is_clean() {
        println!();
        log!("ok"; "navigation and page files match, nothing to recommend");
        return;
    }

    println!();
    println!("{}", paint("recommendations", Style::new().bold()));

    if !diff.missing.is_empty() {
        println!(
            "\n  {} create the {} or remove the entries from navigation",
            paint("→", Style::new().red()),
            plural_count(diff.missing.len(), "missing file")
        );
    }

    if !diff.orphaned.is_empty() {
        println!(
            "\n  {} add these pages to navigation if they should be reachable:",
            paint("→", Style::new().yellow())
        );
        for (section, pages) in diff.orphaned_by_section() {
            println!(
                "    {}: {}",
                config.layout.product_label(section),
                plural_count(pages.len(), "page")
            );
        }
        println!(
            "\n  {} pages with no place in navigation can be moved with `docsweep move`",
            paint("→", Style::new().yellow())
        );
    }
}
