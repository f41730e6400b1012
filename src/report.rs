//! Run summaries and grouped issue reports.
//!
//! `Summary` aggregates the counters of a redirect/link run, `IssueReport`
//! collects itemized problems grouped by section and file and prints them in
//! the `[path]` / `→ item` layout on stderr.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::Style;

use crate::logger::paint_err;
use crate::utils::{plural_count, plural_s};

// ============================================================================
// Summary
// ============================================================================

/// One applied substitution, for human-readable output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeLine {
    /// Where the change happened (`docs.json`, `guides/a.mdx:12`).
    pub location: String,
    pub old: String,
    pub new: String,
}

impl fmt::Display for ChangeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} → {}", self.location, self.old, self.new)
    }
}

/// Counters of a single run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
    pub duplicates_removed: usize,
    /// Records whose destination was itself a redirect source.
    pub chains_resolved: usize,
    pub cycles: usize,
    pub depth_exceeded: usize,
    pub files_scanned: usize,
    pub files_changed: usize,
    pub files_failed: usize,
    pub changes: Vec<ChangeLine>,
}

impl Summary {
    /// Record a substitution.
    pub fn change(&mut self, location: impl Into<String>, old: &str, new: &str) {
        self.changes.push(ChangeLine {
            location: location.into(),
            old: old.to_string(),
            new: new.to_string(),
        });
    }

    /// Human-readable change lines, in recording order.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.changes.iter().map(ToString::to_string)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.records > 0 {
            parts.push(plural_count(self.records, "record"));
        }
        if self.duplicates_removed > 0 {
            parts.push(format!(
                "{} removed",
                plural_count(self.duplicates_removed, "duplicate")
            ));
        }
        if self.chains_resolved > 0 {
            parts.push(format!(
                "{} resolved",
                plural_count(self.chains_resolved, "chain")
            ));
        }
        if self.cycles > 0 {
            parts.push(plural_count(self.cycles, "cycle"));
        }
        if self.depth_exceeded > 0 {
            parts.push(format!("{} over depth", self.depth_exceeded));
        }
        if self.files_scanned > 0 {
            parts.push(format!(
                "{} changed of {} scanned",
                self.files_changed, self.files_scanned
            ));
        }
        if self.files_failed > 0 {
            parts.push(format!("{} failed", self.files_failed));
        }

        if parts.is_empty() {
            write!(f, "nothing to do")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

// ============================================================================
// Issue report
// ============================================================================

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// The entry/path that failed.
    pub target: String,
    /// Optional reason.
    pub reason: String,
}

/// Issues grouped by section, then by group (usually a file path).
///
/// Sections print in insertion order; groups within a section are sorted.
#[derive(Debug, Default)]
pub struct IssueReport {
    sections: Vec<(String, BTreeMap<String, Vec<Issue>>)>,
}

impl IssueReport {
    /// Add an issue under `section` / `group`.
    pub fn add(
        &mut self,
        section: &str,
        group: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) {
        let idx = match self.sections.iter().position(|(name, _)| name == section) {
            Some(idx) => idx,
            None => {
                self.sections.push((section.to_string(), BTreeMap::new()));
                self.sections.len() - 1
            }
        };
        self.sections[idx]
            .1
            .entry(group.into())
            .or_default()
            .push(Issue {
                target: target.into(),
                reason: reason.into(),
            });
    }

    /// Total issue count.
    pub fn total(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|(_, groups)| groups.values())
            .map(Vec::len)
            .sum()
    }

    /// Print every section to stderr.
    pub fn print(&self) {
        for (name, groups) in &self.sections {
            print_section(name, groups);
        }
    }
}

fn print_section(name: &str, groups: &BTreeMap<String, Vec<Issue>>) {
    if groups.is_empty() {
        return;
    }
    eprintln!();

    let group_count = groups.len();
    let issue_count: usize = groups.values().map(Vec::len).sum();

    let dim = Style::new().dimmed();
    let arrow = paint_err("→", Style::new().red());
    eprintln!(
        "{} {}",
        paint_err(name, Style::new().red().bold()),
        paint_err(
            format!(
                "({group_count} group{}, {issue_count} issue{})",
                plural_s(group_count),
                plural_s(issue_count)
            ),
            dim
        )
    );

    for (group, issues) in groups {
        eprintln!(
            "{}{}{}",
            paint_err("[", dim),
            paint_err(group, Style::new().cyan()),
            paint_err("]", dim)
        );
        for issue in issues {
            if issue.reason.is_empty() {
                eprintln!("{} {}", arrow, issue.target);
            } else {
                eprintln!("{} {} {}", arrow, issue.target, paint_err(&issue.reason, dim));
            }
        }
    }
}

impl fmt::Display for IssueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total();
        let dim = Style::new().dimmed();
        if total == 0 {
            write!(f, "{}", paint_err("all checks passed", Style::new().green()))
        } else {
            write!(
                f,
                "{} {} {}",
                paint_err("found", dim),
                paint_err(total, Style::new().red().bold()),
                paint_err(format!("issue{}", plural_s(total)), dim)
            )
        }
    }
}

#[cfg(test)]
impl IssueReport {
    pub fn count(&self, section: &str) -> usize {
        self.sections
            .iter()
            .find(|(name, _)| name == section)
            .map_or(0, |(_, groups)| groups.values().map(Vec::len).sum())
    }
}
