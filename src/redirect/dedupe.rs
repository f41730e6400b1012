//! Removal of repeated redirect sources.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::record::RedirectEntry;

/// Occurrences of one repeated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub occurrences: usize,
    /// Index (in the input) of the surviving record.
    pub kept_index: usize,
    pub removed_indices: Vec<usize>,
}

/// Repeated sources, keyed by source.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DedupeReport {
    pub duplicates: BTreeMap<String, Duplicate>,
}

impl DedupeReport {
    /// Total number of records removed.
    pub fn removed(&self) -> usize {
        self.duplicates
            .values()
            .map(|d| d.removed_indices.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }
}

/// Keep only the last record of every repeated source.
///
/// Survivors keep their original relative order. Malformed entries have no
/// source and are always kept.
pub fn dedupe(entries: &[RedirectEntry]) -> (Vec<RedirectEntry>, DedupeReport) {
    let mut seen: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
    for (idx, entry) in entries.iter().enumerate() {
        if let Some(source) = entry.source() {
            seen.entry(source).or_default().push(idx);
        }
    }

    let mut report = DedupeReport::default();
    let mut removed = vec![false; entries.len()];
    for (source, indices) in seen {
        let Some((&kept_index, earlier)) = indices.split_last() else {
            continue;
        };
        if earlier.is_empty() {
            continue;
        }
        for &idx in earlier {
            removed[idx] = true;
        }
        report.duplicates.insert(
            source.to_string(),
            Duplicate {
                occurrences: indices.len(),
                kept_index,
                removed_indices: earlier.to_vec(),
            },
        );
    }

    let cleaned = entries
        .iter()
        .zip(removed)
        .filter(|(_, removed)| !removed)
        .map(|(entry, _)| entry.clone())
        .collect();

    (cleaned, report)
}
