//! Chain resolution applied to a whole redirect list.

use super::chain::{Chain, ChainEnd, resolve_chain};
use super::record::RedirectEntry;
use super::table::RedirectTable;

/// A record whose destination was moved to the end of its chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub index: usize,
    pub source: String,
    pub old: String,
    pub new: String,
    /// The walk from the old destination.
    pub chain: Chain,
}

/// Outcome of [`resolve_entries`].
#[derive(Debug, Default, Clone)]
pub struct ResolveOutcome {
    pub entries: Vec<RedirectEntry>,
    pub updates: Vec<Update>,
    /// Records left untouched because their chain loops.
    pub cycles: Vec<(String, Chain)>,
    /// Records updated to the URL reached at the depth bound.
    pub depth_exceeded: Vec<(String, Chain)>,
}

impl ResolveOutcome {
    pub fn changed(&self) -> bool {
        !self.updates.is_empty()
    }
}

/// Sources whose destination is itself a redirect source, in list order.
pub fn find_chains(entries: &[RedirectEntry]) -> Vec<(String, String)> {
    let table = RedirectTable::from_entries(entries);
    entries
        .iter()
        .filter_map(RedirectEntry::record)
        .filter_map(|r| r.key_pair())
        .filter(|(_, destination)| table.contains(destination))
        .map(|(s, d)| (s.to_string(), d.to_string()))
        .collect()
}

/// Point every record at the end of its chain.
///
/// The table is built once from the input; each record's destination is
/// walked through it. Records on a cycle keep their destination, records
/// whose walk hits the depth bound take the URL reached.
pub fn resolve_entries(entries: &[RedirectEntry], max_depth: usize) -> ResolveOutcome {
    let table = RedirectTable::from_entries(entries);
    let mut outcome = ResolveOutcome {
        entries: entries.to_vec(),
        ..Default::default()
    };

    for (index, entry) in outcome.entries.iter_mut().enumerate() {
        let Some(record) = entry.record_mut() else {
            continue;
        };
        let Some((source, destination)) = record.key_pair() else {
            continue;
        };
        if !table.contains(destination) {
            continue;
        }

        let (source, destination) = (source.to_string(), destination.to_string());
        let chain = resolve_chain(&destination, &table, max_depth);

        match chain.end {
            ChainEnd::Cycle => {
                outcome.cycles.push((source, chain));
                continue;
            }
            ChainEnd::DepthExceeded => {
                outcome.depth_exceeded.push((source.clone(), chain.clone()));
            }
            ChainEnd::Terminal => {}
        }

        let terminal = chain.terminal().to_string();
        if terminal == destination || terminal == source {
            continue;
        }
        record.destination = terminal.clone();
        outcome.updates.push(Update {
            index,
            source,
            old: destination,
            new: terminal,
            chain,
        });
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::RedirectRecord;
    use crate::redirect::chain::DEFAULT_MAX_DEPTH;

    fn entry(source: &str, destination: &str) -> RedirectEntry {
        RedirectRecord::new(source, destination).into()
    }

    fn destinations(entries: &[RedirectEntry]) -> Vec<&str> {
        entries
            .iter()
            .filter_map(RedirectEntry::record)
            .map(|r| r.destination.as_str())
            .collect()
    }

    #[test]
    fn test_resolves_to_fixed_point() {
        let entries = vec![entry("/a", "/b"), entry("/b", "/c"), entry("/c", "/d")];
        let outcome = resolve_entries(&entries, DEFAULT_MAX_DEPTH);

        assert_eq!(destinations(&outcome.entries), vec!["/d", "/d", "/d"]);
        assert_eq!(outcome.updates.len(), 2);
        assert_eq!(outcome.updates[0].source, "/a");
        assert_eq!(outcome.updates[0].chain.path, vec!["/b", "/c", "/d"]);

        let table = RedirectTable::from_entries(&outcome.entries);
        for record in outcome.entries.iter().filter_map(RedirectEntry::record) {
            assert!(!table.contains(&record.destination));
        }
        assert!(find_chains(&outcome.entries).is_empty());
    }

    #[test]
    fn test_round_trip_without_chains() {
        let entries = vec![entry("/a", "/b"), entry("/c", "/d")];
        let outcome = resolve_entries(&entries, DEFAULT_MAX_DEPTH);
        assert_eq!(outcome.entries, entries);
        assert!(!outcome.changed());
    }

    #[test]
    fn test_cycle_left_untouched() {
        let entries = vec![entry("/x", "/y"), entry("/y", "/x"), entry("/s", "/x")];
        let outcome = resolve_entries(&entries, DEFAULT_MAX_DEPTH);

        assert_eq!(destinations(&outcome.entries), vec!["/y", "/x", "/x"]);
        assert_eq!(outcome.cycles.len(), 3);
        assert!(outcome.updates.is_empty());
    }

    #[test]
    fn test_depth_exceeded_updated() {
        let entries: Vec<_> = (0..5)
            .map(|i| entry(&format!("/p{i}"), &format!("/p{}", i + 1)))
            .collect();
        let outcome = resolve_entries(&entries, 2);

        assert_eq!(outcome.entries[0].record().unwrap().destination, "/p3");
        assert!(!outcome.depth_exceeded.is_empty());
    }

    #[test]
    fn test_find_chains() {
        let entries = vec![entry("/a", "/b"), entry("/b", "/c"), entry("/d", "/e")];
        assert_eq!(find_chains(&entries), vec![("/a".into(), "/b".into())]);
    }
}
