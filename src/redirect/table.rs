//! Source → destination lookup table.

use rustc_hash::FxHashMap;

use super::record::{RedirectEntry, RedirectRecord};
use crate::link::lookup_candidates;

/// Mapping from redirect source to destination.
///
/// Keys are unique by construction: loading iterates the records in order
/// and overwrites on a repeated source, so the last occurrence wins.
#[derive(Debug, Default, Clone)]
pub struct RedirectTable {
    map: FxHashMap<String, String>,
}

impl RedirectTable {
    /// Build from manifest entries, silently skipping malformed ones.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a RedirectEntry>) -> Self {
        Self::from_records(entries.into_iter().filter_map(RedirectEntry::record))
    }

    /// Build from records; blank sources or destinations are skipped.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a RedirectRecord>) -> Self {
        let mut table = Self::default();
        for record in records {
            if let Some((source, destination)) = record.key_pair() {
                table.insert(source, destination);
            }
        }
        table
    }

    /// Insert or overwrite a mapping.
    pub fn insert(&mut self, source: impl Into<String>, destination: impl Into<String>) {
        self.map.insert(source.into(), destination.into());
    }

    /// Exact lookup.
    #[inline]
    pub fn get(&self, source: &str) -> Option<&str> {
        self.map.get(source).map(String::as_str)
    }

    #[inline]
    pub fn contains(&self, source: &str) -> bool {
        self.map.contains_key(source)
    }

    /// Lookup through the normalized candidate keys of `path`
    /// (exact, extension-stripped, slash-stripped, both). First hit wins.
    ///
    /// Returns the matched key and its destination.
    pub fn find(&self, path: &str) -> Option<(&str, &str)> {
        lookup_candidates(path).into_iter().find_map(|candidate| {
            self.map
                .get_key_value(candidate.as_str())
                .map(|(k, v)| (k.as_str(), v.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<S: Into<String>, D: Into<String>> FromIterator<(S, D)> for RedirectTable {
    fn from_iter<I: IntoIterator<Item = (S, D)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (source, destination) in iter {
            table.insert(source, destination);
        }
        table
    }
}

impl<S: Into<String>, D: Into<String>> Extend<(S, D)> for RedirectTable {
    fn extend<I: IntoIterator<Item = (S, D)>>(&mut self, iter: I) {
        for (source, destination) in iter {
            self.insert(source, destination);
        }
    }
}
