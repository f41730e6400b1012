//! Redirect records as stored in the manifest.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `{source, destination}` redirect record.
///
/// Keys other than `source`/`destination` (e.g. `permanent`) are carried in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectRecord {
    pub source: String,
    pub destination: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RedirectRecord {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            extra: Map::new(),
        }
    }

    /// Trimmed `(source, destination)`, or `None` when either is empty.
    pub fn key_pair(&self) -> Option<(&str, &str)> {
        let source = self.source.trim();
        let destination = self.destination.trim();
        (!source.is_empty() && !destination.is_empty()).then_some((source, destination))
    }
}

/// One item of the manifest's `redirects` list.
///
/// Malformed items (missing or non-string `source`/`destination`) are kept
/// verbatim so that a write-back does not lose them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RedirectEntry {
    Record(RedirectRecord),
    Other(Value),
}

impl RedirectEntry {
    /// The record, if this entry is well-formed.
    pub fn record(&self) -> Option<&RedirectRecord> {
        match self {
            Self::Record(record) if record.key_pair().is_some() => Some(record),
            _ => None,
        }
    }

    pub fn record_mut(&mut self) -> Option<&mut RedirectRecord> {
        match self {
            Self::Record(record) if record.key_pair().is_some() => Some(record),
            _ => None,
        }
    }

    /// Trimmed source of a well-formed entry.
    pub fn source(&self) -> Option<&str> {
        self.record().and_then(|r| r.key_pair()).map(|(s, _)| s)
    }
}

impl From<RedirectRecord> for RedirectEntry {
    fn from(record: RedirectRecord) -> Self {
        Self::Record(record)
    }
}
