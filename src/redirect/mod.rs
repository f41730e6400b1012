//! Redirect graph: records, lookup table, chain resolution, deduplication.
//!
//! Data flows loader → deduplicator (optional) → chain resolver, then into
//! the link rewriter, which consults the resolved table per document.

mod chain;
mod dedupe;
mod record;
mod resolve;
mod table;

pub use chain::{ChainEnd, DEFAULT_MAX_DEPTH, resolve_chain, resolve_chain_with};
pub use dedupe::{DedupeReport, dedupe};
pub use record::{RedirectEntry, RedirectRecord};
pub use resolve::{find_chains, resolve_entries};
pub use table::RedirectTable;
