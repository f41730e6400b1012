//! Link extraction, normalization and rewriting for Markdown/MDX documents.

mod normalize;
mod rewrite;
mod syntax;

pub use normalize::lookup_candidates;
pub use rewrite::{Rewrite, rewrite_links, rewrite_prefixes};
