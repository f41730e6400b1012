//! Multi-hop redirect chain resolution.

use rustc_hash::FxHashSet;

use super::table::RedirectTable;

/// Default bound on the number of hops followed.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Why a chain walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainEnd {
    /// Reached a URL that is not a redirect source.
    Terminal,
    /// The next hop would revisit a URL already on the path.
    Cycle,
    /// The depth bound was reached with further hops available.
    DepthExceeded,
}

/// The path taken from a starting URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    /// `[start, hop1, ..., terminal]`; never empty.
    pub path: Vec<String>,
    pub end: ChainEnd,
    /// For cycles, the already-visited URL the next hop pointed back to.
    pub revisit: Option<String>,
}

impl Chain {
    pub fn start(&self) -> &str {
        self.path.first().map_or("", String::as_str)
    }

    /// The last URL reached.
    pub fn terminal(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    /// Number of lookups that succeeded.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// A warning for cycles and exceeded depth.
    pub fn warning(&self) -> Option<String> {
        match self.end {
            ChainEnd::Terminal => None,
            ChainEnd::Cycle => Some(format!(
                "redirect cycle: {} → {}",
                self.path.join(" → "),
                self.revisit.as_deref().unwrap_or_default()
            )),
            ChainEnd::DepthExceeded => Some(format!(
                "redirect chain from {} exceeds {} hops, stopped at {}",
                self.start(),
                self.hops(),
                self.terminal()
            )),
        }
    }
}

/// Follow `table` from `start` until a fixed point, a cycle, or `max_depth`.
///
/// # Examples
/// ```ignore
/// // {"/a": "/b", "/b": "/c", "/c": "/d"}
/// let chain = resolve_chain("/a", &table, 20);
/// assert_eq!(chain.terminal(), "/d");
/// ```
pub fn resolve_chain(start: &str, table: &RedirectTable, max_depth: usize) -> Chain {
    resolve_chain_with(start, max_depth, |url| table.get(url))
}

/// `resolve_chain` over an arbitrary lookup.
///
/// Visited URLs are tracked from the start; a hop back onto the path stops
/// the walk with [`ChainEnd::Cycle`] and keeps the URL reached before the
/// repeat as terminal.
pub fn resolve_chain_with<'t, F>(start: &str, max_depth: usize, mut lookup: F) -> Chain
where
    F: FnMut(&str) -> Option<&'t str>,
{
    let mut path = vec![start.to_string()];
    let mut visited: FxHashSet<String> = FxHashSet::default();
    visited.insert(start.to_string());

    let mut current = start.to_string();
    while let Some(next) = lookup(&current) {
        if path.len() > max_depth {
            return Chain {
                path,
                end: ChainEnd::DepthExceeded,
                revisit: None,
            };
        }
        if visited.contains(next) {
            return Chain {
                path,
                end: ChainEnd::Cycle,
                revisit: Some(next.to_string()),
            };
        }
        visited.insert(next.to_string());
        path.push(next.to_string());
        current = next.to_string();
    }

    Chain {
        path,
        end: ChainEnd::Terminal,
        revisit: None,
    }
}
