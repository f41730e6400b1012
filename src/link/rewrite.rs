//! Document rewriting against a redirect table or a prefix map.

use super::normalize::normalize;
use super::syntax::replace_references;
use crate::redirect::{ChainEnd, RedirectTable, resolve_chain_with};

/// One substituted URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkChange {
    /// 1-based line of the reference in the original document.
    pub line: usize,
    pub old: String,
    pub new: String,
}

/// A rewritten document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub changes: Vec<LinkChange>,
}

impl Rewrite {
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Rewrite every link whose normalized form is a redirect source.
///
/// The matched destination is followed to the end of its chain with the same
/// normalized lookup, so a rewritten link is never itself a source and a
/// second pass finds nothing to change. Fragments are re-attached verbatim.
/// Links on a redirect cycle are left alone.
pub fn rewrite_links(document: &str, table: &RedirectTable, max_depth: usize) -> Rewrite {
    let (text, replaced) = replace_references(document, |reference| {
        let key = normalize(reference.url)?;
        let (_, destination) = table.find(&key.path)?;

        let chain = resolve_chain_with(destination, max_depth, |url| {
            let lookup = normalize(url)?;
            table.find(&lookup.path).map(|(_, d)| d)
        });
        if chain.end == ChainEnd::Cycle {
            return None;
        }
        Some(key.with_fragment(chain.terminal()))
    });

    into_rewrite(text, replaced)
}

/// Replace the longest matching old prefix of every link URL.
///
/// The remainder of the URL is kept verbatim. Runs once per reference, so a
/// replacement is never fed back into the prefix map.
pub fn rewrite_prefixes(document: &str, prefixes: &[(String, String)]) -> Rewrite {
    let (text, replaced) = replace_references(document, |reference| {
        let (old, new) = prefixes
            .iter()
            .filter(|(old, _)| !old.is_empty() && reference.url.starts_with(old.as_str()))
            .max_by_key(|(old, _)| old.len())?;
        Some(format!("{new}{}", &reference.url[old.len()..]))
    });

    into_rewrite(text, replaced)
}

fn into_rewrite(text: String, replaced: Vec<(super::syntax::LinkReference<'_>, String)>) -> Rewrite {
    let changes = replaced
        .into_iter()
        .map(|(reference, new)| LinkChange {
            line: reference.line,
            old: reference.url.to_string(),
            new,
        })
        .collect();
    Rewrite { text, changes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::DEFAULT_MAX_DEPTH;

    fn table(pairs: &[(&str, &str)]) -> RedirectTable {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_trailing_slash_scenario() {
        let table = table(&[("/guides/llm", "/container-engine/how-to-guides/llm/")]);
        let result = rewrite_links("[Start](/guides/llm/)", &table, DEFAULT_MAX_DEPTH);
        assert_eq!(result.text, "[Start](/container-engine/how-to-guides/llm/)");
        assert_eq!(
            result.changes,
            vec![LinkChange {
                line: 1,
                old: "/guides/llm/".into(),
                new: "/container-engine/how-to-guides/llm/".into(),
            }]
        );
    }

    #[test]
    fn test_fragment_and_quotes_preserved() {
        let table = table(&[("/old", "/new")]);
        let doc = r#"[A](/old#install "Title") <a href='/old.mdx#x'>B</a> <Card href={"/old/"} />"#;
        let result = rewrite_links(doc, &table, DEFAULT_MAX_DEPTH);
        assert_eq!(
            result.text,
            r#"[A](/new#install "Title") <a href='/new#x'>B</a> <Card href={"/new"} />"#
        );
        assert_eq!(result.changes.len(), 3);
    }

    #[test]
    fn test_bare_link_normalized() {
        let table = table(&[("/guides/a", "/ce/a")]);
        let result = rewrite_links("[A](guides/a.md)", &table, DEFAULT_MAX_DEPTH);
        assert_eq!(result.text, "[A](/ce/a)");
    }

    #[test]
    fn test_untouched_references() {
        let table = table(&[("/a", "/b")]);
        let doc = "[x](https://site.io/a) [y](#a) [z](./a) [w](/other) [m](mailto:a@b.c)";
        let result = rewrite_links(doc, &table, DEFAULT_MAX_DEPTH);
        assert_eq!(result.text, doc);
        assert!(!result.changed());
    }

    #[test]
    fn test_residual_chain_followed() {
        let table = table(&[("/a", "/b/"), ("/b", "/c")]);
        let result = rewrite_links("[x](/a)", &table, DEFAULT_MAX_DEPTH);
        assert_eq!(result.text, "[x](/c)");
    }

    #[test]
    fn test_cycle_left_alone() {
        let table = table(&[("/x", "/y"), ("/y", "/x")]);
        let result = rewrite_links("[x](/x)", &table, DEFAULT_MAX_DEPTH);
        assert_eq!(result.text, "[x](/x)");
    }

    #[test]
    fn test_idempotent() {
        let table = table(&[
            ("/guides/llm", "/container-engine/llm/"),
            ("/container-engine/llm", "/ce/llm"),
            ("/p", "/q"),
        ]);
        let doc = "[a](/guides/llm/) [b](/p#f) <img src=\"/p.mdx\"/> '/guides/llm'";
        let first = rewrite_links(doc, &table, DEFAULT_MAX_DEPTH);
        assert!(first.changed());
        let second = rewrite_links(&first.text, &table, DEFAULT_MAX_DEPTH);
        assert_eq!(second.text, first.text);
        assert!(!second.changed());
    }

    #[test]
    fn test_multiline_line_numbers() {
        let table = table(&[("/a", "/b")]);
        let result = rewrite_links("intro\n\n[x](/a)\n", &table, DEFAULT_MAX_DEPTH);
        assert_eq!(result.changes[0].line, 3);
        assert_eq!(result.text, "intro\n\n[x](/b)\n");
    }

    #[test]
    fn test_prefix_rewrite_longest_wins() {
        let prefixes = vec![
            ("/guides/".to_string(), "/docs/".to_string()),
            ("/guides/llm/".to_string(), "/ce/how-to/llm/".to_string()),
        ];
        let doc = "[a](/guides/llm/setup#x) [b](/guides/other) [c](/elsewhere)";
        let result = rewrite_prefixes(doc, &prefixes);
        assert_eq!(
            result.text,
            "[a](/ce/how-to/llm/setup#x) [b](/docs/other) [c](/elsewhere)"
        );
        assert_eq!(result.changes.len(), 2);
    }

    #[test]
    fn test_prefix_rewrite_no_cascade() {
        let prefixes = vec![
            ("/a/".to_string(), "/b/".to_string()),
            ("/b/".to_string(), "/c/".to_string()),
        ];
        let result = rewrite_prefixes("[x](/a/page)", &prefixes);
        assert_eq!(result.text, "[x](/b/page)");
    }
}
