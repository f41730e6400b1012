//! Link recognizers and their wrapper templates.
//!
//! Each recognizer yields a [`Wrapper`] describing the syntax around the URL;
//! `Wrapper::render` puts a URL back into exactly that syntax, so extraction
//! and re-insertion are symmetric.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// `[text](url "title")`, also matching the bracket part of `![alt](url)`.
static MARKDOWN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[([^\[\]\n]*)\]\(([^()\s]+)((?:\s+"[^"\n]*")?)\)"#).unwrap()
});

/// The outer target of a linked image, `[![alt](img)](url "title")`.
/// Group 1 is the closing `](url title)` only; the image itself is left to
/// [`MARKDOWN`].
static LINKED_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\[!\[[^\[\]\n]*\]\([^()\s]+(?:\s+"[^"\n]*")?\)(\]\(([^()\s]+)((?:\s+"[^"\n]*")?)\))"#,
    )
    .unwrap()
});

/// `src="url"` / `href='url'`.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(src|href)=(?:"([^"\n]*)"|'([^'\n]*)')"#).unwrap()
});

/// A quoted root-relative literal: `"/path"` or `'/path'`.
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(/[^"\s]*)"|'(/[^'\s]*)'"#).unwrap());

/// Syntax surrounding a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wrapper {
    /// `[text](url title)`; `title` keeps its leading whitespace.
    Markdown { text: String, title: String },
    /// `](url title)` closing a linked image.
    LinkedImage { title: String },
    /// `name=QuoteUrlQuote`
    Attribute { name: String, quote: char },
    /// `QuoteUrlQuote`
    Quoted { quote: char },
}

impl Wrapper {
    /// Render `url` inside this wrapper.
    pub fn render(&self, url: &str) -> String {
        match self {
            Self::Markdown { text, title } => format!("[{text}]({url}{title})"),
            Self::LinkedImage { title } => format!("]({url}{title})"),
            Self::Attribute { name, quote } => format!("{name}={quote}{url}{quote}"),
            Self::Quoted { quote } => format!("{quote}{url}{quote}"),
        }
    }
}

/// One link occurrence in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference<'a> {
    /// Byte range of the whole match.
    pub span: Range<usize>,
    /// Matched text.
    pub raw: &'a str,
    pub url: &'a str,
    pub wrapper: Wrapper,
    /// 1-based line of the match start.
    pub line: usize,
}

/// Find every link reference, in document order.
///
/// Recognizers run in priority order (markdown, attribute, quoted literal);
/// a match overlapping an earlier-starting or higher-priority one is dropped.
pub fn find_references(text: &str) -> Vec<LinkReference<'_>> {
    let mut found: Vec<(usize, LinkReference<'_>)> = Vec::new();

    for caps in MARKDOWN.captures_iter(text) {
        let (Some(all), Some(url)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let wrapper = Wrapper::Markdown {
            text: caps.get(1).map_or("", |m| m.as_str()).to_string(),
            title: caps.get(3).map_or("", |m| m.as_str()).to_string(),
        };
        found.push((0, reference(text, all.range(), url.as_str(), wrapper)));
    }

    for caps in LINKED_IMAGE.captures_iter(text) {
        let (Some(tail), Some(url)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let wrapper = Wrapper::LinkedImage {
            title: caps.get(3).map_or("", |m| m.as_str()).to_string(),
        };
        found.push((0, reference(text, tail.range(), url.as_str(), wrapper)));
    }

    for caps in ATTRIBUTE.captures_iter(text) {
        let Some(all) = caps.get(0) else {
            continue;
        };
        let name = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let (url, quote) = match (caps.get(2), caps.get(3)) {
            (Some(m), _) => (m.as_str(), '"'),
            (None, Some(m)) => (m.as_str(), '\''),
            (None, None) => continue,
        };
        let wrapper = Wrapper::Attribute { name, quote };
        found.push((1, reference(text, all.range(), url, wrapper)));
    }

    for caps in QUOTED.captures_iter(text) {
        let Some(all) = caps.get(0) else {
            continue;
        };
        let (url, quote) = match (caps.get(1), caps.get(2)) {
            (Some(m), _) => (m.as_str(), '"'),
            (None, Some(m)) => (m.as_str(), '\''),
            (None, None) => continue,
        };
        found.push((2, reference(text, all.range(), url, Wrapper::Quoted { quote })));
    }

    found.sort_by_key(|(priority, r)| (r.span.start, *priority));

    let mut accepted: Vec<LinkReference<'_>> = Vec::with_capacity(found.len());
    for (_, candidate) in found {
        let overlaps = accepted
            .last()
            .is_some_and(|prev| candidate.span.start < prev.span.end);
        if !overlaps {
            accepted.push(candidate);
        }
    }
    accepted
}

fn reference<'a>(text: &'a str, span: Range<usize>, url: &'a str, wrapper: Wrapper) -> LinkReference<'a> {
    let line = text[..span.start].matches('\n').count() + 1;
    LinkReference {
        raw: &text[span.clone()],
        span,
        url,
        wrapper,
        line,
    }
}

/// Replace references in `text`.
///
/// `replace` returns the new URL for a reference, or `None` to leave it.
/// Returns the new text and `(reference, new_url)` for every replacement.
pub fn replace_references<'a, F>(text: &'a str, mut replace: F) -> (String, Vec<(LinkReference<'a>, String)>)
where
    F: FnMut(&LinkReference<'a>) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut replaced = Vec::new();
    let mut cursor = 0;

    for reference in find_references(text) {
        let Some(new_url) = replace(&reference) else {
            continue;
        };
        if new_url == reference.url {
            continue;
        }
        out.push_str(&text[cursor..reference.span.start]);
        out.push_str(&reference.wrapper.render(&new_url));
        cursor = reference.span.end;
        replaced.push((reference, new_url));
    }

    out.push_str(&text[cursor..]);
    (out, replaced)
}
