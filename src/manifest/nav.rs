//! Typed navigation tree.
//!
//! The manifest's `navigation` value is parsed into [`NavNode`]s up front;
//! anything that is not a recognized tab, group or page is rejected with the
//! JSON path of the offending item. Every operation returns a new tree.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use thiserror::Error;

const ROOT: &str = "navigation";

/// Child lists a tab may not carry; only `groups` is understood.
const FOREIGN_TAB_KEYS: &[&str] = &["pages", "menu", "anchors", "dropdowns", "tabs"];

/// Child lists a group may not carry; only `pages` is understood.
const FOREIGN_GROUP_KEYS: &[&str] = &["groups", "tabs", "menu"];

/// An unrecognized navigation shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct ShapeError {
    /// e.g. `navigation.tabs[1].groups[0].pages[3]`
    pub path: String,
    pub reason: String,
}

impl ShapeError {
    fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A labelled container (tab or group).
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub label: String,
    pub children: Vec<NavNode>,
    /// The original object, so unrelated keys (icon, expanded, ...) keep
    /// their values and positions on write-back.
    pub attrs: Map<String, Value>,
}

impl Section {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
            attrs: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavNode {
    Tab(Section),
    Group(Section),
    Page(String),
}

impl NavNode {
    fn section_mut(&mut self) -> Option<&mut Section> {
        match self {
            Self::Tab(s) | Self::Group(s) => Some(s),
            Self::Page(_) => None,
        }
    }
}

/// Top-level shape of the navigation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `{"tabs": [{"tab", "groups": [...]}]}`
    Tabs,
    /// `{"groups": [...]}`
    Groups,
    /// A bare array of groups.
    Legacy,
}

/// Where a page goes in [`Navigation::with_page`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLocation {
    /// Ignored for layouts without tabs.
    pub tab: String,
    pub group: String,
    pub subgroup: Option<String>,
}

/// Removal counts of [`Navigation::pruned`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PruneStats {
    pub groups_removed: usize,
    pub tabs_removed: usize,
}

impl PruneStats {
    pub fn is_empty(&self) -> bool {
        self.groups_removed == 0 && self.tabs_removed == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub layout: Layout,
    pub nodes: Vec<NavNode>,
    /// Root object keys for the object layouts.
    attrs: Map<String, Value>,
}

// ============================================================================
// Parsing and serialization
// ============================================================================

impl Navigation {
    /// Parse the manifest's `navigation` value.
    pub fn from_value(value: &Value) -> Result<Self, ShapeError> {
        match value {
            Value::Array(items) => Ok(Self {
                layout: Layout::Legacy,
                nodes: parse_groups(items, ROOT)?,
                attrs: Map::new(),
            }),
            Value::Object(map) => {
                let (layout, nodes) = if let Some(tabs) = map.get("tabs") {
                    let path = format!("{ROOT}.tabs");
                    let tabs = as_list(tabs, &path)?
                        .iter()
                        .enumerate()
                        .map(|(i, tab)| parse_tab(tab, &format!("{path}[{i}]")))
                        .collect::<Result<_, _>>()?;
                    (Layout::Tabs, tabs)
                } else if let Some(groups) = map.get("groups") {
                    let path = format!("{ROOT}.groups");
                    (Layout::Groups, parse_groups(as_list(groups, &path)?, &path)?)
                } else {
                    return Err(ShapeError::new(ROOT, "expected `tabs` or `groups`"));
                };
                Ok(Self {
                    layout,
                    nodes,
                    attrs: map.clone(),
                })
            }
            _ => Err(ShapeError::new(ROOT, "expected an object or a list")),
        }
    }

    /// Serialize back to the manifest shape.
    pub fn to_value(&self) -> Value {
        let nodes: Vec<Value> = self.nodes.iter().map(node_value).collect();
        match self.layout {
            Layout::Legacy => Value::Array(nodes),
            Layout::Tabs | Layout::Groups => {
                let key = if self.layout == Layout::Tabs { "tabs" } else { "groups" };
                let mut map = self.attrs.clone();
                map.insert(key.to_string(), Value::Array(nodes));
                Value::Object(map)
            }
        }
    }
}

fn as_list<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, ShapeError> {
    value
        .as_array()
        .ok_or_else(|| ShapeError::new(path, "expected a list"))
}

fn parse_tab(value: &Value, path: &str) -> Result<NavNode, ShapeError> {
    let map = value
        .as_object()
        .ok_or_else(|| ShapeError::new(path, "expected a tab object"))?;
    let label = map
        .get("tab")
        .and_then(Value::as_str)
        .ok_or_else(|| ShapeError::new(path, "tab without a string `tab` label"))?;
    reject_foreign_keys(map, FOREIGN_TAB_KEYS, path, "tab")?;

    let children = match map.get("groups") {
        Some(groups) => {
            let groups_path = format!("{path}.groups");
            parse_groups(as_list(groups, &groups_path)?, &groups_path)?
        }
        None => Vec::new(),
    };

    Ok(NavNode::Tab(Section {
        label: label.to_string(),
        children,
        attrs: map.clone(),
    }))
}

fn parse_groups(items: &[Value], path: &str) -> Result<Vec<NavNode>, ShapeError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_group(item, &format!("{path}[{i}]")))
        .collect()
}

fn parse_group(value: &Value, path: &str) -> Result<NavNode, ShapeError> {
    let map = value
        .as_object()
        .ok_or_else(|| ShapeError::new(path, "expected a group object"))?;
    let label = map
        .get("group")
        .and_then(Value::as_str)
        .ok_or_else(|| ShapeError::new(path, "group without a string `group` label"))?;
    reject_foreign_keys(map, FOREIGN_GROUP_KEYS, path, "group")?;

    let children = match map.get("pages") {
        Some(pages) => {
            let pages_path = format!("{path}.pages");
            as_list(pages, &pages_path)?
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let item_path = format!("{pages_path}[{i}]");
                    match item {
                        Value::String(page) => Ok(NavNode::Page(page.clone())),
                        Value::Object(_) => parse_group(item, &item_path),
                        _ => Err(ShapeError::new(item_path, "expected a page path or a group")),
                    }
                })
                .collect::<Result<_, _>>()?
        }
        None => Vec::new(),
    };

    Ok(NavNode::Group(Section {
        label: label.to_string(),
        children,
        attrs: map.clone(),
    }))
}

/// Nested lists the tree cannot represent would be dropped on write-back.
fn reject_foreign_keys(
    map: &Map<String, Value>,
    keys: &[&str],
    path: &str,
    kind: &str,
) -> Result<(), ShapeError> {
    match keys.iter().find(|key| map.contains_key(**key)) {
        Some(key) => Err(ShapeError::new(
            format!("{path}.{key}"),
            format!("`{key}` is not supported inside a {kind}"),
        )),
        None => Ok(()),
    }
}

fn node_value(node: &NavNode) -> Value {
    match node {
        NavNode::Page(page) => Value::String(page.clone()),
        NavNode::Tab(section) => section_value(section, "tab", "groups"),
        NavNode::Group(section) => section_value(section, "group", "pages"),
    }
}

fn section_value(section: &Section, label_key: &str, children_key: &str) -> Value {
    let mut map = section.attrs.clone();
    map.insert(label_key.to_string(), Value::String(section.label.clone()));
    if !section.children.is_empty() || map.contains_key(children_key) {
        let children = section.children.iter().map(node_value).collect();
        map.insert(children_key.to_string(), Value::Array(children));
    }
    Value::Object(map)
}

// ============================================================================
// Queries and transformations
// ============================================================================

impl Navigation {
    /// Every page path, at any depth, in document order.
    pub fn pages(&self) -> Vec<&str> {
        let mut pages = Vec::new();
        collect_pages(&self.nodes, &mut pages);
        pages
    }

    /// Every distinct page path.
    pub fn page_set(&self) -> BTreeSet<String> {
        self.pages().into_iter().map(str::to_string).collect()
    }

    /// Drop groups without pages (bottom-up, any depth), then tabs without
    /// groups.
    pub fn pruned(&self) -> (Self, PruneStats) {
        let mut stats = PruneStats::default();
        let nodes = prune_nodes(&self.nodes, &mut stats);
        (
            Self {
                layout: self.layout,
                nodes,
                attrs: self.attrs.clone(),
            },
            stats,
        )
    }

    /// Remove the first occurrence of `page`. A nested group emptied by the
    /// removal is dropped; top-level groups are left for [`pruned`].
    ///
    /// Returns `None` when the page is not in the tree.
    ///
    /// [`pruned`]: Navigation::pruned
    pub fn without_page(&self, page: &str) -> Option<Self> {
        let mut next = self.clone();
        let removed = next.nodes.iter_mut().any(|node| match node {
            NavNode::Tab(tab) => tab
                .children
                .iter_mut()
                .filter_map(NavNode::section_mut)
                .any(|group| remove_page(group, page)),
            NavNode::Group(group) => remove_page(group, page),
            NavNode::Page(_) => false,
        });
        removed.then_some(next)
    }

    /// Add `page` at `location`, creating the tab, group and subgroup when
    /// missing. A page already present there is not added twice.
    pub fn with_page(&self, location: &NavLocation, page: &str) -> Self {
        let mut trail = Vec::with_capacity(3);
        if self.layout == Layout::Tabs {
            trail.push(NavNode::Tab(Section::new(&location.tab)));
        }
        trail.push(NavNode::Group(Section::new(&location.group)));
        if let Some(subgroup) = &location.subgroup {
            trail.push(NavNode::Group(Section::new(subgroup)));
        }

        let mut next = self.clone();
        insert_page(&mut next.nodes, &trail, page);
        next
    }
}

fn collect_pages<'a>(nodes: &'a [NavNode], out: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            NavNode::Page(page) => out.push(page),
            NavNode::Tab(section) | NavNode::Group(section) => {
                collect_pages(&section.children, out);
            }
        }
    }
}

fn prune_nodes(nodes: &[NavNode], stats: &mut PruneStats) -> Vec<NavNode> {
    nodes
        .iter()
        .filter_map(|node| match node {
            NavNode::Page(page) => Some(NavNode::Page(page.clone())),
            NavNode::Group(section) => {
                let children = prune_nodes(&section.children, stats);
                if children.is_empty() {
                    stats.groups_removed += 1;
                    None
                } else {
                    Some(NavNode::Group(Section {
                        children,
                        ..section.clone()
                    }))
                }
            }
            NavNode::Tab(section) => {
                let children = prune_nodes(&section.children, stats);
                if children.is_empty() {
                    stats.tabs_removed += 1;
                    None
                } else {
                    Some(NavNode::Tab(Section {
                        children,
                        ..section.clone()
                    }))
                }
            }
        })
        .collect()
}

/// Remove `page` from a group: direct pages first, then nested groups.
fn remove_page(group: &mut Section, page: &str) -> bool {
    if let Some(idx) = group
        .children
        .iter()
        .position(|n| matches!(n, NavNode::Page(p) if p == page))
    {
        group.children.remove(idx);
        return true;
    }

    for idx in 0..group.children.len() {
        let NavNode::Group(nested) = &mut group.children[idx] else {
            continue;
        };
        if remove_page(nested, page) {
            if nested.children.is_empty() {
                group.children.remove(idx);
            }
            return true;
        }
    }
    false
}

/// Walk (creating as needed) the sections named by `trail`, then append
/// `page` to the innermost one.
fn insert_page(nodes: &mut Vec<NavNode>, trail: &[NavNode], page: &str) {
    let Some((wanted, rest)) = trail.split_first() else {
        if !nodes
            .iter()
            .any(|n| matches!(n, NavNode::Page(p) if p == page))
        {
            nodes.push(NavNode::Page(page.to_string()));
        }
        return;
    };

    if !nodes.iter().any(|n| same_kind_and_label(n, wanted)) {
        nodes.push(wanted.clone());
    }
    if let Some(section) = nodes
        .iter_mut()
        .filter(|n| same_kind_and_label(n, wanted))
        .find_map(NavNode::section_mut)
    {
        insert_page(&mut section.children, rest, page);
    }
}

fn same_kind_and_label(node: &NavNode, wanted: &NavNode) -> bool {
    match (node, wanted) {
        (NavNode::Tab(a), NavNode::Tab(b)) | (NavNode::Group(a), NavNode::Group(b)) => {
            a.label == b.label
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn top_labels(nav: &Navigation) -> Vec<&str> {
        nav.nodes
            .iter()
            .filter_map(|node| match node {
                NavNode::Tab(s) | NavNode::Group(s) => Some(s.label.as_str()),
                NavNode::Page(_) => None,
            })
            .collect()
    }

    fn sample() -> Value {
        json!({
            "tabs": [
                {
                    "tab": "Container Engine",
                    "icon": "box",
                    "groups": [
                        {
                            "group": "Tutorials",
                            "pages": [
                                "container-engine/tutorials/quickstart",
                                {
                                    "group": "Advanced",
                                    "pages": ["container-engine/tutorials/advanced/gpu"]
                                }
                            ]
                        },
                        { "group": "Empty", "pages": [] }
                    ]
                },
                {
                    "tab": "Storage",
                    "groups": [
                        { "group": "Nested only", "pages": [{ "group": "Inner", "pages": [] }] }
                    ]
                }
            ],
            "global": { "anchors": [] }
        })
    }

    #[test]
    fn test_parse_and_round_trip() {
        let value = sample();
        let nav = Navigation::from_value(&value).unwrap();
        assert_eq!(nav.layout, Layout::Tabs);
        assert_eq!(top_labels(&nav), vec!["Container Engine", "Storage"]);
        assert_eq!(nav.to_value(), value);
    }

    #[test]
    fn test_round_trip_keeps_key_order() {
        let value = sample();
        let nav = Navigation::from_value(&value).unwrap();
        let text = serde_json::to_string(&nav.to_value()).unwrap();
        assert!(text.starts_with(r#"{"tabs":[{"tab":"Container Engine","icon":"box","groups""#));
    }

    #[test]
    fn test_pages_any_depth() {
        let nav = Navigation::from_value(&sample()).unwrap();
        assert_eq!(
            nav.pages(),
            vec![
                "container-engine/tutorials/quickstart",
                "container-engine/tutorials/advanced/gpu"
            ]
        );
    }

    #[test]
    fn test_groups_and_legacy_layouts() {
        let groups = json!({"groups": [{"group": "A", "pages": ["a"]}]});
        let nav = Navigation::from_value(&groups).unwrap();
        assert_eq!(nav.layout, Layout::Groups);
        assert_eq!(nav.pages(), vec!["a"]);
        assert_eq!(nav.to_value(), groups);

        let legacy = json!([{"group": "A", "pages": ["a", "b"]}]);
        let nav = Navigation::from_value(&legacy).unwrap();
        assert_eq!(nav.layout, Layout::Legacy);
        assert_eq!(nav.page_set().len(), 2);
        assert_eq!(nav.to_value(), legacy);
    }

    #[test]
    fn test_rejects_unrecognized_shapes() {
        let err = Navigation::from_value(&json!({
            "tabs": [
                {"tab": "A", "groups": []},
                {"tab": "B", "groups": [{"group": "G", "pages": ["a", "b", "c", 42]}]}
            ]
        }))
        .unwrap_err();
        assert_eq!(err.path, "navigation.tabs[1].groups[0].pages[3]");

        let err = Navigation::from_value(&json!({"tabs": [{"groups": []}]})).unwrap_err();
        assert_eq!(err.path, "navigation.tabs[0]");

        let err = Navigation::from_value(&json!([{"pages": ["a"]}])).unwrap_err();
        assert_eq!(err.path, "navigation[0]");

        let err = Navigation::from_value(&json!({"tabs": [{"tab": "A", "groups": {}}]}))
            .unwrap_err();
        assert_eq!(err.path, "navigation.tabs[0].groups");

        assert!(Navigation::from_value(&json!({"anchors": []})).is_err());
        assert!(Navigation::from_value(&json!("nav")).is_err());
    }

    #[test]
    fn test_rejects_tab_level_pages() {
        let err = Navigation::from_value(&json!({
            "tabs": [{"tab": "API", "pages": ["api/intro", "api/auth"]}]
        }))
        .unwrap_err();
        assert_eq!(err.path, "navigation.tabs[0].pages");
        assert!(err.reason.contains("`pages`"));

        let err = Navigation::from_value(&json!({
            "groups": [{"group": "G", "pages": ["a"], "groups": [{"group": "H", "pages": ["b"]}]}]
        }))
        .unwrap_err();
        assert_eq!(err.path, "navigation.groups[0].groups");
    }

    #[test]
    fn test_tab_attributes_still_accepted() {
        let nav = Navigation::from_value(&json!({
            "tabs": [{"tab": "API", "icon": "code", "groups": [{"group": "G", "pages": ["a"]}]}]
        }))
        .unwrap();
        assert_eq!(nav.pages(), vec!["a"]);
    }

    #[test]
    fn test_pruned() {
        let nav = Navigation::from_value(&sample()).unwrap();
        let (pruned, stats) = nav.pruned();

        assert_eq!(stats.groups_removed, 3);
        assert_eq!(stats.tabs_removed, 1);
        assert_eq!(top_labels(&pruned), vec!["Container Engine"]);
        assert_eq!(pruned.pages(), nav.pages());

        let (again, stats) = pruned.pruned();
        assert!(stats.is_empty());
        assert_eq!(again, pruned);
    }

    #[test]
    fn test_without_page() {
        let nav = Navigation::from_value(&sample()).unwrap();

        let next = nav
            .without_page("container-engine/tutorials/advanced/gpu")
            .unwrap();
        assert_eq!(next.pages(), vec!["container-engine/tutorials/quickstart"]);
        // the emptied nested group is gone
        let value = next.to_value();
        assert_eq!(
            value["tabs"][0]["groups"][0]["pages"],
            json!(["container-engine/tutorials/quickstart"])
        );

        assert!(nav.without_page("nope").is_none());
        // the original is untouched
        assert_eq!(nav.pages().len(), 2);
    }

    #[test]
    fn test_without_page_first_occurrence_only() {
        let nav =
            Navigation::from_value(&json!([{"group": "A", "pages": ["x", "y", "x"]}])).unwrap();
        let next = nav.without_page("x").unwrap();
        assert_eq!(next.pages(), vec!["y", "x"]);
    }

    #[test]
    fn test_with_page_existing_location() {
        let nav = Navigation::from_value(&sample()).unwrap();
        let location = NavLocation {
            tab: "Container Engine".into(),
            group: "Tutorials".into(),
            subgroup: Some("Advanced".into()),
        };
        let next = nav.with_page(&location, "container-engine/tutorials/advanced/tpu");
        assert_eq!(
            next.to_value()["tabs"][0]["groups"][0]["pages"][1]["pages"],
            json!([
                "container-engine/tutorials/advanced/gpu",
                "container-engine/tutorials/advanced/tpu"
            ])
        );

        let twice = next.with_page(&location, "container-engine/tutorials/advanced/tpu");
        assert_eq!(twice, next);
    }

    #[test]
    fn test_with_page_creates_location() {
        let nav = Navigation::from_value(&sample()).unwrap();
        let location = NavLocation {
            tab: "Transcription".into(),
            group: "How-to Guides".into(),
            subgroup: None,
        };
        let next = nav.with_page(&location, "transcription/how-to-guides/upload");
        assert_eq!(
            next.to_value()["tabs"][2],
            json!({
                "tab": "Transcription",
                "groups": [{"group": "How-to Guides", "pages": ["transcription/how-to-guides/upload"]}]
            })
        );
    }

    #[test]
    fn test_with_page_tabless_ignores_tab() {
        let nav = Navigation::from_value(&json!([{"group": "A", "pages": ["a"]}])).unwrap();
        let location = NavLocation {
            tab: "Ignored".into(),
            group: "A".into(),
            subgroup: None,
        };
        let next = nav.with_page(&location, "b");
        assert_eq!(next.to_value(), json!([{"group": "A", "pages": ["a", "b"]}]));
    }
}
