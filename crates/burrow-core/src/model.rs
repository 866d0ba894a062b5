//! The authoritative node/edge store.
//!
//! All mutations go through [`GraphModel::apply`], a reducer over [`GraphAction`]. Structural
//! invariants (single root, no dangling child ids, no cycles, the active node is always present)
//! are checked there rather than at call sites.

use crate::geom::{Bounds, Point};
use crate::{Error, Result};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Canonical display form of a page title: underscores become spaces, whitespace is collapsed.
pub fn normalize_title(raw: &str) -> String {
    raw.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case-insensitive key used to detect revisits of the same page.
pub fn title_key(raw: &str) -> String {
    normalize_title(raw).to_lowercase()
}

/// Encyclopedia url of an article title.
pub fn article_url(title: &str) -> String {
    format!("https://en.wikipedia.org/wiki/{}", normalize_title(title).replace(' ', "_"))
}

/// A page the user asked to visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub title: String,
    pub url: Option<String>,
}

impl PageRef {
    pub fn new(title: impl AsRef<str>) -> Self {
        Self {
            title: normalize_title(title.as_ref()),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Extracts the article title from an encyclopedia url such as
    /// `https://en.wikipedia.org/wiki/Graph_drawing`.
    pub fn from_url(raw: &str) -> Result<Self> {
        let invalid = || Error::InvalidPageUrl {
            url: raw.to_string(),
        };
        let parsed = url::Url::parse(raw).map_err(|_| invalid())?;
        let host = parsed.host_str().unwrap_or_default();
        if !host.ends_with("wikipedia.org") {
            return Err(invalid());
        }
        let segment = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|s| !s.is_empty())
            .ok_or_else(invalid)?;
        let decoded = percent_encoding::percent_decode_str(segment)
            .decode_utf8()
            .map_err(|_| invalid())?;
        let title = normalize_title(&decoded);
        if title.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            title,
            url: Some(raw.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub target_title: String,
    pub target_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub title: String,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub redirect: Option<Redirect>,
    /// `None` until a layout engine derives it (e.g. right after import).
    pub position: Option<Point>,
    /// Ordered outgoing navigation edges.
    pub children: Vec<NodeId>,
    /// The edge this node was created through; used only as a layout anchor.
    pub parent_id: Option<NodeId>,
}

impl Node {
    pub fn new(id: NodeId, title: impl AsRef<str>) -> Self {
        Self {
            id,
            title: normalize_title(title.as_ref()),
            url: None,
            thumbnail: None,
            redirect: None,
            position: None,
            children: Vec::new(),
            parent_id: None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        self.redirect.is_some()
    }
}

/// Everything needed to create one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNode {
    pub page: PageRef,
    pub parent: Option<NodeId>,
    pub position: Option<Point>,
    pub thumbnail: Option<String>,
    pub redirect: Option<Redirect>,
}

impl NewNode {
    pub fn new(page: PageRef) -> Self {
        Self {
            page,
            parent: None,
            position: None,
            thumbnail: None,
            redirect: None,
        }
    }

    pub fn child_of(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn at(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GraphAction {
    /// Creates a node; a parent gets the new id appended to its `children`.
    InsertNode(NewNode),
    /// Adds a navigation edge between two existing nodes.
    LinkExisting { from: NodeId, to: NodeId },
    /// Moves nodes; either every id is known and all moves apply, or nothing changes.
    Reposition(Vec<(NodeId, Point)>),
    /// Makes a node active and records it in the navigation history.
    SetActive(NodeId),
    SetThumbnail { id: NodeId, thumbnail: Option<String> },
    NavigateBack,
    NavigateForward,
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Inserted(NodeId),
    Linked,
    Repositioned(usize),
    ActiveChanged(NodeId),
    Updated,
    Cleared,
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: IndexMap<NodeId, Node>,
    root: Option<NodeId>,
    active: Option<NodeId>,
    history: Vec<NodeId>,
    history_index: Option<usize>,
    next_id: u64,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: GraphAction) -> Result<Transition> {
        match action {
            GraphAction::InsertNode(new) => self.insert_node(new).map(Transition::Inserted),
            GraphAction::LinkExisting { from, to } => self.link(&from, &to),
            GraphAction::Reposition(moves) => self.reposition(moves),
            GraphAction::SetActive(id) => self.set_active(id),
            GraphAction::SetThumbnail { id, thumbnail } => {
                let node = self
                    .nodes
                    .get_mut(&id)
                    .ok_or_else(|| Error::UnknownNode { id: id.clone() })?;
                node.thumbnail = thumbnail;
                Ok(Transition::Updated)
            }
            GraphAction::NavigateBack => Ok(self.step_history(-1)),
            GraphAction::NavigateForward => Ok(self.step_history(1)),
            GraphAction::Reset => {
                *self = Self::default();
                Ok(Transition::Cleared)
            }
        }
    }

    fn allocate_id(&mut self) -> NodeId {
        loop {
            self.next_id += 1;
            let id = NodeId(self.next_id.to_string());
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    fn insert_node(&mut self, new: NewNode) -> Result<NodeId> {
        match (&new.parent, &self.root) {
            (None, Some(root)) => return Err(Error::RootExists { root: root.clone() }),
            (Some(parent), _) if !self.nodes.contains_key(parent) => {
                return Err(Error::UnknownNode { id: parent.clone() });
            }
            _ => {}
        }

        let id = self.allocate_id();
        let mut node = Node::new(id.clone(), &new.page.title);
        node.url = new.page.url;
        node.thumbnail = new.thumbnail;
        node.redirect = new.redirect;
        node.position = new.position;
        node.parent_id = new.parent.clone();

        match new.parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(&parent) {
                    p.children.push(id.clone());
                }
            }
            None => self.root = Some(id.clone()),
        }
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    /// Inserts a node with a caller-chosen id and no edges. Used when rebuilding a model from a
    /// shared topology; the first node without a parent becomes the root.
    pub(crate) fn insert_detached(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(Error::DuplicateNode { id: node.id });
        }
        if node.parent_id.is_none() && self.root.is_none() {
            self.root = Some(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Recomputes creation anchors after a bulk rebuild: each node's `parent_id` becomes its
    /// first inbound edge in model order, and the root is the first node without one.
    pub(crate) fn rebuild_anchors(&mut self) {
        let mut first_parent: FxHashMap<NodeId, NodeId> = FxHashMap::default();
        for node in self.nodes.values() {
            for child in &node.children {
                first_parent
                    .entry(child.clone())
                    .or_insert_with(|| node.id.clone());
            }
        }
        for node in self.nodes.values_mut() {
            node.parent_id = first_parent.get(&node.id).cloned();
        }
        self.root = self
            .nodes
            .values()
            .find(|n| n.parent_id.is_none())
            .or_else(|| self.nodes.values().next())
            .map(|n| n.id.clone());
    }

    fn link(&mut self, from: &NodeId, to: &NodeId) -> Result<Transition> {
        for id in [from, to] {
            if !self.nodes.contains_key(id) {
                return Err(Error::UnknownNode { id: id.clone() });
            }
        }
        if self.nodes[from].children.contains(to) {
            return Ok(Transition::Unchanged);
        }
        if self.would_create_cycle(from, to) {
            return Err(Error::CycleDetected {
                from: from.clone(),
                to: to.clone(),
            });
        }
        if let Some(node) = self.nodes.get_mut(from) {
            node.children.push(to.clone());
        }
        Ok(Transition::Linked)
    }

    /// An edge `from -> to` closes a cycle iff `from` is reachable from `to`.
    pub fn would_create_cycle(&self, from: &NodeId, to: &NodeId) -> bool {
        if from == to {
            return true;
        }
        let mut seen: FxHashSet<&NodeId> = FxHashSet::default();
        let mut stack: Vec<&NodeId> = vec![to];
        while let Some(cur) = stack.pop() {
            if cur == from {
                return true;
            }
            if !seen.insert(cur) {
                continue;
            }
            if let Some(node) = self.nodes.get(cur) {
                stack.extend(node.children.iter());
            }
        }
        false
    }

    fn reposition(&mut self, moves: Vec<(NodeId, Point)>) -> Result<Transition> {
        if let Some((id, _)) = moves.iter().find(|(id, _)| !self.nodes.contains_key(id)) {
            return Err(Error::UnknownNode { id: id.clone() });
        }
        let count = moves.len();
        for (id, p) in moves {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.position = Some(p);
            }
        }
        Ok(Transition::Repositioned(count))
    }

    fn set_active(&mut self, id: NodeId) -> Result<Transition> {
        if !self.nodes.contains_key(&id) {
            return Err(Error::UnknownNode { id });
        }
        let current = self.history_index.and_then(|i| self.history.get(i));
        if current != Some(&id) {
            let keep = self.history_index.map_or(0, |i| i + 1);
            self.history.truncate(keep);
            self.history.push(id.clone());
            self.history_index = Some(self.history.len() - 1);
        }
        self.active = Some(id.clone());
        Ok(Transition::ActiveChanged(id))
    }

    fn step_history(&mut self, delta: isize) -> Transition {
        let Some(index) = self.history_index else {
            return Transition::Unchanged;
        };
        let Some(next) = index.checked_add_signed(delta) else {
            return Transition::Unchanged;
        };
        let Some(id) = self.history.get(next).cloned() else {
            return Transition::Unchanged;
        };
        self.history_index = Some(next);
        self.active = Some(id.clone());
        Transition::ActiveChanged(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn root(&self) -> Option<&NodeId> {
        self.root.as_ref()
    }

    pub fn active(&self) -> Option<&NodeId> {
        self.active.as_ref()
    }

    pub fn active_node(&self) -> Option<&Node> {
        self.active.as_ref().and_then(|id| self.nodes.get(id))
    }

    pub fn history(&self) -> &[NodeId] {
        &self.history
    }

    pub fn can_navigate_back(&self) -> bool {
        self.history_index.is_some_and(|i| i > 0)
    }

    pub fn can_navigate_forward(&self) -> bool {
        self.history_index
            .is_some_and(|i| i + 1 < self.history.len())
    }

    pub fn find_by_title(&self, title: &str) -> Option<&Node> {
        let key = title_key(title);
        self.nodes.values().find(|n| title_key(&n.title) == key)
    }

    /// Every navigation edge `(from, to)` in model order, including re-links.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        self.nodes
            .values()
            .flat_map(|n| n.children.iter().map(move |c| (&n.id, c)))
    }

    /// Every node with an edge into `id` (not just the creation parent).
    pub fn parents_of<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.nodes
            .values()
            .filter(move |n| n.children.contains(id))
            .map(|n| &n.id)
    }

    pub fn position(&self, id: &NodeId) -> Option<Point> {
        self.nodes.get(id).and_then(|n| n.position)
    }

    /// Positioned nodes in model order.
    pub fn positions(&self) -> impl Iterator<Item = (&NodeId, Point)> {
        self.nodes
            .values()
            .filter_map(|n| n.position.map(|p| (&n.id, p)))
    }

    /// Extent of all positioned nodes, `padding` added on every side.
    pub fn bounds(&self, padding: f64) -> Option<Bounds> {
        Bounds::from_points(self.positions().map(|(_, p)| p)).map(|b| b.padded(padding))
    }
}
