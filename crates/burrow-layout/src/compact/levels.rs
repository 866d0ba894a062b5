//! Level assignment: breadth-first from the root over navigation edges.

use burrow_core::{GraphModel, NodeId};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Levels {
    /// Node ids per level, in discovery order.
    pub by_level: Vec<Vec<NodeId>>,
    level_of: FxHashMap<NodeId, usize>,
    /// The node each one was reached from; absent for the root and for level-0 orphans.
    anchor_of: FxHashMap<NodeId, NodeId>,
    /// Nodes the breadth-first pass could not reach.
    pub repaired: Vec<NodeId>,
}

impl Levels {
    pub fn level(&self, id: &NodeId) -> Option<usize> {
        self.level_of.get(id).copied()
    }

    pub fn anchor(&self, id: &NodeId) -> Option<&NodeId> {
        self.anchor_of.get(id)
    }

    pub fn depth(&self) -> usize {
        self.by_level.len()
    }

    fn push(&mut self, id: NodeId, level: usize, anchor: Option<NodeId>) {
        if self.by_level.len() <= level {
            self.by_level.resize_with(level + 1, Vec::new);
        }
        self.by_level[level].push(id.clone());
        if let Some(anchor) = anchor {
            self.anchor_of.insert(id.clone(), anchor);
        }
        self.level_of.insert(id, level);
    }
}

/// Assigns every node of `model` a level.
///
/// Nodes unreachable from the root are repaired in model order: one level below their creation
/// parent when that parent already has a level, otherwise level 0.
pub fn assign(model: &GraphModel) -> Levels {
    let mut levels = Levels::default();
    let Some(root) = model.root() else {
        return levels;
    };

    let mut queue: VecDeque<NodeId> = VecDeque::from([root.clone()]);
    levels.push(root.clone(), 0, None);
    while let Some(id) = queue.pop_front() {
        let Some(level) = levels.level(&id) else {
            continue;
        };
        let Some(node) = model.node(&id) else {
            continue;
        };
        for child in &node.children {
            if levels.level_of.contains_key(child) || !model.contains(child) {
                continue;
            }
            levels.push(child.clone(), level + 1, Some(id.clone()));
            queue.push_back(child.clone());
        }
    }

    for node in model.nodes() {
        if levels.level_of.contains_key(&node.id) {
            continue;
        }
        let parent = node
            .parent_id
            .as_ref()
            .and_then(|p| levels.level(p).map(|l| (p.clone(), l)));
        match parent {
            Some((parent, level)) => levels.push(node.id.clone(), level + 1, Some(parent)),
            None => {
                tracing::warn!(node = %node.id, "node unreachable from root; assigning level 0");
                levels.push(node.id.clone(), 0, None);
            }
        }
        levels.repaired.push(node.id.clone());
    }
    levels
}
