//! Shareable graph topology.
//!
//! A shared state carries titles and edges only. Positions are never serialized: the importer
//! rebuilds the model and a layout engine derives coordinates afterwards.

use crate::model::{GraphAction, GraphModel, Node, NodeId};
use crate::services::ContentSource;
use crate::{Error, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedNode {
    pub id: NodeId,
    pub title: String,
    #[serde(default)]
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedTopology {
    pub nodes: Vec<SharedNode>,
    #[serde(default)]
    pub active_node_id: Option<NodeId>,
}

/// What an import had to discard to produce a well-formed model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportReport {
    /// Nodes whose content could not be fetched, plus repeated ids.
    pub dropped_nodes: Vec<NodeId>,
    /// Child references that pointed at a dropped or unknown node.
    pub pruned_edges: usize,
    /// Edges skipped because they would have closed a cycle.
    pub rejected_cycle_edges: usize,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.dropped_nodes.is_empty() && self.pruned_edges == 0 && self.rejected_cycle_edges == 0
    }
}

impl SharedTopology {
    pub fn from_json(text: &str) -> Result<Self> {
        let topology: Self = serde_json::from_str(text)?;
        if topology.nodes.is_empty() && topology.active_node_id.is_some() {
            return Err(Error::InvalidShareState {
                message: "active node set on an empty graph".to_string(),
            });
        }
        Ok(topology)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuilds a model, resolving every title against `source`.
    ///
    /// Unfetchable nodes are dropped and edges into them pruned. Edges that would close a cycle
    /// are skipped in list order. Each node's creation anchor is its first inbound edge, and the
    /// root is the first node with none. The shared active node is restored when it survived,
    /// otherwise the root becomes active. Positions are left unset.
    pub fn import(&self, source: &dyn ContentSource) -> Result<(GraphModel, ImportReport)> {
        let mut report = ImportReport::default();
        let mut model = GraphModel::new();

        let mut seen: FxHashSet<&NodeId> = FxHashSet::default();
        for shared in &self.nodes {
            if !seen.insert(&shared.id) {
                tracing::warn!(
                    id = %shared.id,
                    "shared state repeats a node id; keeping the first"
                );
                report.dropped_nodes.push(shared.id.clone());
                continue;
            }
            let Some(page) = source.load_page(&shared.title) else {
                tracing::warn!(
                    id = %shared.id,
                    title = %shared.title,
                    "dropping shared node: content unavailable"
                );
                report.dropped_nodes.push(shared.id.clone());
                continue;
            };
            let mut node = Node::new(shared.id.clone(), &shared.title);
            node.url = page.url;
            node.thumbnail = page.thumbnail;
            node.redirect = page.redirect;
            model.insert_detached(node)?;
        }

        let mut kept: FxHashSet<&NodeId> = FxHashSet::default();
        for shared in &self.nodes {
            if !model.contains(&shared.id) || !kept.insert(&shared.id) {
                continue;
            }
            for child in &shared.children {
                if !model.contains(child) {
                    report.pruned_edges += 1;
                    continue;
                }
                let action = GraphAction::LinkExisting {
                    from: shared.id.clone(),
                    to: child.clone(),
                };
                match model.apply(action) {
                    Ok(_) => {}
                    Err(Error::CycleDetected { from, to }) => {
                        tracing::warn!(%from, %to, "dropping shared edge that closes a cycle");
                        report.rejected_cycle_edges += 1;
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        model.rebuild_anchors();

        let active = self
            .active_node_id
            .as_ref()
            .filter(|id| model.contains(id))
            .or(model.root())
            .cloned();
        if let Some(id) = active {
            model.apply(GraphAction::SetActive(id))?;
        }

        if !report.is_clean() {
            tracing::info!(
                dropped = report.dropped_nodes.len(),
                pruned = report.pruned_edges,
                cycles = report.rejected_cycle_edges,
                "imported shared state with repairs"
            );
        }
        Ok((model, report))
    }
}

impl GraphModel {
    /// Titles and edges of every node, in model order. Positions are not part of a share.
    pub fn export_topology(&self) -> SharedTopology {
        SharedTopology {
            nodes: self
                .nodes()
                .map(|n| SharedNode {
                    id: n.id.clone(),
                    title: n.title.clone(),
                    children: n.children.clone(),
                })
                .collect(),
            active_node_id: self.active().cloned(),
        }
    }
}
