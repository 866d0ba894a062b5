//! Simulation snapshot: an independent copy of node positions plus the link list.
//!
//! The snapshot never writes back into a [`GraphModel`]; tree-mode positions stay untouched while
//! a network or exploration view is relaxing.

use crate::{Error, Result};
use burrow_core::{GraphModel, NodeId, Point};
use rustc_hash::FxHashMap;

const INITIAL_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ForceNode {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Pinned position; the node ignores forces while set.
    pub fixed: Option<Point>,
}

impl ForceNode {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForceLink {
    pub source: usize,
    pub target: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForceGraph {
    pub(crate) nodes: Vec<ForceNode>,
    pub(crate) links: Vec<ForceLink>,
    index: FxHashMap<NodeId, usize>,
}

impl ForceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies every node and edge of `model`. Nodes keep their tree position when they have one.
    pub fn from_model(model: &GraphModel) -> Result<Self> {
        let mut graph = Self::new();
        for node in model.nodes() {
            graph.add_node(node.id.clone(), node.position)?;
        }
        for (from, to) in model.edges() {
            graph.add_link(from, to)?;
        }
        Ok(graph)
    }

    /// Adds a node; without a position it is seeded on a phyllotaxis spiral around the origin.
    pub fn add_node(&mut self, id: NodeId, position: Option<Point>) -> Result<usize> {
        if self.index.contains_key(&id) {
            return Err(Error::DuplicateNode { id });
        }
        let i = self.nodes.len();
        let p = position
            .filter(Point::is_finite)
            .unwrap_or_else(|| phyllotaxis(i));
        self.index.insert(id.clone(), i);
        self.nodes.push(ForceNode {
            id,
            x: p.x,
            y: p.y,
            vx: 0.0,
            vy: 0.0,
            fixed: None,
        });
        Ok(i)
    }

    pub fn add_link(&mut self, from: &NodeId, to: &NodeId) -> Result<()> {
        let source = self.require(from)?;
        let target = self.require(to)?;
        self.links.push(ForceLink { source, target });
        Ok(())
    }

    fn require(&self, id: &NodeId) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| Error::MissingEndpoint { id: id.clone() })
    }

    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node(&self, id: &NodeId) -> Option<&ForceNode> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn nodes(&self) -> &[ForceNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[ForceLink] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn position(&self, id: &NodeId) -> Option<Point> {
        self.node(id).map(ForceNode::position)
    }

    pub fn positions(&self) -> Vec<(NodeId, Point)> {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), n.position()))
            .collect()
    }

    pub(crate) fn pin(&mut self, id: &NodeId, at: Option<Point>) -> Result<()> {
        let i = self.require(id)?;
        let node = &mut self.nodes[i];
        node.fixed = at;
        if let Some(p) = at {
            node.x = p.x;
            node.y = p.y;
            node.vx = 0.0;
            node.vy = 0.0;
        }
        Ok(())
    }
}

/// Deterministic spiral placement so unpositioned nodes never start coincident.
fn phyllotaxis(i: usize) -> Point {
    let angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
    let a = i as f64 * angle;
    Point::new(radius * a.cos(), radius * a.sin())
}
