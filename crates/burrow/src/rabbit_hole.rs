//! Exploration sub-graph ("rabbit hole") rooted at one page.
//!
//! Digging a node asks the link parser for the page's related links and adds the unseen ones as
//! children. The view relaxes with its own force simulation; every change stops the running
//! simulation before a fresh one takes over.

use crate::{Error, Result};
use burrow_core::model::title_key;
use burrow_core::services::capped_related_links;
use burrow_core::{ContentSource, ForceConfig, LinkParser, NodeId, Point, RelatedLink};
use burrow_force::{ForceGraph, ForceSimulation, TickFrame};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// Distance from a dug node at which its new children are seeded.
const SEED_RADIUS: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RabbitNode {
    pub id: NodeId,
    pub title: String,
    pub url: Option<String>,
    pub explored: bool,
    pub related: Vec<RelatedLink>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DigOutcome {
    Expanded { added: Vec<NodeId> },
    AlreadyExplored,
    /// The page content could not be fetched.
    Unavailable,
    NoRelatedLinks,
}

/// `rabbit-<title>` with whitespace runs replaced by `-`.
pub fn rabbit_id(title: &str) -> NodeId {
    let slug = title.split_whitespace().collect::<Vec<_>>().join("-");
    NodeId::new(format!("rabbit-{slug}"))
}

#[derive(Debug)]
pub struct RabbitHole {
    nodes: IndexMap<NodeId, RabbitNode>,
    links: Vec<(NodeId, NodeId)>,
    positions: IndexMap<NodeId, Point>,
    root: NodeId,
    cfg: ForceConfig,
    center: Point,
    simulation: Option<ForceSimulation>,
}

impl RabbitHole {
    /// Opens a view containing only `title`, placed at `center`.
    pub fn open(title: &str, url: Option<String>, cfg: ForceConfig, center: Point) -> Self {
        let root = rabbit_id(title);
        let mut nodes = IndexMap::new();
        nodes.insert(
            root.clone(),
            RabbitNode {
                id: root.clone(),
                title: title.to_string(),
                url,
                explored: false,
                related: Vec::new(),
            },
        );
        let mut positions = IndexMap::new();
        positions.insert(root.clone(), center);
        Self {
            nodes,
            links: Vec::new(),
            positions,
            root,
            cfg,
            center,
            simulation: None,
        }
    }

    pub fn root(&self) -> &NodeId {
        &self.root
    }

    pub fn node(&self, id: &NodeId) -> Option<&RabbitNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RabbitNode> {
        self.nodes.values()
    }

    pub fn links(&self) -> &[(NodeId, NodeId)] {
        &self.links
    }

    pub fn position(&self, id: &NodeId) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn simulation(&self) -> Option<&ForceSimulation> {
        self.simulation.as_ref()
    }

    pub fn is_relaxing(&self) -> bool {
        self.simulation.as_ref().is_some_and(|s| s.is_running())
    }

    /// Expands `id` with its related links (at most 8, deduplicated against the view).
    pub fn dig(
        &mut self,
        id: &NodeId,
        source: &dyn ContentSource,
        parser: &dyn LinkParser,
    ) -> Result<DigOutcome> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| Error::UnknownRabbitNode { id: id.clone() })?;
        if node.explored {
            return Ok(DigOutcome::AlreadyExplored);
        }
        let Some(content) = source.fetch_content(&node.title) else {
            tracing::debug!(node = %id, "rabbit-hole page unavailable");
            return Ok(DigOutcome::Unavailable);
        };
        let related = capped_related_links(parser, &content);
        if related.is_empty() {
            return Ok(DigOutcome::NoRelatedLinks);
        }

        let known: FxHashSet<String> = self.nodes.values().map(|n| title_key(&n.title)).collect();
        let fresh: Vec<&RelatedLink> = related
            .iter()
            .filter(|l| !known.contains(&title_key(&l.title)))
            .collect();

        let anchor = self.position(id).unwrap_or(self.center);
        let mut added = Vec::with_capacity(fresh.len());
        for (k, link) in fresh.iter().enumerate() {
            let child = self.unique_id(&link.title);
            let angle = std::f64::consts::TAU * k as f64 / fresh.len() as f64;
            self.positions.insert(
                child.clone(),
                Point::new(
                    anchor.x + SEED_RADIUS * angle.cos(),
                    anchor.y + SEED_RADIUS * angle.sin(),
                ),
            );
            self.nodes.insert(
                child.clone(),
                RabbitNode {
                    id: child.clone(),
                    title: link.title.clone(),
                    url: Some(link.url.clone()),
                    explored: false,
                    related: Vec::new(),
                },
            );
            self.links.push((id.clone(), child.clone()));
            added.push(child);
        }

        if let Some(node) = self.nodes.get_mut(id) {
            node.explored = true;
            node.related = related;
        }
        self.restart()?;
        tracing::debug!(node = %id, added = added.len(), "dug rabbit-hole node");
        Ok(DigOutcome::Expanded { added })
    }

    fn unique_id(&self, title: &str) -> NodeId {
        let base = rabbit_id(title);
        if !self.nodes.contains_key(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = NodeId::new(format!("{base}-{n}"));
            if !self.nodes.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Stops the running simulation and starts a fresh one from the current positions.
    pub fn restart(&mut self) -> Result<()> {
        self.stop();
        let mut graph = ForceGraph::new();
        for id in self.nodes.keys() {
            graph.add_node(id.clone(), self.positions.get(id).copied())?;
        }
        for (from, to) in &self.links {
            graph.add_link(from, to)?;
        }
        self.simulation = Some(ForceSimulation::new(graph, self.cfg.clone(), self.center)?);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(sim) = self.simulation.take() {
            sim.stop();
        }
    }

    /// Advances the view's simulation one tick and records the published positions.
    pub fn tick(&mut self) -> Option<TickFrame> {
        let frame = self.simulation.as_mut()?.tick()?;
        for (id, p) in &frame.positions {
            self.positions.insert(id.clone(), *p);
        }
        Some(frame)
    }

    /// Ticks until the simulation settles; returns the number of ticks taken.
    pub fn settle(&mut self) -> usize {
        let mut ticks = 0;
        while self.tick().is_some() {
            ticks += 1;
        }
        ticks
    }
}
