//! One browsing session: the graph, its camera, and whichever layout engine currently owns the
//! positions.
//!
//! Tree mode positions live in the [`GraphModel`]. Network mode relaxes a snapshot of the whole
//! graph; the rabbit hole relaxes its own sub-graph. Each view has at most one simulation, and a
//! running one is always stopped before anything else writes positions for that view.

use crate::rabbit_hole::{DigOutcome, RabbitHole};
use crate::{Error, Result};
use burrow_core::services::{TopicAnalysis, TopicError};
use burrow_core::{
    Camera, ContentSource, DeviceClass, GraphAction, GraphModel, ImportReport, LayoutConfig,
    LinkParser, NewNode, NodeId, PageRef, Point, SearchHit, SharedTopology, Size, TopicExtractor,
    Transition,
};
use burrow_force::{ForceSimulation, TickFrame, network_simulation};
use burrow_layout::compact::{self, CompactReport};
use burrow_layout::{PanLimits, PanOutcome, ViewportController, collision, placer};

const DEFAULT_VIEWPORT: Size = Size::new(1280.0, 800.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Tree,
    /// Force-relaxed snapshot of the whole graph.
    Network,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisitOutcome {
    Created(NodeId),
    /// The title was already in the graph. `linked` is set when a new edge from the previously
    /// active node was added.
    Revisited { id: NodeId, linked: bool },
    /// The content source had nothing for this title; the graph is unchanged.
    Unavailable,
}

pub struct Explorer<S, P> {
    source: S,
    parser: P,
    config: LayoutConfig,
    model: GraphModel,
    viewport: ViewportController,
    mode: ViewMode,
    network: Option<ForceSimulation>,
    rabbit_hole: Option<RabbitHole>,
}

impl<S: ContentSource, P: LinkParser> Explorer<S, P> {
    pub fn new(source: S, parser: P) -> Self {
        let config = LayoutConfig::default();
        let viewport = ViewportController::new(
            DEFAULT_VIEWPORT,
            DeviceClass::Desktop,
            config.viewport.clone(),
        );
        Self {
            source,
            parser,
            config,
            model: GraphModel::new(),
            viewport,
            mode: ViewMode::Tree,
            network: None,
            rabbit_hole: None,
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.viewport = ViewportController::new(
            self.viewport.viewport(),
            self.viewport.device(),
            config.viewport.clone(),
        );
        self.config = config;
        self.viewport.recompute(&self.model);
        self
    }

    pub fn with_device(mut self, device: DeviceClass) -> Self {
        self.viewport.set_device(device, &self.model);
        self
    }

    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport.resize(viewport, &self.model);
        self
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn device(&self) -> DeviceClass {
        self.viewport.device()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn camera(&self) -> Camera {
        self.viewport.camera()
    }

    pub fn pan_limits(&self) -> PanLimits {
        self.viewport.limits()
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn network(&self) -> Option<&ForceSimulation> {
        self.network.as_ref()
    }

    pub fn rabbit_hole(&self) -> Option<&RabbitHole> {
        self.rabbit_hole.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.source.search(query)
    }

    /// Navigates to `page` from the active node.
    ///
    /// A title already in the graph becomes active again, linked from the previous active node
    /// when that adds a new edge without closing a cycle. A new title is fetched, placed, and
    /// collision-resolved. Unfetchable pages leave everything untouched.
    pub fn visit(&mut self, mut page: PageRef) -> Result<VisitOutcome> {
        if let Some(existing) = self.model.find_by_title(&page.title).map(|n| n.id.clone()) {
            return self.revisit(existing);
        }

        let Some(data) = self.source.load_page(&page.title) else {
            tracing::debug!(title = %page.title, "page unavailable; graph unchanged");
            return Ok(VisitOutcome::Unavailable);
        };

        let profile = self.config.profile(self.device()).clone();
        let parent = self.model.active().cloned();
        let position = placer::propose(&self.model, parent.as_ref(), &profile);
        if page.url.is_none() {
            page.url = data.url;
        }
        let mut new = NewNode::new(page).at(position);
        new.parent = parent;
        new.thumbnail = data.thumbnail;
        new.redirect = data.redirect;

        let Transition::Inserted(id) = self.model.apply(GraphAction::InsertNode(new))? else {
            return Ok(VisitOutcome::Unavailable);
        };
        collision::resolve(&mut self.model, &id, &profile)?;
        self.model.apply(GraphAction::SetActive(id.clone()))?;
        self.after_topology_change()?;
        Ok(VisitOutcome::Created(id))
    }

    pub fn visit_url(&mut self, url: &str) -> Result<VisitOutcome> {
        self.visit(PageRef::from_url(url)?)
    }

    fn revisit(&mut self, id: NodeId) -> Result<VisitOutcome> {
        let mut linked = false;
        if let Some(active) = self.model.active().cloned() {
            let already = self
                .model
                .node(&active)
                .is_some_and(|n| n.children.contains(&id));
            if active != id && !already {
                if self.model.would_create_cycle(&active, &id) {
                    tracing::debug!(
                        from = %active,
                        to = %id,
                        "revisit would close a cycle; not linking"
                    );
                } else {
                    linked = self.model.apply(GraphAction::LinkExisting {
                        from: active,
                        to: id.clone(),
                    })? == Transition::Linked;
                }
            }
        }
        self.model.apply(GraphAction::SetActive(id.clone()))?;
        if linked {
            self.after_topology_change()?;
        }
        Ok(VisitOutcome::Revisited { id, linked })
    }

    /// Recomputes limits and hands a changed topology to the network view, if it is showing.
    fn after_topology_change(&mut self) -> Result<()> {
        self.viewport.recompute(&self.model);
        if self.mode == ViewMode::Network {
            self.start_network()?;
        }
        Ok(())
    }

    pub fn navigate_back(&mut self) -> Result<Transition> {
        Ok(self.model.apply(GraphAction::NavigateBack)?)
    }

    pub fn navigate_forward(&mut self) -> Result<Transition> {
        Ok(self.model.apply(GraphAction::NavigateForward)?)
    }

    /// Relayouts the whole tree. Any running network simulation is stopped first and the view
    /// returns to tree mode.
    pub fn compact(&mut self) -> Result<CompactReport> {
        self.stop_network();
        self.mode = ViewMode::Tree;
        let profile = self.config.profile(self.device()).clone();
        let report = compact::run(&mut self.model, &profile)?;
        self.viewport.recompute(&self.model);
        Ok(report)
    }

    /// Switches views. Entering network mode starts a fresh simulation; leaving it discards the
    /// snapshot.
    pub fn set_mode(&mut self, mode: ViewMode) -> Result<()> {
        match mode {
            ViewMode::Tree => self.stop_network(),
            ViewMode::Network => self.start_network()?,
        }
        self.mode = mode;
        Ok(())
    }

    /// Network mode with a freshly started simulation ("splay").
    pub fn splay(&mut self) -> Result<()> {
        self.set_mode(ViewMode::Network)
    }

    fn start_network(&mut self) -> Result<()> {
        self.stop_network();
        let size = self.viewport.viewport();
        let center = Point::new(size.width / 2.0, size.height / 2.0);
        self.network = Some(network_simulation(&self.model, &self.config.network, center)?);
        Ok(())
    }

    fn stop_network(&mut self) {
        if let Some(sim) = self.network.take() {
            sim.stop();
        }
    }

    /// One network-view tick; `None` outside network mode or once the simulation settled.
    pub fn tick(&mut self) -> Option<TickFrame> {
        self.network.as_mut()?.tick()
    }

    /// Positions currently shown: the network snapshot in network mode, tree positions otherwise.
    pub fn displayed_positions(&self) -> Vec<(NodeId, Point)> {
        match (&self.mode, &self.network) {
            (ViewMode::Network, Some(sim)) => sim.positions(),
            _ => self
                .model
                .positions()
                .map(|(id, p)| (id.clone(), p))
                .collect(),
        }
    }

    /// Opens (or reopens) the rabbit hole at the active page.
    pub fn open_rabbit_hole(&mut self) -> Result<&RabbitHole> {
        let node = self.model.active_node().ok_or(Error::NoActivePage)?;
        let (title, url) = (node.title.clone(), node.url.clone());
        self.close_rabbit_hole();
        let size = self.viewport.viewport();
        let center = Point::new(size.width / 2.0, size.height / 2.0);
        let hole = RabbitHole::open(&title, url, self.config.exploration.clone(), center);
        Ok(self.rabbit_hole.insert(hole))
    }

    pub fn dig(&mut self, id: &NodeId) -> Result<DigOutcome> {
        let hole = self.rabbit_hole.as_mut().ok_or(Error::RabbitHoleClosed)?;
        hole.dig(id, &self.source, &self.parser)
    }

    pub fn tick_rabbit_hole(&mut self) -> Option<TickFrame> {
        self.rabbit_hole.as_mut()?.tick()
    }

    pub fn close_rabbit_hole(&mut self) {
        if let Some(mut hole) = self.rabbit_hole.take() {
            hole.stop();
        }
    }

    /// Topic analysis of the active page's content. `None` when there is no active page or its
    /// content cannot be fetched.
    pub async fn analyze_topics(
        &self,
        extractor: &dyn TopicExtractor,
    ) -> Option<std::result::Result<TopicAnalysis, TopicError>> {
        let node = self.model.active_node()?;
        let content = self.source.fetch_content(&node.title)?;
        Some(extractor.extract(&content).await)
    }

    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        self.viewport.set_zoom(zoom, &self.model)
    }

    pub fn zoom_by(&mut self, notches: f64) -> bool {
        self.viewport.zoom_by(notches, &self.model)
    }

    pub fn pan_to(&mut self, target: Point) -> PanOutcome {
        self.viewport.request_pan(target)
    }

    pub fn pan_by(&mut self, delta: Point) -> PanOutcome {
        self.viewport.pan_by(delta)
    }

    /// Centres the active node as far as the pan limits allow.
    pub fn focus_active(&mut self) -> PanOutcome {
        match self.model.active().and_then(|id| self.model.position(id)) {
            Some(p) => self.viewport.center_on(p),
            None => PanOutcome::Unchanged,
        }
    }

    pub fn resize(&mut self, viewport: Size) -> PanLimits {
        self.viewport.resize(viewport, &self.model)
    }

    /// Switches device class. Existing positions are kept until the next [`Self::compact`].
    pub fn set_device(&mut self, device: DeviceClass) -> PanLimits {
        self.viewport.set_device(device, &self.model)
    }

    pub fn export_share(&self) -> Result<String> {
        Ok(self.model.export_topology().to_json()?)
    }

    /// Replaces the session graph with a shared one and lays it out.
    pub fn import_share(&mut self, json: &str) -> Result<ImportReport> {
        let shared = SharedTopology::from_json(json)?;
        let (model, report) = shared.import(&self.source)?;
        self.stop_network();
        self.close_rabbit_hole();
        self.mode = ViewMode::Tree;
        self.model = model;
        let profile = self.config.profile(self.device()).clone();
        compact::run(&mut self.model, &profile)?;
        self.viewport.reset(&self.model);
        Ok(report)
    }

    /// Clears graph, history, simulations and camera. Device class and config are kept.
    pub fn reset(&mut self) -> Result<()> {
        self.stop_network();
        self.close_rabbit_hole();
        self.mode = ViewMode::Tree;
        self.model.apply(GraphAction::Reset)?;
        self.viewport.reset(&self.model);
        Ok(())
    }
}
