//! Cooperative tick loop with geometric alpha cooling and explicit cancellation.
//!
//! The host drives the simulation one [`ForceSimulation::tick`] at a time (or through the
//! [`Iterator`] impl). Each tick publishes a [`TickFrame`]. Ticking ends once alpha drops below
//! `alpha_min` or after [`ForceSimulation::stop`] / [`StopHandle::stop`].

use crate::forces::{self, LinkWeights};
use crate::graph::ForceGraph;
use crate::rng::XorShift64Star;
use crate::{Error, Result};
use burrow_core::{ForceConfig, NodeId, Point};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Hard cap for [`ForceSimulation::run_to_completion`], independent of the cooling schedule.
pub const MAX_TICKS: usize = 10_000;

/// Cloneable cancellation flag shared with whoever owns the simulation.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Running,
    /// Alpha fell below `alpha_min`.
    Settled,
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickFrame {
    /// 1-based tick number.
    pub tick: usize,
    pub alpha: f64,
    pub positions: Vec<(NodeId, Point)>,
}

#[derive(Debug, Clone)]
pub struct ForceSimulation {
    graph: ForceGraph,
    weights: LinkWeights,
    cfg: ForceConfig,
    center: Point,
    alpha: f64,
    ticks: usize,
    rng: XorShift64Star,
    stop: StopHandle,
}

fn check(name: &'static str, value: f64, ok: bool) -> Result<()> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}

impl ForceSimulation {
    pub fn new(graph: ForceGraph, cfg: ForceConfig, center: Point) -> Result<Self> {
        check("alphaDecay", cfg.alpha_decay, cfg.alpha_decay > 0.0 && cfg.alpha_decay < 1.0)?;
        check("alphaMin", cfg.alpha_min, cfg.alpha_min > 0.0 && cfg.alpha_min < 1.0)?;
        check(
            "velocityDecay",
            cfg.velocity_decay,
            (0.0..=1.0).contains(&cfg.velocity_decay),
        )?;
        check("linkDistance", cfg.link_distance, cfg.link_distance >= 0.0)?;
        check("collideRadius", cfg.collide_radius, cfg.collide_radius >= 0.0)?;
        check("chargeStrength", cfg.charge_strength, true)?;
        check("gravity", cfg.gravity, true)?;
        check("centerX", center.x, true)?;
        check("centerY", center.y, true)?;

        let weights = LinkWeights::new(graph.len(), graph.links());
        Ok(Self {
            weights,
            rng: XorShift64Star::new(cfg.random_seed),
            graph,
            cfg,
            center,
            alpha: 1.0,
            ticks: 0,
            stop: StopHandle::default(),
        })
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn state(&self) -> SimulationState {
        if self.stop.is_stopped() {
            SimulationState::Stopped
        } else if self.alpha < self.cfg.alpha_min {
            SimulationState::Settled
        } else {
            SimulationState::Running
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SimulationState::Running
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn graph(&self) -> &ForceGraph {
        &self.graph
    }

    pub fn positions(&self) -> Vec<(NodeId, Point)> {
        self.graph.positions()
    }

    /// Pins `id` at `at` (or releases it with `None`). Pinned nodes ignore forces.
    pub fn pin(&mut self, id: &NodeId, at: Option<Point>) -> Result<()> {
        self.graph.pin(id, at)
    }

    /// Advances one step. Returns `None` once settled or stopped.
    pub fn tick(&mut self) -> Option<TickFrame> {
        if !self.is_running() {
            return None;
        }
        self.alpha += (0.0 - self.alpha) * self.cfg.alpha_decay;
        let alpha = self.alpha;
        let nodes = &mut self.graph.nodes;

        forces::apply_links(
            nodes,
            &self.graph.links,
            &self.weights,
            &self.cfg,
            alpha,
            &mut self.rng,
        );
        forces::apply_many_body(nodes, &self.cfg, alpha, &mut self.rng);
        forces::apply_center(nodes, self.center, self.cfg.center_strength);
        forces::apply_collide(nodes, &self.cfg, &mut self.rng);
        forces::apply_gravity(nodes, self.center, self.cfg.gravity, alpha);

        let keep = 1.0 - self.cfg.velocity_decay;
        for node in nodes.iter_mut() {
            match node.fixed {
                Some(p) => {
                    node.x = p.x;
                    node.y = p.y;
                    node.vx = 0.0;
                    node.vy = 0.0;
                }
                None => {
                    node.vx *= keep;
                    node.vy *= keep;
                    node.x += node.vx;
                    node.y += node.vy;
                }
            }
        }

        self.ticks += 1;
        Some(TickFrame {
            tick: self.ticks,
            alpha,
            positions: self.graph.positions(),
        })
    }

    /// Ticks until settled or stopped (at most [`MAX_TICKS`]) and returns the last frame.
    pub fn run_to_completion(&mut self) -> Option<TickFrame> {
        let mut last = None;
        for _ in 0..MAX_TICKS {
            match self.tick() {
                Some(frame) => last = Some(frame),
                None => break,
            }
        }
        if self.is_running() {
            tracing::warn!(ticks = self.ticks, alpha = self.alpha, "force simulation hit tick cap");
        } else {
            tracing::debug!(ticks = self.ticks, state = ?self.state(), "force simulation finished");
        }
        last
    }
}

impl Iterator for ForceSimulation {
    type Item = TickFrame;

    fn next(&mut self) -> Option<TickFrame> {
        self.tick()
    }
}
