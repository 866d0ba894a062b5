#![forbid(unsafe_code)]

//! Headless force-directed relaxation for burrow's network and exploration views.
//!
//! Simulations run on an independent [`ForceGraph`] snapshot and publish per-tick frames; they
//! never write into the tree-mode graph model.

mod forces;
pub mod error;
pub mod graph;
mod rng;
pub mod simulation;

pub use error::{Error, Result};
pub use graph::{ForceGraph, ForceLink, ForceNode};
pub use simulation::{ForceSimulation, SimulationState, StopHandle, TickFrame};

use burrow_core::{ForceConfig, GraphModel, Point};

/// Snapshot of the whole model, ready to tick toward `center`.
pub fn network_simulation(
    model: &GraphModel,
    cfg: &ForceConfig,
    center: Point,
) -> Result<ForceSimulation> {
    ForceSimulation::new(ForceGraph::from_model(model)?, cfg.clone(), center)
}
