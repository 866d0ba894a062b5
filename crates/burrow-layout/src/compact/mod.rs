//! Full-graph batch relayout.
//!
//! The pipeline is: level assignment ([`levels`]), sibling-centred positioning ([`position`]),
//! intra-level relaxation ([`relax`]), bounds correction ([`bounds`]). Positions are recomputed
//! from topology alone, so running it twice yields identical coordinates.

pub mod bounds;
pub mod levels;
pub mod position;
pub mod relax;

use burrow_core::{DeviceProfile, GraphAction, GraphModel, NodeId, Point};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompactReport {
    pub nodes: usize,
    pub levels: usize,
    /// Nodes the breadth-first pass could not reach.
    pub repaired_levels: usize,
    /// Nodes placed without a positioned anchor.
    pub fallback_positions: usize,
    pub relax_passes: usize,
    /// Levels finished by the ordered sweep after the pairwise pass cap.
    pub swept_levels: usize,
    pub shift: Point,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompactLayout {
    /// New position of every node, in model order.
    pub positions: IndexMap<NodeId, Point>,
    pub report: CompactReport,
}

impl CompactLayout {
    pub fn to_action(&self) -> GraphAction {
        GraphAction::Reposition(
            self.positions
                .iter()
                .map(|(id, p)| (id.clone(), *p))
                .collect(),
        )
    }
}

/// Computes a compact layout without touching the model.
pub fn layout(model: &GraphModel, profile: &DeviceProfile) -> CompactLayout {
    let levels = levels::assign(model);
    let placed = position::position(&levels, profile);
    let mut positions = placed.positions;
    let stats = relax::relax(&levels.by_level, &mut positions, profile);

    let mut fallback_positions = placed.fallbacks.len();
    let mut ordered: IndexMap<NodeId, Point> = IndexMap::with_capacity(model.len());
    for (i, id) in model.node_ids().enumerate() {
        let point = match positions.get(id) {
            Some(p) => *p,
            None => {
                tracing::warn!(
                    node = %id,
                    "node missing from compact layout; using fallback position"
                );
                fallback_positions += 1;
                profile.origin.shifted(profile.spread_axis(), i as f64 * profile.node_size)
            }
        };
        ordered.insert(id.clone(), point);
    }
    let shift = bounds::correct(&mut ordered, profile.min_padding);

    CompactLayout {
        report: CompactReport {
            nodes: ordered.len(),
            levels: levels.depth(),
            repaired_levels: levels.repaired.len(),
            fallback_positions,
            relax_passes: stats.passes,
            swept_levels: stats.swept_levels,
            shift,
        },
        positions: ordered,
    }
}

/// Computes a compact layout and applies it as one reposition.
pub fn run(model: &mut GraphModel, profile: &DeviceProfile) -> burrow_core::Result<CompactReport> {
    let computed = layout(model, profile);
    if !computed.positions.is_empty() {
        model.apply(computed.to_action())?;
    }
    tracing::debug!(
        nodes = computed.report.nodes,
        levels = computed.report.levels,
        passes = computed.report.relax_passes,
        "compact layout applied"
    );
    Ok(computed.report)
}
