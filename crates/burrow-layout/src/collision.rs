//! Cascade push for overlaps caused by a single insertion.
//!
//! Overlap uses independent per-axis thresholds. Displaced nodes move strictly along the primary
//! axis, away from the position that displaced them. Every node moves at most once per cascade,
//! which bounds the work by the node count; overlaps that remain afterwards are accepted.

use burrow_core::{DeviceProfile, GraphAction, GraphModel, NodeId, Point, Size};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// `true` iff both axis distances are strictly below their thresholds.
pub fn collides(a: Point, b: Point, threshold: Size) -> bool {
    (a.x - b.x).abs() < threshold.width && (a.y - b.y).abs() < threshold.height
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displacement {
    /// Position that triggered the push.
    pub trigger: Point,
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cascade {
    /// Displacements in the order they were decided.
    pub moves: Vec<(NodeId, Displacement)>,
}

impl Cascade {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn displacement(&self, id: &NodeId) -> Option<&Displacement> {
        self.moves.iter().find(|(n, _)| n == id).map(|(_, d)| d)
    }

    /// A single atomic reposition covering every displaced node.
    pub fn to_action(&self) -> GraphAction {
        GraphAction::Reposition(self.moves.iter().map(|(id, d)| (id.clone(), d.to)).collect())
    }
}

/// Plans the cascade triggered by `inserted` (which must already carry its position).
pub fn plan(model: &GraphModel, inserted: &NodeId, profile: &DeviceProfile) -> Cascade {
    let mut cascade = Cascade::default();
    let Some(start) = model.position(inserted) else {
        return cascade;
    };
    let axis = profile.primary_axis;

    let mut processed: FxHashSet<&NodeId> = FxHashSet::default();
    processed.insert(inserted);
    let mut queue: VecDeque<Point> = VecDeque::from([start]);

    while let Some(trigger) = queue.pop_front() {
        let hit = model.positions().find(|(id, p)| {
            !processed.contains(id) && collides(trigger, *p, profile.collision_threshold)
        });
        let Some((id, from)) = hit else {
            continue;
        };
        processed.insert(id);
        let direction = if from.along(axis) < trigger.along(axis) {
            -1.0
        } else {
            1.0
        };
        let to = from.shifted(axis, direction * profile.push_amount);
        cascade.moves.push((id.clone(), Displacement { trigger, from, to }));
        queue.push_back(to);
    }
    cascade
}

/// Plans and applies the cascade for `inserted` in one reposition.
pub fn resolve(
    model: &mut GraphModel,
    inserted: &NodeId,
    profile: &DeviceProfile,
) -> burrow_core::Result<Cascade> {
    let cascade = plan(model, inserted, profile);
    if !cascade.is_empty() {
        model.apply(cascade.to_action())?;
        let residual = residual_overlaps(model, profile);
        tracing::debug!(
            node = %inserted,
            displaced = cascade.len(),
            residual,
            "resolved insertion collisions"
        );
    }
    Ok(cascade)
}

/// Number of colliding node pairs.
pub fn residual_overlaps(model: &GraphModel, profile: &DeviceProfile) -> usize {
    let points: Vec<Point> = model.positions().map(|(_, p)| p).collect();
    let mut count = 0;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            if collides(*a, *b, profile.collision_threshold) {
                count += 1;
            }
        }
    }
    count
}
