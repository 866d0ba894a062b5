//! Intra-level overlap relaxation along the spread axis.

use burrow_core::{DeviceProfile, NodeId, Point};
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Deficits at or below this are treated as resolved.
pub const TOLERANCE: f64 = 0.01;
/// Pairwise passes per level before the ordered sweep takes over.
pub const MAX_PASSES: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelaxStats {
    /// Full passes over all levels, including the final quiet pass of each.
    pub passes: usize,
    /// Levels that hit [`MAX_PASSES`] and were finished by the ordered sweep.
    pub swept_levels: usize,
}

/// Pushes same-level pairs apart until every pair is at least `node_size` apart on the spread
/// axis. Relative order along the spread axis (ties by level order) is fixed up front and
/// decides the push direction.
///
/// Symmetric pushes spread slowly on wide levels, so after the pairwise passes every level gets
/// one sweep in that order, then is recentred on its pre-sweep midpoint.
pub fn relax(
    levels: &[Vec<NodeId>],
    positions: &mut IndexMap<NodeId, Point>,
    profile: &DeviceProfile,
) -> RelaxStats {
    let axis = profile.spread_axis();
    let min_gap = profile.node_size;
    let mut stats = RelaxStats::default();

    for (level, ids) in levels.iter().enumerate() {
        let mut coords: Vec<(usize, f64)> = ids
            .iter()
            .enumerate()
            .filter_map(|(i, id)| positions.get(id).map(|p| (i, p.along(axis))))
            .collect();
        if coords.len() < 2 {
            continue;
        }
        coords.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        let mut settled = false;
        for _ in 0..MAX_PASSES {
            stats.passes += 1;
            if !pairwise_pass(&mut coords, min_gap) {
                settled = true;
                break;
            }
        }
        if !settled {
            stats.swept_levels += 1;
            tracing::debug!(level, nodes = coords.len(), "finishing level relaxation with a sweep");
        }
        sweep(&mut coords, min_gap);

        for (i, value) in coords {
            if let Some(p) = positions.get_mut(&ids[i]) {
                *p = p.with(axis, value);
            }
        }
    }
    stats
}

/// One all-pairs pass; returns whether anything moved.
fn pairwise_pass(coords: &mut [(usize, f64)], min_gap: f64) -> bool {
    let mut adjusted = false;
    for i in 0..coords.len() {
        for j in i + 1..coords.len() {
            let deficit = min_gap - (coords[j].1 - coords[i].1);
            if deficit > TOLERANCE {
                coords[i].1 -= deficit / 2.0;
                coords[j].1 += deficit / 2.0;
                adjusted = true;
            }
        }
    }
    adjusted
}

/// Enforces `min_gap` between neighbours in the fixed order, keeping the level's midpoint.
fn sweep(coords: &mut [(usize, f64)], min_gap: f64) {
    let (lo, hi) = coords
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
            (lo.min(c.1), hi.max(c.1))
        });
    for j in 1..coords.len() {
        coords[j].1 = coords[j].1.max(coords[j - 1].1 + min_gap);
    }
    let (Some(first), Some(last)) = (coords.first(), coords.last()) else {
        return;
    };
    let shift = (lo + hi) / 2.0 - (first.1 + last.1) / 2.0;
    for c in coords.iter_mut() {
        c.1 += shift;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_pair_is_pushed_apart_symmetrically() {
        let profile = DeviceProfile::desktop();
        let a = NodeId::from("a");
        let b = NodeId::from("b");
        let mut positions = IndexMap::new();
        positions.insert(a.clone(), Point::new(0.0, 190.0));
        positions.insert(b.clone(), Point::new(20.0, 190.0));

        let stats = relax(&[vec![a.clone(), b.clone()]], &mut positions, &profile);
        assert_eq!(stats.swept_levels, 0);
        assert_eq!(positions[&a], Point::new(-50.0, 190.0));
        assert_eq!(positions[&b], Point::new(70.0, 190.0));
    }

    #[test]
    fn coincident_nodes_split_by_level_order() {
        let profile = DeviceProfile::mobile();
        let ids: Vec<NodeId> = ["a", "b", "c"].into_iter().map(NodeId::from).collect();
        let mut positions: IndexMap<NodeId, Point> = ids
            .iter()
            .map(|id| (id.clone(), Point::new(210.0, 200.0)))
            .collect();
        relax(std::slice::from_ref(&ids), &mut positions, &profile);
        let ys: Vec<f64> = ids.iter().map(|id| positions[id].y).collect();
        assert!(ys[0] < ys[1] && ys[1] < ys[2]);
        for w in ys.windows(2) {
            assert!(w[1] - w[0] >= profile.node_size - 2.0 * TOLERANCE);
        }
        assert!(positions.values().all(|p| p.x == 210.0));
    }

    #[test]
    fn wide_level_is_finished_by_the_sweep() {
        let profile = DeviceProfile::desktop();
        let ids: Vec<NodeId> = (0..60).map(|i| NodeId::new(format!("n{i}"))).collect();
        let mut positions: IndexMap<NodeId, Point> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), Point::new(i as f64, 190.0)))
            .collect();

        let stats = relax(std::slice::from_ref(&ids), &mut positions, &profile);
        assert_eq!(stats.swept_levels, 1);
        let xs: Vec<f64> = ids.iter().map(|id| positions[id].x).collect();
        for w in xs.windows(2) {
            assert!(w[1] - w[0] >= profile.node_size - 1e-9);
        }
    }

    #[test]
    fn sweep_keeps_the_midpoint() {
        let mut coords = vec![(0, 0.0), (1, 10.0), (2, 20.0)];
        sweep(&mut coords, 120.0);
        let values: Vec<f64> = coords.iter().map(|c| c.1).collect();
        assert_eq!(values, vec![-110.0, 10.0, 130.0]);
    }
}
