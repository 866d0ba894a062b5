//! Initial per-level positions from the sibling-centring rule.

use super::levels::Levels;
use crate::placer::place_child;
use burrow_core::{DeviceProfile, NodeId, Point};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Positioned {
    pub positions: IndexMap<NodeId, Point>,
    /// Nodes (other than the root) placed by even spacing for lack of a positioned anchor.
    pub fallbacks: Vec<NodeId>,
}

pub fn position(levels: &Levels, profile: &DeviceProfile) -> Positioned {
    let mut out = Positioned::default();
    let primary = profile.primary_axis;
    let spread = profile.spread_axis();

    for (level, ids) in levels.by_level.iter().enumerate() {
        let mut groups: FxHashMap<&NodeId, usize> = FxHashMap::default();
        for id in ids {
            if let Some(anchor) = levels.anchor(id) {
                *groups.entry(anchor).or_default() += 1;
            }
        }

        let mut seen_in_group: FxHashMap<&NodeId, usize> = FxHashMap::default();
        let mut unanchored = 0usize;
        for id in ids {
            let anchored = levels
                .anchor(id)
                .and_then(|a| out.positions.get(a).copied().map(|p| (a, p)));
            let point = match anchored {
                Some((anchor, anchor_pos)) => {
                    let slot = seen_in_group.entry(anchor).or_default();
                    let index = *slot;
                    *slot += 1;
                    let count = groups.get(anchor).copied().unwrap_or(1);
                    place_child(Some(anchor_pos), index, count, profile)
                }
                None => {
                    let point = Point::from_axes(
                        primary,
                        profile.origin.along(primary) + level as f64 * profile.level_spacing,
                        profile.origin.along(spread) + unanchored as f64 * profile.node_size,
                    );
                    if level > 0 || unanchored > 0 {
                        out.fallbacks.push(id.clone());
                    }
                    unanchored += 1;
                    point
                }
            };
            out.positions.insert(id.clone(), point);
        }
    }
    out
}
