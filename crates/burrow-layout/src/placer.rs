//! Candidate position for one newly inserted node.
//!
//! Children extend along the profile's primary axis by one level spacing; siblings are centred
//! on their parent along the spread axis. Global non-overlap is left to [`crate::collision`].

use burrow_core::{DeviceProfile, GraphModel, NodeId, Point};

/// Offset of sibling `index` (of `count`) from the parent on the spread axis.
pub fn sibling_offset(index: usize, count: usize, node_size: f64) -> f64 {
    let centre = (count.max(1) - 1) as f64 / 2.0;
    (index as f64 - centre) * node_size
}

/// Position of child `index` of `count` under `parent`, or the profile origin for a first node.
pub fn place_child(
    parent: Option<Point>,
    index: usize,
    count: usize,
    profile: &DeviceProfile,
) -> Point {
    let Some(parent) = parent else {
        return profile.origin;
    };
    let primary = profile.primary_axis;
    let spread = profile.spread_axis();
    Point::from_axes(
        primary,
        parent.along(primary) + profile.level_spacing,
        parent.along(spread) + sibling_offset(index, count, profile.node_size),
    )
}

/// Position for a node about to be appended under `parent` in `model`.
///
/// The new child's index is the parent's current child count. A parent that has no position yet
/// is a layout inconsistency; the origin is used and a warning logged.
pub fn propose(model: &GraphModel, parent: Option<&NodeId>, profile: &DeviceProfile) -> Point {
    let Some(parent_id) = parent else {
        return profile.origin;
    };
    let Some(node) = model.node(parent_id) else {
        tracing::warn!(parent = %parent_id, "placing child of unknown parent at origin");
        return profile.origin;
    };
    let Some(anchor) = node.position else {
        tracing::warn!(parent = %parent_id, "parent has no position; placing child at origin");
        return profile.origin;
    };
    let index = node.children.len();
    place_child(Some(anchor), index, index + 1, profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_offsets_are_centred() {
        let offsets: Vec<f64> = (0..3).map(|i| sibling_offset(i, 3, 120.0)).collect();
        assert_eq!(offsets, vec![-120.0, 0.0, 120.0]);
        assert_eq!(sibling_offset(0, 1, 120.0), 0.0);
        assert_eq!(sibling_offset(1, 2, 100.0), 50.0);
        assert_eq!(sibling_offset(0, 0, 100.0), 0.0);
    }

    #[test]
    fn desktop_children_grow_down() {
        let profile = DeviceProfile::desktop();
        let root = Point::new(50.0, 50.0);
        let xs: Vec<f64> = (0..3)
            .map(|i| place_child(Some(root), i, 3, &profile))
            .inspect(|p| assert_eq!(p.y, 190.0))
            .map(|p| p.x)
            .collect();
        assert_eq!(xs, vec![-70.0, 50.0, 170.0]);
    }

    #[test]
    fn mobile_children_grow_right() {
        let profile = DeviceProfile::mobile();
        let p = place_child(Some(Point::new(50.0, 200.0)), 1, 2, &profile);
        assert_eq!(p, Point::new(210.0, 255.0));
    }

    #[test]
    fn first_node_lands_on_origin() {
        let profile = DeviceProfile::desktop();
        assert_eq!(place_child(None, 0, 1, &profile), profile.origin);
        assert_eq!(propose(&GraphModel::new(), None, &profile), profile.origin);
    }
}
