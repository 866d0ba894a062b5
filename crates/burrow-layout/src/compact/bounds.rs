//! Keeps the compacted layout clear of the top-left padding.

use burrow_core::{Bounds, NodeId, Point};
use indexmap::IndexMap;

/// Translates every position so neither minimum coordinate is below `min_padding`.
/// Returns the applied shift.
pub fn correct(positions: &mut IndexMap<NodeId, Point>, min_padding: f64) -> Point {
    let Some(bounds) = Bounds::from_points(positions.values().copied()) else {
        return Point::default();
    };
    let shift = Point::new(
        (min_padding - bounds.min_x).max(0.0),
        (min_padding - bounds.min_y).max(0.0),
    );
    if shift != Point::default() {
        for p in positions.values_mut() {
            p.x += shift.x;
            p.y += shift.y;
        }
    }
    shift
}
