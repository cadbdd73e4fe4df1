#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::coords::Point;
use crate::stage::{Geometry, Shape, ShapeId, Stage};

/// Topmost visible, pointer-enabled shape under `pt`, if any.
///
/// `slop` widens markers by that many pixels so small diamonds stay easy to
/// grab. Paths are outlines only and never hit.
#[must_use]
pub fn hit_test(stage: &Stage, pt: Point, slop: f64) -> Option<ShapeId> {
    stage
        .sorted_shapes()
        .into_iter()
        .rev()
        .filter(|s| s.visible && s.pointer_events)
        .find(|s| contains(s, pt, slop))
        .map(|s| s.id)
}

fn contains(shape: &Shape, pt: Point, slop: f64) -> bool {
    match &shape.geometry {
        Geometry::Rect(r) => r.contains(pt),
        Geometry::Diamond { center, radius } => (pt.x - center.x).abs() + (pt.y - center.y).abs() <= radius + slop,
        Geometry::Path(_) => false,
    }
}
