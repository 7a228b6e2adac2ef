//! Collision detection for line-segment geometry
//!
//! Every entity is a handful of straight segments plus an axis-aligned box.
//! The box rejects most pairs cheaply; the segments decide the rest.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, bounding_box, segments};

/// A straight line segment from `a` to `b`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }
}

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Smallest box containing every endpoint of `segments`
    ///
    /// Returns a degenerate box at the origin for an empty slice.
    pub fn enclosing(segments: &[Segment]) -> Self {
        let mut points = segments.iter().flat_map(|s| [s.a, s.b]);
        let Some(first) = points.next() else {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        };
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Self::new(min.x, min.y, max.x, max.y)
    }

    /// Check if a point lies inside or on the box
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// Separating-axis test; boxes that only touch at an edge still overlap
#[inline]
pub fn boxes_overlap(a: &BoundingBox, b: &BoundingBox) -> bool {
    !(a.right < b.left || a.bottom < b.top || b.right < a.left || b.bottom < a.top)
}

/// Check if two segments cross each other
///
/// Solves `s1.a + λ·d1 = s2.a + u·d2` with the cross-product determinant.
/// Parallel and collinear segments never intersect. Both parameters must lie
/// strictly inside (0, 1), so meeting at an endpoint is not a crossing.
pub fn segments_intersect(s1: &Segment, s2: &Segment) -> bool {
    let d1 = s1.b - s1.a;
    let d2 = s2.b - s2.a;
    let det = d1.perp_dot(d2);
    if det == 0.0 {
        return false;
    }

    let to_end = s2.b - s1.a;
    let lambda = to_end.perp_dot(d2) / det;
    // Parameter along s2 measured from its far end (1 - u)
    let gamma = d1.perp_dot(to_end) / det;

    (0.0 < lambda && lambda < 1.0) && (0.0 < gamma && gamma < 1.0)
}

/// Check if two entities collide
///
/// Bullets and bombs report their swept path as a segment, so a fast
/// projectile cannot skip over a thin obstacle between two ticks.
pub fn entities_collide(e1: &Entity, e2: &Entity) -> bool {
    if !boxes_overlap(&bounding_box(e1), &bounding_box(e2)) {
        return false;
    }

    let lines2 = segments(e2);
    segments(e1)
        .iter()
        .any(|l1| lines2.iter().any(|l2| segments_intersect(l1, l2)))
}
