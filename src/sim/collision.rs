//! Separating-axis collision detection for convex polygons
//!
//! Both shapes' edge normals are tested. Any axis with disjoint projections
//! proves the shapes apart; otherwise the axis of least overlap becomes the
//! collision axis.

use super::body::Body;
use super::vector::{VEC_ZERO, Vector};

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the shapes overlap
    pub collided: bool,
    /// Unit axis of minimum penetration (only meaningful when collided)
    pub axis: Vector,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            collided: false,
            axis: VEC_ZERO,
        }
    }

    pub fn hit(axis: Vector) -> Self {
        Self {
            collided: true,
            axis,
        }
    }
}

/// Projection interval of a shape onto an axis
#[derive(Debug, Clone, Copy)]
struct Interval {
    min: f64,
    max: f64,
}

fn project(shape: &[Vector], unit_axis: Vector) -> Interval {
    shape.iter().fold(
        Interval {
            min: f64::MAX,
            max: -f64::MAX,
        },
        |acc, p| {
            let d = p.dot(unit_axis);
            Interval {
                min: acc.min.min(d),
                max: acc.max.max(d),
            }
        },
    )
}

/// Test `other` against the edge normals of `source`.
///
/// Returns the least-overlap axis and its depth, or `None` once a separating
/// axis is found.
fn least_overlap_axis(source: &[Vector], other: &[Vector]) -> Option<(Vector, f64)> {
    let n = source.len();
    let mut axis = VEC_ZERO;
    let mut min_overlap = f64::MAX;

    for i in 0..n {
        let edge = source[i] - source[(i + 1) % n];
        let normal = Vector::new(-edge.y, edge.x);
        let length = normal.length();
        if length == 0.0 {
            // Repeated vertex, no direction to test
            continue;
        }
        let unit = normal / length;

        let a = project(source, unit);
        let b = project(other, unit);

        if a.max < b.min || b.max < a.min {
            return None;
        }

        if a.max > b.min && a.max - b.min < min_overlap {
            min_overlap = a.max - b.min;
            axis = unit;
        } else if b.max > a.min && b.max - a.min < min_overlap {
            min_overlap = b.max - a.min;
            axis = unit;
        }
    }

    Some((axis, min_overlap))
}

/// Check two convex vertex loops for overlap
pub fn find_shape_collision(shape_a: &[Vector], shape_b: &[Vector]) -> CollisionResult {
    let Some((axis_a, overlap_a)) = least_overlap_axis(shape_a, shape_b) else {
        return CollisionResult::miss();
    };
    let Some((axis_b, overlap_b)) = least_overlap_axis(shape_b, shape_a) else {
        return CollisionResult::miss();
    };

    if overlap_a < overlap_b {
        CollisionResult::hit(axis_a)
    } else {
        CollisionResult::hit(axis_b)
    }
}

/// Check two bodies for overlap
pub fn find_collision(a: &Body, b: &Body) -> CollisionResult {
    find_shape_collision(a.points(), b.points())
}
