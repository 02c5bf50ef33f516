//! Vertex-loop builders for common body shapes
//!
//! All loops are counter-clockwise and ready for `Polygon::new`.

use std::f64::consts::TAU;

use super::vector::Vector;

/// Vertices used to approximate a circle
pub const CIRCLE_POINTS: usize = 100;

/// Axis-aligned rectangle centered on `center`
pub fn rectangle(center: Vector, width: f64, height: f64) -> Vec<Vector> {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    vec![
        Vector::new(center.x - half_w, center.y - half_h),
        Vector::new(center.x + half_w, center.y - half_h),
        Vector::new(center.x + half_w, center.y + half_h),
        Vector::new(center.x - half_w, center.y + half_h),
    ]
}

/// Regular polygon with `sides` vertices on a circle of `radius`
pub fn regular_polygon(center: Vector, radius: f64, sides: usize) -> Vec<Vector> {
    (0..sides)
        .map(|i| {
            let angle = TAU * i as f64 / sides as f64;
            center + Vector::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Circle approximated with `CIRCLE_POINTS` vertices
pub fn circle(center: Vector, radius: f64) -> Vec<Vector> {
    regular_polygon(center, radius, CIRCLE_POINTS)
}
