//! Convex polygon geometry with kinematic state
//!
//! A polygon is an implicitly closed loop of vertices. The cached `center`
//! always matches the centroid of the current points: every operation that
//! moves points refreshes it.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::color::Rgb;
use super::vector::{VEC_ZERO, Vector, VectorExt};
use crate::error::PhysicsError;

/// Slack on the total turning angle of a convex outline (radians)
const WINDING_TOLERANCE: f64 = 1e-6;

/// A convex polygon with velocity, spin and color
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Vector>,
    velocity: Vector,
    /// Spin applied by `advance` (radians/sec)
    rotation_speed: f64,
    /// Absolute orientation tracked by `set_rotation`
    rotation: f64,
    center: Vector,
    color: Rgb,
}

impl Polygon {
    /// Build a polygon, taking ownership of the vertex loop
    pub fn new(
        points: Vec<Vector>,
        velocity: Vector,
        rotation_speed: f64,
        color: Rgb,
    ) -> Result<Self, PhysicsError> {
        validate_points(&points)?;
        let center = centroid_of(&points);
        Ok(Self {
            points,
            velocity,
            rotation_speed,
            rotation: 0.0,
            center,
            color,
        })
    }

    /// Build a polygon at rest with the default color
    pub fn at_rest(points: Vec<Vector>) -> Result<Self, PhysicsError> {
        Self::new(points, VEC_ZERO, 0.0, Rgb::default())
    }

    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    /// Enclosed area (shoelace formula)
    pub fn area(&self) -> f64 {
        signed_area(&self.points).abs()
    }

    /// Centroid computed from the current points
    pub fn centroid(&self) -> Vector {
        centroid_of(&self.points)
    }

    /// Cached centroid
    #[inline]
    pub fn center(&self) -> Vector {
        self.center
    }

    pub fn translate(&mut self, delta: Vector) {
        for p in &mut self.points {
            *p += delta;
        }
        self.center = self.centroid();
    }

    /// Rotate every point counter-clockwise by `angle` about `pivot`
    pub fn rotate(&mut self, angle: f64, pivot: Vector) {
        for p in &mut self.points {
            *p = (*p - pivot).rotated(angle) + pivot;
        }
        self.center = self.centroid();
    }

    /// Move the polygon so its centroid lands on `target`
    pub fn set_center(&mut self, target: Vector) {
        let delta = target - self.centroid();
        self.translate(delta);
        self.center = target;
    }

    /// Rotate to an absolute orientation about the cached center
    pub fn set_rotation(&mut self, angle: f64) {
        let delta = angle - self.rotation;
        if delta != 0.0 {
            let pivot = self.center;
            self.rotate(delta, pivot);
        }
        self.rotation = angle;
    }

    #[inline]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    #[inline]
    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector) {
        self.velocity = velocity;
    }

    #[inline]
    pub fn rotation_speed(&self) -> f64 {
        self.rotation_speed
    }

    pub fn set_rotation_speed(&mut self, rotation_speed: f64) {
        self.rotation_speed = rotation_speed;
    }

    /// Drift by the polygon's own velocity and spin for `dt` seconds
    pub fn advance(&mut self, dt: f64) {
        self.translate(self.velocity * dt);
        let spin = self.rotation_speed * dt;
        if spin != 0.0 {
            let pivot = self.center;
            self.rotate(spin, pivot);
            self.rotation += spin;
        }
    }

    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Replace the color, returning the previous one
    pub fn set_color(&mut self, color: Rgb) -> Rgb {
        std::mem::replace(&mut self.color, color)
    }

    /// True if every turn along the loop has the same orientation
    pub fn is_convex(&self) -> bool {
        is_convex(&self.points)
    }
}

fn validate_points(points: &[Vector]) -> Result<(), PhysicsError> {
    if points.len() < 3 {
        return Err(PhysicsError::TooFewPoints {
            count: points.len(),
        });
    }
    if points.iter().any(|p| !p.is_finite()) {
        return Err(PhysicsError::NonFiniteGeometry);
    }
    if signed_area(points) == 0.0 {
        return Err(PhysicsError::DegenerateArea);
    }
    if !is_convex(points) {
        return Err(PhysicsError::NotConvex);
    }
    Ok(())
}

/// Consecutive vertex pairs around the closed loop
fn edges(points: &[Vector]) -> impl Iterator<Item = (Vector, Vector)> + '_ {
    let n = points.len();
    (0..n).map(move |i| (points[i], points[(i + 1) % n]))
}

fn signed_area(points: &[Vector]) -> f64 {
    edges(points).map(|(a, b)| a.cross(b)).sum::<f64>() * 0.5
}

fn centroid_of(points: &[Vector]) -> Vector {
    let sum = edges(points).fold(VEC_ZERO, |acc, (a, b)| acc + (a + b) * a.cross(b));
    // Signed area keeps clockwise loops correct too
    sum / (6.0 * signed_area(points))
}

/// Every turn bends the same way and the outline winds exactly once.
///
/// The winding check rejects self-intersecting stars, whose turns all share
/// a sign but wrap around more than once.
fn is_convex(points: &[Vector]) -> bool {
    let n = points.len();
    let mut sign = 0.0f64;
    let mut turning = 0.0f64;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let (incoming, outgoing) = (b - a, c - b);
        let turn = incoming.cross(outgoing);
        turning += turn.atan2(incoming.dot(outgoing));
        if turn.abs() <= f64::EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = turn.signum();
        } else if turn.signum() != sign {
            return false;
        }
    }
    (turning.abs() - TAU).abs() < WINDING_TOLERANCE
}
