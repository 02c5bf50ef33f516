//! Rigid bodies
//!
//! A body owns its polygon and accumulates force and impulse between ticks.
//! Removal is a soft delete: the owning scene drops removed bodies on its
//! next sweep.

use serde::{Deserialize, Serialize};

use super::color::Rgb;
use super::polygon::Polygon;
use super::vector::{VEC_ZERO, Vector};
use crate::error::PhysicsError;

/// Mass of bodies that forces and impulses cannot move
pub const INFINITE_MASS: f64 = f64::INFINITY;

/// Host-side classification of a body, used to pick collision behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BodyKind {
    #[default]
    Untagged,
    /// Launched by the player
    Projectile,
    /// Destructible scenery
    Obstacle,
    /// Scores when hit
    Target,
    /// Arena boundary
    Wall,
    Ground,
    /// Display-only (e.g. remaining-shot indicators)
    Marker,
}

/// A simulated rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    polygon: Polygon,
    mass: f64,
    force: Vector,
    impulse: Vector,
    /// Velocity change queued by collision responses
    #[serde(default)]
    kick: Vector,
    kind: BodyKind,
    /// Present only on damageable bodies
    health: Option<f64>,
    removed: bool,
}

impl Body {
    /// Create a body at rest from a vertex loop
    pub fn new(shape: Vec<Vector>, mass: f64, color: Rgb, kind: BodyKind) -> Result<Self, PhysicsError> {
        validate_mass(mass)?;
        let polygon = Polygon::new(shape, VEC_ZERO, 0.0, color)?;
        Ok(Self {
            polygon,
            mass,
            force: VEC_ZERO,
            impulse: VEC_ZERO,
            kick: VEC_ZERO,
            kind,
            health: None,
            removed: false,
        })
    }

    /// Create a body that tracks health
    pub fn damageable(
        health: f64,
        shape: Vec<Vector>,
        mass: f64,
        color: Rgb,
        kind: BodyKind,
    ) -> Result<Self, PhysicsError> {
        let mut body = Self::new(shape, mass, color, kind)?;
        body.health = Some(health);
        Ok(body)
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Current vertices
    #[inline]
    pub fn points(&self) -> &[Vector] {
        self.polygon.points()
    }

    /// Owned copy of the current vertices
    pub fn shape(&self) -> Vec<Vector> {
        self.polygon.points().to_vec()
    }

    #[inline]
    pub fn centroid(&self) -> Vector {
        self.polygon.center()
    }

    pub fn set_centroid(&mut self, centroid: Vector) {
        self.polygon.set_center(centroid);
    }

    #[inline]
    pub fn velocity(&self) -> Vector {
        self.polygon.velocity()
    }

    pub fn set_velocity(&mut self, velocity: Vector) {
        self.polygon.set_velocity(velocity);
    }

    #[inline]
    pub fn rotation(&self) -> f64 {
        self.polygon.rotation()
    }

    pub fn set_rotation(&mut self, angle: f64) {
        self.polygon.set_rotation(angle);
    }

    #[inline]
    pub fn color(&self) -> Rgb {
        self.polygon.color()
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.polygon.set_color(color);
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn is_immovable(&self) -> bool {
        self.mass == INFINITE_MASS
    }

    #[inline]
    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Force accumulated since the last tick
    #[inline]
    pub fn force(&self) -> Vector {
        self.force
    }

    /// Impulse accumulated since the last tick
    #[inline]
    pub fn impulse(&self) -> Vector {
        self.impulse
    }

    pub fn add_force(&mut self, force: Vector) {
        self.force += force;
    }

    pub fn add_impulse(&mut self, impulse: Vector) {
        self.impulse += impulse;
    }

    /// Queue a change in velocity for the next tick, independent of mass.
    ///
    /// Collision responses use this so bodies near `f64::MAX` mass never
    /// need an impulse that overflows.
    pub fn add_velocity_change(&mut self, delta: Vector) {
        self.kick += delta;
    }

    /// Velocity change queued since the last tick
    #[inline]
    pub fn velocity_change(&self) -> Vector {
        self.kick
    }

    /// Remaining health, `None` for bodies that cannot be damaged
    #[inline]
    pub fn health(&self) -> Option<f64> {
        self.health
    }

    /// Reduce health. Does not remove the body; callers decide that.
    pub fn subtract_health(&mut self, amount: f64) {
        if let Some(health) = self.health.as_mut() {
            *health -= amount;
        }
    }

    /// Advance by `dt` seconds using the average of old and new velocity
    pub fn tick(&mut self, dt: f64) {
        let old_vel = self.polygon.velocity();
        let new_vel = if self.is_immovable() {
            old_vel
        } else {
            let from_force = self.force * (dt / self.mass);
            let from_impulse = self.impulse / self.mass;
            old_vel + from_force + from_impulse + self.kick
        };

        let displacement = (old_vel + new_vel) * 0.5 * dt;
        self.polygon.set_velocity(new_vel);
        self.polygon.translate(displacement);
        self.force = VEC_ZERO;
        self.impulse = VEC_ZERO;
        self.kick = VEC_ZERO;
    }

    /// Mark for removal on the next scene sweep
    pub fn remove(&mut self) {
        self.removed = true;
    }

    #[inline]
    pub fn is_removed(&self) -> bool {
        self.removed
    }
}

fn validate_mass(mass: f64) -> Result<(), PhysicsError> {
    if mass == INFINITE_MASS || (mass.is_finite() && mass > 0.0) {
        Ok(())
    } else {
        Err(PhysicsError::InvalidMass { mass })
    }
}
