//! Force generators and collision handlers built on the scene registry
//!
//! Every pair-wise generator registers with both bodies as dependents and is
//! dropped as soon as either body leaves the scene.

use super::body::Body;
use super::collision::find_collision;
use super::scene::{BodyHandle, Scene};
use super::vector::Vector;
use crate::consts::GRAVITY_MIN_DISTANCE;

/// Gravitational force on `a` from `b`.
///
/// Returns `None` when the centroids are closer than `min_distance` or the
/// force would not be finite.
pub fn newtonian_gravity_force(g: f64, a: &Body, b: &Body, min_distance: f64) -> Option<Vector> {
    let separation = b.centroid() - a.centroid();
    let distance = separation.length();
    if distance < min_distance || distance == 0.0 {
        return None;
    }
    let magnitude = g * a.mass() * b.mass() / (distance * distance);
    let force = separation * (magnitude / distance);
    force.is_finite().then_some(force)
}

/// Register inverse-square attraction between two bodies
pub fn create_newtonian_gravity<C: 'static>(scene: &mut Scene<C>, g: f64, a: BodyHandle, b: BodyHandle) {
    create_newtonian_gravity_clamped(scene, g, a, b, GRAVITY_MIN_DISTANCE);
}

/// Register inverse-square attraction, skipped below `min_distance`
pub fn create_newtonian_gravity_clamped<C: 'static>(
    scene: &mut Scene<C>,
    g: f64,
    a: BodyHandle,
    b: BodyHandle,
    min_distance: f64,
) {
    scene.add_bound_force_creator(
        move |bodies, _| {
            let Some((body_a, body_b)) = bodies.pair_mut(a, b) else {
                return;
            };
            if let Some(force) = newtonian_gravity_force(g, body_a, body_b, min_distance) {
                body_a.add_force(force);
                body_b.add_force(-force);
            }
        },
        vec![a, b],
    );
}

/// Register a handler invoked when two bodies start touching.
///
/// The handler receives both bodies, the collision axis, the elasticity and
/// the host context. It fires on the tick a contact begins and not again
/// until the bodies have separated. Bodies already marked removed are
/// ignored.
pub fn create_collision<C, H>(scene: &mut Scene<C>, a: BodyHandle, b: BodyHandle, handler: H, elasticity: f64)
where
    C: 'static,
    H: FnMut(&mut Body, &mut Body, Vector, f64, &mut C) + 'static,
{
    let mut handler = handler;
    let mut touching = false;
    scene.add_bound_force_creator(
        move |bodies, ctx| {
            let Some((body_a, body_b)) = bodies.pair_mut(a, b) else {
                return;
            };
            if body_a.is_removed() || body_b.is_removed() {
                return;
            }
            let result = find_collision(body_a, body_b);
            if result.collided && !touching {
                handler(body_a, body_b, result.axis, elasticity, ctx);
            }
            touching = result.collided;
        },
        vec![a, b],
    );
}

/// Exchange momentum along `axis` with the given elasticity.
///
/// The closing speed is shared out by inverse mass. An immovable side has
/// zero inverse mass, so the movable body reflects without recoil. The
/// response is queued as a velocity change, which stays finite even for
/// masses near `f64::MAX`.
pub fn physics_collision_handler<C>(a: &mut Body, b: &mut Body, axis: Vector, elasticity: f64, _ctx: &mut C) {
    let inv_a = inverse_mass(a);
    let inv_b = inverse_mass(b);
    let inv_sum = inv_a + inv_b;
    if inv_sum == 0.0 {
        return;
    }
    let u_a = a.velocity().dot(axis);
    let u_b = b.velocity().dot(axis);
    let closing = (1.0 + elasticity) * (u_b - u_a);
    a.add_velocity_change(axis * (closing * (inv_a / inv_sum)));
    b.add_velocity_change(axis * (-closing * (inv_b / inv_sum)));
}

fn inverse_mass(body: &Body) -> f64 {
    if body.is_immovable() { 0.0 } else { 1.0 / body.mass() }
}

/// Register an elastic bounce between two bodies
pub fn create_physics_collision<C: 'static>(scene: &mut Scene<C>, a: BodyHandle, b: BodyHandle, elasticity: f64) {
    create_collision(scene, a, b, physics_collision_handler::<C>, elasticity);
}

/// Register a collision that removes both bodies
pub fn create_destructive_collision<C: 'static>(scene: &mut Scene<C>, a: BodyHandle, b: BodyHandle) {
    create_collision(
        scene,
        a,
        b,
        |body_a: &mut Body, body_b: &mut Body, _: Vector, _: f64, _: &mut C| {
            body_a.remove();
            body_b.remove();
        },
        0.0,
    );
}

/// Register a bounce that also damages `b`, removing it once its health is
/// used up
pub fn create_damaging_collision<C: 'static>(
    scene: &mut Scene<C>,
    a: BodyHandle,
    b: BodyHandle,
    damage: f64,
    elasticity: f64,
) {
    create_collision(
        scene,
        a,
        b,
        move |body_a: &mut Body, body_b: &mut Body, axis: Vector, e: f64, ctx: &mut C| {
            physics_collision_handler(body_a, body_b, axis, e, ctx);
            body_b.subtract_health(damage);
            if body_b.health().is_some_and(|h| h <= 0.0) {
                body_b.remove();
            }
        },
        elasticity,
    );
}
