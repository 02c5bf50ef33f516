//! Deterministic physics kernel
//!
//! This module must stay pure and deterministic:
//! - Caller-supplied timestep only
//! - Stable iteration order (insertion order of bodies and registrations)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod color;
pub mod forces;
pub mod polygon;
pub mod scene;
pub mod shapes;
pub mod vector;

pub use body::{Body, BodyKind, INFINITE_MASS};
pub use collision::{CollisionResult, find_collision, find_shape_collision};
pub use color::Rgb;
pub use forces::{
    create_collision, create_damaging_collision, create_destructive_collision,
    create_newtonian_gravity, create_newtonian_gravity_clamped, create_physics_collision,
    newtonian_gravity_force, physics_collision_handler,
};
pub use polygon::Polygon;
pub use scene::{BodyHandle, Bodies, ForceCreator, Scene};
pub use vector::{VEC_ZERO, Vector, VectorExt};
