//! Sling Physics - deterministic 2D rigid-body kernel
//!
//! Core modules:
//! - `sim`: Convex polygons, rigid bodies, SAT collision, scene and forces
//! - `settings`: Data-driven physics tuning
//! - `platform`: Frame timing for host game loops
//! - `demo`: Headless sling-shot game built on the kernel

pub mod demo;
pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::PhysicsError;
pub use settings::PhysicsSettings;

use sim::Vector;

/// Simulation and demo configuration constants
pub mod consts {
    use crate::sim::Vector;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the fixed-step loop catches up on
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Gravity between bodies closer than this is skipped
    pub const GRAVITY_MIN_DISTANCE: f64 = 5.0;
    /// Perfectly elastic collisions
    pub const DEFAULT_ELASTICITY: f64 = 1.0;
    /// Gravitational constant of the demo world
    pub const GAME_GRAVITY: f64 = 750.0;

    /// Demo world bounds
    pub const WORLD_MIN: Vector = Vector::new(0.0, 0.0);
    pub const WORLD_MAX: Vector = Vector::new(1000.0, 500.0);
    pub const WALL_THICKNESS: f64 = 1.0;
    /// Heavy enough to barely move under the birds' pull
    pub const GROUND_MASS: f64 = 100_000.0;

    /// Birds
    pub const NUM_BIRDS: usize = 5;
    pub const BIRD_RADIUS: f64 = 20.0;
    pub const BIRD_MASS: f64 = 5.0;
    pub const BIRD_START: Vector = Vector::new(100.0, 80.0);
    /// Launch speed per unit of sling pull
    pub const VEL_MULTIPLIER: f64 = 10.0;
    /// Frames a bird may fly before it is retired
    pub const MAX_FLIGHT_FRAMES: u32 = 600;

    /// Targets
    pub const TARGET_RADIUS: f64 = 25.0;
    pub const TARGET_HEALTH: f64 = 150.0;
    pub const TARGET_HIT_DAMAGE: f64 = 150.0;
    pub const POINT_INCREMENT: u64 = 100;

    /// Wooden obstacles
    pub const WOOD_WIDTH: f64 = 50.0;
    pub const WOOD_HEIGHT: f64 = 80.0;

    /// Shot markers
    pub const MARKER_START: Vector = Vector::new(35.0, 425.0);
    pub const MARKER_SPACING: f64 = 40.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> Vector {
    Vector::new(r * theta.cos(), r * theta.sin())
}
