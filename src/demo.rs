//! Headless sling-shot game
//!
//! A host built on the kernel: birds are flung at targets sheltered by
//! wooden obstacles inside a walled arena. Collision behavior is chosen by
//! body kind when the level is wired up; scoring lives in the host context
//! passed to every scene tick.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::error::PhysicsError;
use crate::platform::FixedStep;
use crate::polar_to_cartesian;
use crate::settings::PhysicsSettings;
use crate::sim::{
    Body, BodyHandle, BodyKind, INFINITE_MASS, Rgb, Scene, Vector, create_collision,
    create_newtonian_gravity_clamped, physics_collision_handler, shapes,
};

const TARGET_LOCATIONS: [Vector; 4] = [
    Vector::new(500.0, 100.0),
    Vector::new(600.0, 350.0),
    Vector::new(675.0, 175.0),
    Vector::new(825.0, 400.0),
];

const WOOD_LOCATIONS: [Vector; 19] = [
    Vector::new(500.0, 0.0),
    Vector::new(500.0, 50.0),
    Vector::new(600.0, 0.0),
    Vector::new(600.0, 50.0),
    Vector::new(600.0, 100.0),
    Vector::new(600.0, 250.0),
    Vector::new(600.0, 300.0),
    Vector::new(675.0, 0.0),
    Vector::new(675.0, 50.0),
    Vector::new(675.0, 100.0),
    Vector::new(675.0, 125.0),
    Vector::new(825.0, 0.0),
    Vector::new(825.0, 50.0),
    Vector::new(825.0, 100.0),
    Vector::new(825.0, 150.0),
    Vector::new(825.0, 200.0),
    Vector::new(825.0, 250.0),
    Vector::new(825.0, 300.0),
    Vector::new(825.0, 350.0),
];

const WOOD_COLOR: Rgb = Rgb::new(0.6, 0.4, 0.2);
const TARGET_COLOR: Rgb = Rgb::new(0.3, 0.8, 0.3);
const BIRD_COLOR: Rgb = Rgb::new(0.9, 0.1, 0.1);

/// Largest random deviation applied to a launch angle (radians)
const AIM_JITTER: f64 = 0.05;

/// Host state shared with collision handlers
#[derive(Debug, Clone, Default)]
pub struct GameContext {
    pub points: u64,
    pub targets_hit: u32,
}

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Next bird waiting on the sling
    Aiming,
    /// A bird is in the air
    Flying,
    /// Every target destroyed
    Won,
    /// Out of birds with targets left
    Lost,
}

/// The whole game: scene, host context and bookkeeping
pub struct SlingGame {
    scene: Scene<GameContext>,
    ctx: GameContext,
    settings: PhysicsSettings,
    stepper: FixedStep,
    seed: u64,
    rng: Pcg32,
    ground: BodyHandle,
    /// Unlaunched and in-flight birds, next to launch first
    birds: Vec<BodyHandle>,
    markers: Vec<BodyHandle>,
    targets: Vec<BodyHandle>,
    phase: GamePhase,
    paused: bool,
    flight_frames: u32,
}

impl SlingGame {
    /// Build the level
    pub fn new(settings: PhysicsSettings, seed: u64) -> Result<Self, PhysicsError> {
        settings.validate()?;
        let mut scene: Scene<GameContext> = Scene::new();

        for loc in WOOD_LOCATIONS {
            let shape = shapes::rectangle(loc, WOOD_WIDTH, WOOD_HEIGHT);
            scene.add_body(Body::new(shape, INFINITE_MASS, WOOD_COLOR, BodyKind::Obstacle)?);
        }
        let ground = add_boundaries(&mut scene)?;

        let mut birds = Vec::with_capacity(NUM_BIRDS);
        let mut markers = Vec::with_capacity(NUM_BIRDS);
        for i in 0..NUM_BIRDS {
            let bird = Body::new(shapes::circle(BIRD_START, BIRD_RADIUS), BIRD_MASS, BIRD_COLOR, BodyKind::Projectile)?;
            birds.push(scene.add_body(bird));

            let marker_loc = MARKER_START + Vector::new(MARKER_SPACING * i as f64, 0.0);
            let marker = Body::new(shapes::circle(marker_loc, BIRD_RADIUS / 2.0), BIRD_MASS, BIRD_COLOR, BodyKind::Marker)?;
            markers.push(scene.add_body(marker));
        }

        let mut targets = Vec::with_capacity(TARGET_LOCATIONS.len());
        for loc in TARGET_LOCATIONS {
            let target = Body::damageable(
                TARGET_HEALTH,
                shapes::circle(loc, TARGET_RADIUS),
                INFINITE_MASS,
                TARGET_COLOR,
                BodyKind::Target,
            )?;
            targets.push(scene.add_body(target));
        }

        let stepper = FixedStep::new(settings.fixed_dt, settings.max_frame_dt, settings.max_substeps);
        let mut game = Self {
            scene,
            ctx: GameContext::default(),
            settings,
            stepper,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ground,
            birds,
            markers,
            targets,
            phase: GamePhase::Aiming,
            paused: false,
            flight_frames: 0,
        };
        game.wire_collisions();
        log::info!(
            "Level ready: {} bodies, {} force registrations",
            game.scene.len(),
            game.scene.registration_count()
        );
        Ok(game)
    }

    /// Pick collision behavior for every bird against every other body
    fn wire_collisions(&mut self) {
        let elasticity = self.settings.elasticity;
        let others: Vec<(BodyHandle, BodyKind)> = self
            .scene
            .bodies()
            .iter()
            .map(|(handle, body)| (handle, body.kind()))
            .collect();

        for &bird in &self.birds {
            for &(other, kind) in &others {
                match kind {
                    BodyKind::Target => {
                        create_collision(&mut self.scene, bird, other, target_hit, elasticity);
                    }
                    BodyKind::Wall | BodyKind::Ground | BodyKind::Obstacle => {
                        create_collision(&mut self.scene, bird, other, boundary_hit, elasticity);
                    }
                    BodyKind::Projectile | BodyKind::Marker | BodyKind::Untagged => {}
                }
            }
        }
    }

    /// Rebuild the level from scratch: all birds back, score zeroed
    pub fn reset(&mut self) -> Result<(), PhysicsError> {
        *self = Self::new(self.settings.clone(), self.seed)?;
        log::info!("Level reset");
        Ok(())
    }

    /// Freeze or resume the simulation; returns true if now paused
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        log::debug!("Paused: {}", self.paused);
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn points(&self) -> u64 {
        self.ctx.points
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn scene(&self) -> &Scene<GameContext> {
        &self.scene
    }

    pub fn birds_left(&self) -> usize {
        self.birds.len()
    }

    pub fn targets_left(&self) -> usize {
        self.targets.len()
    }

    /// Fling the next bird with a sling pull of `pull` (world units).
    ///
    /// Returns false if no bird is waiting.
    pub fn launch(&mut self, pull: Vector) -> bool {
        if self.paused || self.phase != GamePhase::Aiming {
            return false;
        }
        let Some(&bird) = self.birds.first() else {
            return false;
        };

        let jitter = self.rng.random_range(-AIM_JITTER..=AIM_JITTER);
        let angle = pull.y.atan2(pull.x) + jitter;
        let velocity = polar_to_cartesian(pull.length() * VEL_MULTIPLIER, angle);

        if let Some(body) = self.scene.get_mut(bird) {
            body.set_velocity(velocity);
        }
        if let Some(marker) = self.markers.pop() {
            if let Some(body) = self.scene.get_mut(marker) {
                body.remove();
            }
        }
        create_newtonian_gravity_clamped(
            &mut self.scene,
            self.settings.gravity_constant,
            bird,
            self.ground,
            self.settings.min_gravity_distance,
        );

        log::info!("Bird {} launched at ({:.1}, {:.1})", bird.id(), velocity.x, velocity.y);
        self.phase = GamePhase::Flying;
        self.flight_frames = 0;
        true
    }

    /// Advance by one host frame of `frame_dt` seconds
    pub fn frame(&mut self, frame_dt: f64) {
        if self.paused || matches!(self.phase, GamePhase::Won | GamePhase::Lost) {
            return;
        }

        let steps = self.stepper.advance(frame_dt);
        for _ in 0..steps {
            self.scene.tick_with(self.stepper.step(), &mut self.ctx);
        }

        if self.phase == GamePhase::Flying {
            self.flight_frames += 1;
            if self.flight_frames >= MAX_FLIGHT_FRAMES {
                if let Some(body) = self.birds.first().and_then(|&h| self.scene.get_mut(h)) {
                    log::debug!("Bird retired after {} frames", self.flight_frames);
                    body.remove();
                }
            }
        }

        self.update_phase();
    }

    fn is_gone(&self, handle: BodyHandle) -> bool {
        self.scene.get(handle).is_none_or(|b| b.is_removed())
    }

    fn update_phase(&mut self) {
        let targets: Vec<BodyHandle> = self.targets.iter().copied().filter(|&h| !self.is_gone(h)).collect();
        self.targets = targets;

        if self.phase == GamePhase::Flying && self.birds.first().is_some_and(|&h| self.is_gone(h)) {
            self.birds.remove(0);
            self.phase = GamePhase::Aiming;
        }

        if self.targets.is_empty() {
            log::info!("All targets down with {} points", self.ctx.points);
            self.phase = GamePhase::Won;
        } else if self.birds.is_empty() {
            log::info!("Out of birds with {} targets left", self.targets.len());
            self.phase = GamePhase::Lost;
        }
    }

    /// Play the whole level, aiming each shot at the nearest remaining target
    pub fn autoplay(&mut self, frame_dt: f64) -> GamePhase {
        self.paused = false;
        while !matches!(self.phase, GamePhase::Won | GamePhase::Lost) {
            if self.phase == GamePhase::Aiming {
                let pull = self.aim_at_nearest_target();
                self.launch(pull);
            }
            self.frame(frame_dt);
        }
        self.phase
    }

    fn aim_at_nearest_target(&self) -> Vector {
        let start = self
            .birds
            .first()
            .and_then(|&h| self.scene.get(h))
            .map(|b| b.centroid())
            .unwrap_or(BIRD_START);
        self.targets
            .iter()
            .filter_map(|&h| self.scene.get(h))
            .map(|t| t.centroid() - start)
            .min_by(|a, b| a.length().total_cmp(&b.length()))
            // Aim high to fight the pull of the ground
            .map(|d| Vector::new(d.x, d.y + d.x) * 0.1)
            .unwrap_or(Vector::new(30.0, 30.0))
    }
}

fn add_boundaries(scene: &mut Scene<GameContext>) -> Result<BodyHandle, PhysicsError> {
    let mid = (WORLD_MIN + WORLD_MAX) / 2.0;
    let width = WORLD_MAX.x - WORLD_MIN.x;
    let height = WORLD_MAX.y - WORLD_MIN.y;

    let walls = [
        shapes::rectangle(Vector::new(WORLD_MAX.x, mid.y), WALL_THICKNESS, height),
        shapes::rectangle(Vector::new(WORLD_MIN.x, mid.y), WALL_THICKNESS, height),
        shapes::rectangle(Vector::new(mid.x, WORLD_MAX.y), width, WALL_THICKNESS),
    ];
    for shape in walls {
        scene.add_body(Body::new(shape, INFINITE_MASS, Rgb::WHITE, BodyKind::Wall)?);
    }

    let ground = shapes::rectangle(Vector::new(mid.x, WORLD_MIN.y), width, WALL_THICKNESS);
    Ok(scene.add_body(Body::new(ground, GROUND_MASS, Rgb::WHITE, BodyKind::Ground)?))
}

/// Bird strikes a target: bounce, score, and damage it
fn target_hit(bird: &mut Body, target: &mut Body, axis: Vector, elasticity: f64, ctx: &mut GameContext) {
    physics_collision_handler(bird, target, axis, elasticity, ctx);
    ctx.points += POINT_INCREMENT;
    ctx.targets_hit += 1;
    target.subtract_health(TARGET_HIT_DAMAGE);
    if target.health().is_some_and(|h| h <= 0.0) {
        target.remove();
    }
}

/// Bird hits scenery and is spent
fn boundary_hit(bird: &mut Body, _: &mut Body, _: Vector, _: f64, _: &mut GameContext) {
    bird.remove();
}
