//! Sling Physics entry point
//!
//! Plays the sling-shot demo headlessly and reports the outcome.
//!
//! Usage: `sling-physics [SEED] [SETTINGS.json]`

use std::process::ExitCode;

use sling_physics::PhysicsSettings;
use sling_physics::consts::SIM_DT;
use sling_physics::demo::{GamePhase, SlingGame};

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Sling Physics (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        None => 0,
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let settings = match args.next() {
        Some(path) => match PhysicsSettings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => PhysicsSettings::default(),
    };

    let mut game = match SlingGame::new(settings, seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Failed to build level: {e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = game.autoplay(SIM_DT);
    let verdict = match outcome {
        GamePhase::Won => "won",
        _ => "lost",
    };
    println!(
        "Game {verdict}: {} points, {} hits, {} targets left",
        game.points(),
        game.context().targets_hit,
        game.targets_left()
    );
    ExitCode::SUCCESS
}
