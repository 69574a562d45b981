//! Galaxy Raid entry point
//!
//! Headless demo run: loads optional settings, lets the autopilot fly the
//! ship for a number of frames and logs how it went.
//!
//! Usage: `galaxy-raid [settings.json] [frames]`

use std::ops::ControlFlow;
use std::process::ExitCode;

use galaxy_raid::platform::{ActionState, RenderItem, StaticAssets};
use galaxy_raid::{Engine, Settings};

const DEFAULT_FRAMES: u64 = 60 * 60;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Galaxy Raid (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("Failed to load settings from {path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    let frames = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(frames)) => frames,
        Some(Err(err)) => {
            log::error!("Invalid frame count: {err}");
            return ExitCode::FAILURE;
        }
        None => DEFAULT_FRAMES,
    };

    let mut engine = match Engine::new(settings, Box::new(StaticAssets::default())) {
        Ok(engine) => engine,
        Err(err) => {
            log::error!("Failed to build the scenario: {err}");
            return ExitCode::FAILURE;
        }
    };
    engine.set_autopilot(true);

    let mut peak = 0;
    let mut sink = |frame: u64, snapshot: &[RenderItem]| {
        peak = peak.max(snapshot.len());
        if frame % 600 == 0 {
            log::info!("Frame {frame}: {} entities on screen", snapshot.len());
        }
        ControlFlow::Continue(())
    };
    let run = engine.run(&ActionState::default(), &mut sink, Some(frames));

    match run {
        Ok(ran) => {
            let world = engine.world();
            let lives = world
                .player()
                .and_then(|id| world.get(id))
                .and_then(|player| player.behavior.as_player())
                .map_or(0, |player| player.lives());
            let wave = engine.wave().map_or(0, |wave| wave.index() + 1);
            log::info!("Ran {ran} frames: reached wave {wave}, {lives} lives left, peak {peak} entities");
            if engine.is_over() {
                log::info!("Game over");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Simulation aborted: {err}");
            ExitCode::FAILURE
        }
    }
}
