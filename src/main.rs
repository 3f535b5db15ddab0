//! Skyfall headless runner
//!
//! Usage: `skyfall [config.json] [levels.json]`
//!
//! Runs the level catalog against the headless backend with the player
//! holding fire and accelerate, paced to the configured tick rate.

use std::process::ExitCode;

use skyfall::backend::{HeadlessBackend, InputSnapshot, KeyCode};
use skyfall::sim::{LevelCatalog, RunSummary, SimulationLoop};
use skyfall::{SimConfig, SimError};

const BUNDLED_LEVELS: &str = include_str!("../levels/levels.json");

/// Two minutes of play at the default tick rate
const DEMO_SECONDS: u64 = 120;

fn run() -> Result<RunSummary, SimError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let levels = match args.next() {
        Some(path) => LevelCatalog::load(path)?,
        None => LevelCatalog::from_json(BUNDLED_LEVELS)?,
    };

    let autopilot: Vec<KeyCode> = [config.keys.fire.first(), config.keys.accelerate.first()]
        .into_iter()
        .flatten()
        .copied()
        .collect();
    let mut backend = HeadlessBackend::new()
        .with_idle_input(InputSnapshot::holding(&autopilot))
        .with_pacing(config.frame_period())
        .with_frame_budget(DEMO_SECONDS * config.tick_rate as u64);

    log::info!(
        "Skyfall (headless) starting: {} levels, seed {:#x}",
        levels.len(),
        config.seed
    );
    let mut sim = SimulationLoop::new(config, levels);
    match sim.run(&mut backend) {
        Ok(summary) => Ok(summary),
        Err(e) if e.is_content_exhausted() => {
            log::info!("All levels cleared");
            Ok(sim.summary())
        }
        Err(e) => Err(e),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(summary) => {
            match serde_json::to_string_pretty(&summary) {
                Ok(json) => println!("{json}"),
                Err(e) => log::warn!("Could not encode summary: {}", e),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
