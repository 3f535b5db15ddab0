//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world deterministically. Per tick:
//! input, pool tick (pending mutations, world shift, status/position/draw),
//! collision pass, gameplay events, activation pass, then present-and-pace.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::CollisionIndex;
use super::context::{GameEvent, PlayerIntents, TickContext, Viewport};
use super::draw::{Color, DrawList};
use super::entity::EntityId;
use super::pool::EntityPool;
use super::position::Position;
use super::shift::WorldShiftCoordinator;
use super::streamer::{EntityCatalog, LevelCatalog, LoadReport, WorldStreamer};
use super::timer::GameClock;
use crate::backend::{Backend, PlayMode, SoundCue, SoundHandle};
use crate::config::SimConfig;
use crate::entities::{Player, StandardCatalog};
use crate::error::SimError;

/// What a single tick produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// The finish line was reached and the next level is loaded
    LevelAdvanced,
    /// Last life lost
    GameOver,
}

/// Totals reported when `run` returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub levels_cleared: u32,
    pub hostiles_destroyed: u32,
    pub lives_left: u8,
    pub game_over: bool,
}

/// Owns every piece of simulation state and drives it one tick at a time
pub struct SimulationLoop {
    config: SimConfig,
    levels: LevelCatalog,
    catalog: Box<dyn EntityCatalog>,
    pool: EntityPool,
    collisions: CollisionIndex,
    shifter: WorldShiftCoordinator,
    streamer: WorldStreamer,
    clock: GameClock,
    rng: Pcg32,
    frame: DrawList,
    player: Option<EntityId>,
    lives: u8,
    /// Ticks left in the current respawn sequence
    respawn_left: Option<u32>,
    engine: Option<SoundHandle>,
    summary: RunSummary,
}

impl SimulationLoop {
    /// Build the loop with the stock glyph table and load the first level
    pub fn new(config: SimConfig, levels: LevelCatalog) -> Self {
        let catalog = StandardCatalog::new(config.activation_distance);
        Self::with_catalog(config, levels, Box::new(catalog))
    }

    pub fn with_catalog(config: SimConfig, levels: LevelCatalog, catalog: Box<dyn EntityCatalog>) -> Self {
        let mut sim = Self {
            pool: EntityPool::new(config.max_live_entities),
            collisions: CollisionIndex::new(),
            shifter: WorldShiftCoordinator::new(),
            streamer: WorldStreamer::new(config.pixel_factors()),
            clock: GameClock::new(config.tick_rate),
            rng: Pcg32::seed_from_u64(config.seed),
            frame: DrawList::new(),
            player: None,
            lives: config.starting_lives,
            respawn_left: None,
            engine: None,
            summary: RunSummary::default(),
            config,
            levels,
            catalog,
        };
        let first = sim.levels.first();
        sim.streamer
            .load(first, &*sim.catalog, &mut sim.pool, &mut sim.shifter);
        sim.spawn_player();
        sim
    }

    /// Replace the world with the named level and put a fresh player in it
    pub fn load_level(&mut self, name: &str) -> Result<LoadReport, SimError> {
        let level = self.levels.get(name)?;
        let report = self
            .streamer
            .load(level, &*self.catalog, &mut self.pool, &mut self.shifter);
        self.respawn_left = None;
        self.spawn_player();
        Ok(report)
    }

    fn spawn_player(&mut self) {
        let player = Player::new(self.config.player_start, self.config.player_speed);
        let id = self.pool.spawn(Box::new(player));
        self.pool.set_reference(id);
        self.player = Some(id);
        log::debug!("Player spawned as {}", id);
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            width: self.config.viewport_width,
            height: self.config.viewport_height,
        }
    }

    /// Engine hum follows the accelerate control
    fn update_engine<B: Backend>(&mut self, backend: &mut B, accelerating: bool) {
        match (accelerating, self.engine) {
            (true, None) => self.engine = Some(backend.play(SoundCue::Engine, PlayMode::Looping)),
            (false, Some(handle)) => {
                backend.stop(handle);
                self.engine = None;
            }
            _ => {}
        }
    }

    /// Advance the respawn sequence; the world rewinds while it runs
    fn respawn_step(&mut self) {
        let Some(left) = self.respawn_left else {
            return;
        };
        self.shifter.shift_up(self.config.respawn_rewind);
        if left <= 1 {
            self.respawn_left = None;
            self.spawn_player();
        } else {
            self.respawn_left = Some(left - 1);
        }
    }

    /// Run one full tick against `backend`
    pub fn step<B: Backend>(&mut self, backend: &mut B) -> Result<TickOutcome, SimError> {
        let input = backend.poll();
        let intents = if self.player.is_some() {
            self.config.keys.intents(&input)
        } else {
            PlayerIntents::default()
        };

        self.update_engine(backend, intents.accelerate);
        if intents.accelerate {
            self.shifter.shift_down(self.config.scroll_boost);
        }
        self.respawn_step();

        self.frame.clear();
        let viewport = self.viewport();
        let events = {
            let mut ctx = TickContext::new(&self.clock, viewport, &mut self.rng, &mut *backend);
            ctx.intents = intents;
            self.pool
                .tick(&mut self.collisions, &mut self.shifter, &mut ctx, &mut self.frame)?;
            self.pool.absorb(ctx.take_commands());
            self.collisions.pass(&mut self.pool, &mut ctx)?;
            self.pool.absorb(ctx.take_commands());
            ctx.take_events()
        };

        let mut player_lost = false;
        let mut level_complete = false;
        for event in events {
            match event {
                GameEvent::HostileDestroyed => self.summary.hostiles_destroyed += 1,
                GameEvent::PlayerDestroyed => player_lost = true,
                GameEvent::LevelComplete => level_complete = true,
            }
        }

        let mut outcome = TickOutcome::Running;
        if level_complete {
            // The old level's ship goes away with the old level
            if player_lost {
                log::debug!("Ship lost on the finishing tick, level clear wins");
            }
            self.summary.levels_cleared += 1;
            if let Err(e) = self.streamer.advance(
                &self.levels,
                &*self.catalog,
                &mut self.pool,
                &mut self.shifter,
            ) {
                self.record_tick(outcome);
                return Err(e);
            }
            self.respawn_left = None;
            self.spawn_player();
            outcome = TickOutcome::LevelAdvanced;
        } else if player_lost {
            self.player = None;
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                log::info!("Game over at tick {}", self.clock.ticks());
                outcome = TickOutcome::GameOver;
            } else {
                log::info!("Player down, {} lives left", self.lives);
                self.respawn_left = Some(self.config.respawn_ticks);
            }
        }

        let promoted = self.streamer.activate(&mut self.pool, &mut self.shifter);
        if promoted > 0 {
            log::trace!("{} entities activated", promoted);
        }

        self.frame.set_depth(i32::MAX);
        self.frame.text(
            format!("LIVES {}", self.lives),
            Position::new(8.0, 8.0),
            16.0,
            Color::WHITE,
        );
        backend.present_and_pace(&self.frame);
        self.record_tick(outcome);
        Ok(outcome)
    }

    fn record_tick(&mut self, outcome: TickOutcome) {
        self.clock.advance();
        self.summary.ticks += 1;
        self.summary.lives_left = self.lives;
        self.summary.game_over = outcome == TickOutcome::GameOver;
    }

    /// Tick until the display goes away or the game ends
    pub fn run<B: Backend>(&mut self, backend: &mut B) -> Result<RunSummary, SimError> {
        log::info!(
            "Starting level '{}' at {} ticks/s",
            self.streamer.current_level().unwrap_or("?"),
            self.config.tick_rate
        );
        let result = self.run_until_done(backend);
        if let Some(handle) = self.engine.take() {
            backend.stop(handle);
        }
        result
    }

    fn run_until_done<B: Backend>(&mut self, backend: &mut B) -> Result<RunSummary, SimError> {
        while backend.is_visible() {
            if self.step(backend)? == TickOutcome::GameOver {
                break;
            }
        }
        Ok(self.summary)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn shifter(&self) -> &WorldShiftCoordinator {
        &self.shifter
    }

    pub fn collisions(&self) -> &CollisionIndex {
        &self.collisions
    }

    pub fn streamer(&self) -> &WorldStreamer {
        &self.streamer
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Draw list of the last presented frame
    pub fn frame(&self) -> &DrawList {
        &self.frame
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn is_respawning(&self) -> bool {
        self.respawn_left.is_some()
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }
}
