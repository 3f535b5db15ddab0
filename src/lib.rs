//! Skyfall - runtime core of a vertically scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity pool, collisions, world scrolling, level streaming)
//! - `entities`: Stock entity types the level maps can place
//! - `backend`: Display/input/audio interface plus a headless implementation
//! - `config`: Data-driven tuning
//! - `error`: Fatal conditions raised by the core

pub mod backend;
pub mod config;
pub mod entities;
pub mod error;
pub mod sim;

pub use config::SimConfig;
pub use error::SimError;

/// Game configuration constants (defaults for `SimConfig`)
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Hard cap on simultaneously live entities
    pub const MAX_LIVE_ENTITIES: usize = 500;

    /// Dormant entities activate once `entity.y < player.y + ACTIVATION_DISTANCE`
    pub const ACTIVATION_DISTANCE: f32 = 300.0;

    /// Map cell size in pixels
    pub const COLUMN_PIXEL_FACTOR: f32 = 11.0;
    pub const ROW_PIXEL_FACTOR: f32 = 50.0;

    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 640.0;
    pub const VIEWPORT_HEIGHT: f32 = 480.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 320.0;
    pub const PLAYER_START_Y: f32 = 400.0;
    pub const PLAYER_SPEED: f32 = 4.0;
    pub const PLAYER_SIZE: f32 = 24.0;
    pub const STARTING_LIVES: u8 = 3;

    /// World shift per tick while the accelerate control is held
    pub const SCROLL_BOOST: f32 = 3.0;
    /// Respawn sequence length (ticks) and per-tick rewind while it runs
    pub const RESPAWN_TICKS: u32 = 90;
    pub const RESPAWN_REWIND: f32 = 2.0;

    /// Projectile defaults
    pub const SHOT_SPEED: f32 = 8.0;
    pub const SHOT_COOLDOWN_TICKS: u32 = 8;
}
