//! Fatal conditions raised by the simulation core
//!
//! Nothing inside the core catches or retries these; the surrounding
//! game-state manager decides what the player sees.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Live-entity count would exceed the configured maximum (runaway spawning)
    #[error("live entity count would reach {projected}, cap is {max}")]
    CapacityExceeded { projected: usize, max: usize },

    /// A level transition was requested but no further level exists
    #[error("no level follows '{after}'")]
    ContentExhausted { after: String },

    #[error("hitbox must have positive size, got {width}x{height}")]
    InvalidHitbox { width: f32, height: f32 },

    #[error("line weight must not be negative, got {weight}")]
    InvalidLineWeight { weight: f32 },

    #[error("shape must have positive size, got {width}x{height}")]
    InvalidDimension { width: f32, height: f32 },

    #[error("unknown level '{name}'")]
    UnknownLevel { name: String },

    #[error("level catalog is empty")]
    EmptyCatalog,

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// True for the conditions that end level progression rather than signal a bug
    pub fn is_content_exhausted(&self) -> bool {
        matches!(self, SimError::ContentExhausted { .. })
    }
}
