//! Simulation configuration
//!
//! Loaded from JSON; any field left out falls back to the defaults in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::{InputSnapshot, KeyCode};
use crate::consts::*;
use crate::error::SimError;
use crate::sim::{PlayerIntents, Position};

/// Which keys drive which player intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub up: Vec<KeyCode>,
    pub down: Vec<KeyCode>,
    pub fire: Vec<KeyCode>,
    pub accelerate: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec![KeyCode::Left, KeyCode::Char('a')],
            right: vec![KeyCode::Right, KeyCode::Char('d')],
            up: vec![KeyCode::Up, KeyCode::Char('w')],
            down: vec![KeyCode::Down, KeyCode::Char('s')],
            fire: vec![KeyCode::Space],
            accelerate: vec![KeyCode::Shift],
        }
    }
}

impl KeyBindings {
    /// Translate a polled input snapshot into player intents
    pub fn intents(&self, input: &InputSnapshot) -> PlayerIntents {
        let held = |keys: &[KeyCode]| keys.iter().any(|k| input.is_pressed(*k));
        let axis = |neg: bool, pos: bool| match (neg, pos) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };

        PlayerIntents {
            move_x: axis(held(&self.left), held(&self.right)),
            move_y: axis(held(&self.up), held(&self.down)),
            fire: held(&self.fire),
            accelerate: held(&self.accelerate),
        }
    }
}

/// All tunables of the simulation core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Ticks per second; the display paces to this rate
    pub tick_rate: u32,
    /// Fatal cap on live entities
    pub max_live_entities: usize,
    /// Distance ahead of the player at which dormant entities activate
    pub activation_distance: f32,
    pub column_pixel_factor: f32,
    pub row_pixel_factor: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub player_start: Position,
    pub player_speed: f32,
    pub starting_lives: u8,
    /// World shift per tick while accelerating
    pub scroll_boost: f32,
    pub respawn_ticks: u32,
    /// World shift-up per tick during a respawn sequence
    pub respawn_rewind: f32,
    /// Seed for the simulation RNG
    pub seed: u64,
    pub keys: KeyBindings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            max_live_entities: MAX_LIVE_ENTITIES,
            activation_distance: ACTIVATION_DISTANCE,
            column_pixel_factor: COLUMN_PIXEL_FACTOR,
            row_pixel_factor: ROW_PIXEL_FACTOR,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            player_start: Position::new(PLAYER_START_X, PLAYER_START_Y),
            player_speed: PLAYER_SPEED,
            starting_lives: STARTING_LIVES,
            scroll_boost: SCROLL_BOOST,
            respawn_ticks: RESPAWN_TICKS,
            respawn_rewind: RESPAWN_REWIND,
            seed: 0x5eed,
            keys: KeyBindings::default(),
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Pixel factors used to place map cells, as (column, row)
    pub fn pixel_factors(&self) -> (f32, f32) {
        (self.column_pixel_factor, self.row_pixel_factor)
    }

    /// Frame period for pacing
    pub fn frame_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{ "max_live_entities": 20, "seed": 7 }"#).unwrap();
        assert_eq!(config.max_live_entities, 20);
        assert_eq!(config.seed, 7);
        assert_eq!(config.tick_rate, TICK_RATE);
        assert_eq!(config.activation_distance, ACTIVATION_DISTANCE);
        assert_eq!(config.keys, KeyBindings::default());
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = SimConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_intents_from_keys() {
        let keys = KeyBindings::default();
        let input = InputSnapshot {
            pressed: vec![KeyCode::Left, KeyCode::Space, KeyCode::Shift],
            events: Vec::new(),
        };
        let intents = keys.intents(&input);
        assert_eq!(intents.move_x, -1.0);
        assert_eq!(intents.move_y, 0.0);
        assert!(intents.fire);
        assert!(intents.accelerate);

        // Opposing keys cancel out
        let input = InputSnapshot {
            pressed: vec![KeyCode::Left, KeyCode::Right],
            events: Vec::new(),
        };
        assert_eq!(keys.intents(&input).move_x, 0.0);
    }
}
