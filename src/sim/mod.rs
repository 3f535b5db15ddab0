//! Deterministic simulation module
//!
//! All gameplay plumbing lives here. This module must stay deterministic:
//! - Fixed tick only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the live list)
//! - No rendering or platform dependencies beyond the backend traits

pub mod collision;
pub mod context;
pub mod draw;
pub mod entity;
pub mod pool;
pub mod position;
pub mod shift;
pub mod streamer;
pub mod tick;
pub mod timer;

#[cfg(test)]
pub(crate) mod testing;

pub use collision::{CollisionIndex, Hitbox, hitbox_of};
pub use context::{Command, GameEvent, PlayerIntents, TickContext, Viewport};
pub use draw::{Color, DrawCommand, DrawList};
pub use entity::{
    Activatable, Body, Collidable, Entity, EntityId, EntityKind, Insets, within_activation_distance,
};
pub use pool::EntityPool;
pub use position::Position;
pub use shift::WorldShiftCoordinator;
pub use streamer::{
    EntityCatalog, Level, LevelCatalog, LoadReport, Placement, WorldStreamer, parse_placements,
};
pub use tick::{RunSummary, SimulationLoop, TickOutcome};
pub use timer::{Cooldown, DebouncedTimer, GameClock, TimerId, Timers};
