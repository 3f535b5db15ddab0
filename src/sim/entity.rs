//! Entity contract and capability roles
//!
//! Every simulated object implements `Entity`. Collision, world shifting and
//! lazy activation are opt-in roles an entity exposes through the `as_*`
//! queries; the indexing components ask for them at registration time.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::context::TickContext;
use super::draw::DrawList;
use super::position::Position;
use crate::error::SimError;

/// Instance identity: arena slot plus generation, so stale ids never resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    pub index: u32,
    pub generation: u32,
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// Coarse entity category, used by reactions to decide what hit them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Hostile,
    PlayerShot,
    HostileShot,
    Obstacle,
    /// Invisible trigger placed by the level (e.g. finish line)
    Marker,
    /// Visual only (explosions)
    Effect,
}

impl EntityKind {
    /// Kinds that destroy the player on contact
    pub fn harms_player(&self) -> bool {
        matches!(
            self,
            EntityKind::Hostile | EntityKind::HostileShot | EntityKind::Obstacle
        )
    }

    /// Kinds that a player shot can destroy
    pub fn shootable(&self) -> bool {
        matches!(self, EntityKind::Hostile)
    }
}

/// Spatial state shared by all entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Position,
    /// Nominal size before scaling
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    /// Distance moved per tick
    pub speed: f32,
    /// Distance to background; lower is drawn first (further back)
    pub depth: i32,
}

impl Body {
    pub fn new(position: Position, width: f32, height: f32) -> Self {
        Self {
            position,
            width,
            height,
            scale: 1.0,
            speed: 0.0,
            depth: 0,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Scaled width
    #[inline]
    pub fn width(&self) -> f32 {
        self.width * self.scale
    }

    /// Scaled height
    #[inline]
    pub fn height(&self) -> f32 {
        self.height * self.scale
    }

    pub fn center(&self) -> Position {
        Position::new(
            self.position.x + self.width() / 2.0,
            self.position.y + self.height() / 2.0,
        )
    }
}

/// Signed offsets from the nominal rectangle to the hitbox edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Insets {
    pub const NONE: Insets = Insets {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    /// Shrink the hitbox by `amount` on every side
    pub fn uniform(amount: f32) -> Self {
        Self {
            left: amount,
            top: amount,
            right: -amount,
            bottom: -amount,
        }
    }
}

/// Base unit of simulation
///
/// Per tick the pool calls `update_status`, `update_position` and
/// `submit_draw`, in that order, for every live entity.
pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;
    fn kind(&self) -> EntityKind;

    /// State machines, timers and reactions to last tick's collisions
    fn update_status(&mut self, _me: EntityId, _ctx: &mut TickContext<'_>) {}

    /// Own movement, applied after any world shift this tick
    fn update_position(&mut self, _me: EntityId, _ctx: &mut TickContext<'_>) {}

    fn submit_draw(&self, frame: &mut DrawList) -> Result<(), SimError>;

    fn as_collidable(&self) -> Option<&dyn Collidable> {
        None
    }

    fn as_collidable_mut(&mut self) -> Option<&mut dyn Collidable> {
        None
    }

    /// Opt into uniform world translation
    fn is_shiftable(&self) -> bool {
        false
    }

    fn as_activatable(&self) -> Option<&dyn Activatable> {
        None
    }
}

pub trait Collidable {
    fn insets(&self) -> Insets {
        Insets::NONE
    }

    /// Called once per overlapping pair per tick; must tolerate repeats
    fn react_to_collision_with(&mut self, me: EntityId, other: &dyn Entity, ctx: &mut TickContext<'_>);
}

/// Dormant-to-live promotion test against the reference entity (the player)
pub trait Activatable {
    fn try_to_activate(&self, reference: &Body) -> bool;
}

/// The uniform activation predicate: still ahead of the player, but within reach
#[inline]
pub fn within_activation_distance(body: &Body, reference: &Body, distance: f32) -> bool {
    body.position.y < reference.position.y + distance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_size() {
        let body = Body::new(Position::new(10.0, 10.0), 20.0, 10.0).with_scale(2.0);
        assert_eq!(body.width(), 40.0);
        assert_eq!(body.height(), 20.0);
        assert_eq!(body.center(), Position::new(30.0, 20.0));
    }

    #[test]
    fn test_activation_predicate() {
        let dormant = Body::new(Position::new(22.0, -100.0), 10.0, 10.0);
        let player = Body::new(Position::new(0.0, 210.0), 10.0, 10.0);
        assert!(within_activation_distance(&dormant, &player, 300.0));
        assert!(!within_activation_distance(&player, &dormant, 300.0));
    }

    #[test]
    fn test_kind_rules() {
        assert!(EntityKind::Hostile.harms_player());
        assert!(!EntityKind::PlayerShot.harms_player());
        assert!(EntityKind::Hostile.shootable());
        assert!(!EntityKind::Obstacle.shootable());
    }
}
