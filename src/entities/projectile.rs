//! Straight-flying shots

use glam::Vec2;

use super::OFFSCREEN_MARGIN;
use crate::consts::SHOT_SPEED;
use crate::error::SimError;
use crate::sim::{
    Body, Collidable, Color, DrawList, Entity, EntityId, EntityKind, Position, TickContext,
};

#[derive(Debug, Clone)]
pub struct Shot {
    body: Body,
    kind: EntityKind,
    /// Per-tick velocity (negative y = up the screen)
    velocity: Vec2,
    spent: bool,
}

impl Shot {
    pub const WIDTH: f32 = 4.0;
    pub const HEIGHT: f32 = 10.0;

    /// Player shot flying up the screen
    pub fn from_player(at: Position) -> Self {
        Self::new(at, EntityKind::PlayerShot, Vec2::new(0.0, -SHOT_SPEED))
    }

    /// Hostile shot flying straight down the screen, slower than the player's
    pub fn from_hostile(at: Position) -> Self {
        Self::aimed(at, Vec2::Y)
    }

    /// Hostile shot along `direction`; a zero direction falls back to straight down
    pub fn aimed(at: Position, direction: Vec2) -> Self {
        let direction = direction.try_normalize().unwrap_or(Vec2::Y);
        Self::new(at, EntityKind::HostileShot, direction * SHOT_SPEED / 2.0)
    }

    fn new(at: Position, kind: EntityKind, velocity: Vec2) -> Self {
        Self {
            body: Body::new(at, Self::WIDTH, Self::HEIGHT)
                .with_speed(velocity.length())
                .with_depth(5),
            kind,
            velocity,
            spent: false,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn hits(&self, other: EntityKind) -> bool {
        match self.kind {
            EntityKind::PlayerShot => other.shootable() || other == EntityKind::Obstacle,
            EntityKind::HostileShot => other == EntityKind::Player || other == EntityKind::Obstacle,
            _ => false,
        }
    }
}

impl Entity for Shot {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn update_status(&mut self, me: EntityId, ctx: &mut TickContext<'_>) {
        if !ctx.viewport.contains(&self.body.position, OFFSCREEN_MARGIN) {
            ctx.destroy(me);
        }
    }

    fn update_position(&mut self, _me: EntityId, _ctx: &mut TickContext<'_>) {
        self.body.position.translate(self.velocity.x, self.velocity.y);
    }

    fn submit_draw(&self, frame: &mut DrawList) -> Result<(), SimError> {
        let color = match self.kind {
            EntityKind::PlayerShot => Color::CYAN,
            _ => Color::ORANGE,
        };
        frame.rect(
            self.body.position,
            self.body.width(),
            self.body.height(),
            color,
            None,
        )
    }

    fn as_collidable(&self) -> Option<&dyn Collidable> {
        Some(self)
    }

    fn as_collidable_mut(&mut self) -> Option<&mut dyn Collidable> {
        Some(self)
    }
}

impl Collidable for Shot {
    fn react_to_collision_with(&mut self, me: EntityId, other: &dyn Entity, ctx: &mut TickContext<'_>) {
        if !self.spent && self.hits(other.kind()) {
            self.spent = true;
            ctx.destroy(me);
        }
    }
}
