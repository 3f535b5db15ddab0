//! The player ship (reference entity)
//!
//! Never shiftable: its position is the visual anchor the world scrolls past.

use super::{Explosion, Shot};
use crate::backend::SoundCue;
use crate::consts::{PLAYER_SIZE, SHOT_COOLDOWN_TICKS};
use crate::error::SimError;
use crate::sim::{
    Body, Collidable, Cooldown, DrawList, Entity, EntityId, EntityKind, GameEvent, Insets,
    Position, TickContext, TimerId, Timers,
};

/// Ticks spent exploding before the ship is removed
pub const WRECK_TICKS: u32 = 30;

const WRECK_TIMER: TimerId = TimerId("wreck");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Flying,
    Exploding,
}

#[derive(Debug, Clone)]
pub struct Player {
    body: Body,
    state: PlayerState,
    gun: Cooldown,
    timers: Timers,
}

impl Player {
    pub fn new(at: Position, speed: f32) -> Self {
        Self {
            body: Body::new(at, PLAYER_SIZE, PLAYER_SIZE)
                .with_speed(speed)
                .with_depth(10),
            state: PlayerState::Flying,
            gun: Cooldown::default(),
            timers: Timers::new(),
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    fn muzzle(&self) -> Position {
        Position::new(
            self.body.center().x - Shot::WIDTH / 2.0,
            self.body.position.y - Shot::HEIGHT,
        )
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn update_status(&mut self, me: EntityId, ctx: &mut TickContext<'_>) {
        match self.state {
            PlayerState::Flying => {
                if ctx.intents.fire && self.gun.try_use(ctx.clock, SHOT_COOLDOWN_TICKS) {
                    ctx.spawn(Box::new(Shot::from_player(self.muzzle())));
                    ctx.play_sound(SoundCue::Shot);
                }
            }
            PlayerState::Exploding => {
                if self.timers.poll(WRECK_TIMER, WRECK_TICKS, 1, ctx.clock) {
                    ctx.emit(GameEvent::PlayerDestroyed);
                    ctx.destroy(me);
                }
            }
        }
    }

    fn update_position(&mut self, _me: EntityId, ctx: &mut TickContext<'_>) {
        if self.state != PlayerState::Flying {
            return;
        }
        let speed = self.body.speed;
        let max_x = (ctx.viewport.width - self.body.width()).max(0.0);
        let max_y = (ctx.viewport.height - self.body.height()).max(0.0);
        let p = &mut self.body.position;
        p.translate(ctx.intents.move_x * speed, ctx.intents.move_y * speed);
        p.x = p.x.clamp(0.0, max_x);
        p.y = p.y.clamp(0.0, max_y);
    }

    fn submit_draw(&self, frame: &mut DrawList) -> Result<(), SimError> {
        let key = match self.state {
            PlayerState::Flying => "player",
            PlayerState::Exploding => "player_wreck",
        };
        frame.image(key, self.body.position, 0.0, self.body.scale);
        Ok(())
    }

    fn as_collidable(&self) -> Option<&dyn Collidable> {
        Some(self)
    }

    fn as_collidable_mut(&mut self) -> Option<&mut dyn Collidable> {
        Some(self)
    }
}

impl Collidable for Player {
    fn insets(&self) -> Insets {
        Insets::uniform(3.0)
    }

    fn react_to_collision_with(&mut self, _me: EntityId, other: &dyn Entity, ctx: &mut TickContext<'_>) {
        // Already going down: later hits are ignored
        if self.state != PlayerState::Flying || !other.kind().harms_player() {
            return;
        }
        log::debug!("Player hit by {:?}", other.kind());
        self.state = PlayerState::Exploding;
        ctx.play_sound(SoundCue::PlayerDown);
        ctx.spawn(Box::new(Explosion::at(self.body.center())));
    }
}
