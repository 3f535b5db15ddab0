//! Hostile map entities
//!
//! Both kinds are placed by level maps: shiftable, activatable, collidable.

use rand::Rng;

use super::{Explosion, Shot, below_viewport};
use crate::backend::SoundCue;
use crate::error::SimError;
use crate::sim::{
    Activatable, Body, Collidable, DebouncedTimer, DrawList, Entity, EntityId, EntityKind,
    GameEvent, Insets, Position, TickContext, within_activation_distance,
};

/// Shared death sequence: effect, sound, event, removal
fn go_down(body: &Body, me: EntityId, ctx: &mut TickContext<'_>) {
    ctx.spawn(Box::new(Explosion::at(body.center())));
    ctx.play_sound(SoundCue::Explosion);
    ctx.emit(GameEvent::HostileDestroyed);
    ctx.destroy(me);
}

/// Weaving drone that drifts down the screen
#[derive(Debug, Clone)]
pub struct Drone {
    body: Body,
    activation_distance: f32,
    /// Weave phase, seeded from the simulation RNG on first update
    phase: Option<f32>,
    age: u32,
    downed: bool,
}

impl Drone {
    pub fn new(activation_distance: f32) -> Self {
        Self {
            body: Body::new(Position::ORIGIN, 28.0, 20.0)
                .with_speed(1.0)
                .with_depth(6),
            activation_distance,
            phase: None,
            age: 0,
            downed: false,
        }
    }
}

impl Entity for Drone {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Hostile
    }

    fn update_status(&mut self, me: EntityId, ctx: &mut TickContext<'_>) {
        if !self.downed && below_viewport(&self.body, &ctx.viewport) {
            ctx.destroy(me);
        }
    }

    fn update_position(&mut self, _me: EntityId, ctx: &mut TickContext<'_>) {
        let phase = *self
            .phase
            .get_or_insert_with(|| ctx.rng.random_range(0.0..std::f32::consts::TAU));
        self.age += 1;
        let weave = (self.age as f32 * 0.05 + phase).sin() * 1.5;
        self.body.position.translate(weave, self.body.speed);
    }

    fn submit_draw(&self, frame: &mut DrawList) -> Result<(), SimError> {
        frame.image("drone", self.body.position, 0.0, self.body.scale);
        Ok(())
    }

    fn as_collidable(&self) -> Option<&dyn Collidable> {
        Some(self)
    }

    fn as_collidable_mut(&mut self) -> Option<&mut dyn Collidable> {
        Some(self)
    }

    fn is_shiftable(&self) -> bool {
        true
    }

    fn as_activatable(&self) -> Option<&dyn Activatable> {
        Some(self)
    }
}

impl Collidable for Drone {
    fn insets(&self) -> Insets {
        Insets::uniform(2.0)
    }

    fn react_to_collision_with(&mut self, me: EntityId, other: &dyn Entity, ctx: &mut TickContext<'_>) {
        if self.downed {
            return;
        }
        if matches!(other.kind(), EntityKind::PlayerShot | EntityKind::Player) {
            self.downed = true;
            go_down(&self.body, me, ctx);
        }
    }
}

impl Activatable for Drone {
    fn try_to_activate(&self, reference: &Body) -> bool {
        within_activation_distance(&self.body, reference, self.activation_distance)
    }
}

/// Ticks between turret volleys
pub const TURRET_RELOAD_TICKS: u32 = 45;
pub const TURRET_HP: u8 = 2;

/// Stationary gun emplacement; moves only with the world
#[derive(Debug, Clone)]
pub struct Turret {
    body: Body,
    activation_distance: f32,
    hp: u8,
    reload: DebouncedTimer,
}

impl Turret {
    pub fn new(activation_distance: f32) -> Self {
        Self {
            body: Body::new(Position::ORIGIN, 32.0, 32.0).with_depth(4),
            activation_distance,
            hp: TURRET_HP,
            reload: DebouncedTimer::new(TURRET_RELOAD_TICKS, 1),
        }
    }

    pub fn hp(&self) -> u8 {
        self.hp
    }
}

impl Entity for Turret {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Hostile
    }

    fn update_status(&mut self, me: EntityId, ctx: &mut TickContext<'_>) {
        if self.hp == 0 {
            return;
        }
        if below_viewport(&self.body, &ctx.viewport) {
            ctx.destroy(me);
            return;
        }
        let on_screen = ctx.viewport.contains(&self.body.position, 0.0);
        // Skip some volleys so turrets don't fire in lockstep
        if self.reload.poll(ctx.clock) && on_screen && ctx.rng.random_bool(0.6) {
            let muzzle = Position::new(
                self.body.center().x - Shot::WIDTH / 2.0,
                self.body.position.y + self.body.height(),
            );
            // Aim at the player when there is one
            let shot = match ctx.reference {
                Some(player) => Shot::aimed(muzzle, muzzle.direction_to(&player.center())),
                None => Shot::from_hostile(muzzle),
            };
            ctx.spawn(Box::new(shot));
        }
    }

    fn submit_draw(&self, frame: &mut DrawList) -> Result<(), SimError> {
        let key = if self.hp < TURRET_HP { "turret_damaged" } else { "turret" };
        frame.image(key, self.body.position, 0.0, self.body.scale);
        Ok(())
    }

    fn as_collidable(&self) -> Option<&dyn Collidable> {
        Some(self)
    }

    fn as_collidable_mut(&mut self) -> Option<&mut dyn Collidable> {
        Some(self)
    }

    fn is_shiftable(&self) -> bool {
        true
    }

    fn as_activatable(&self) -> Option<&dyn Activatable> {
        Some(self)
    }
}

impl Collidable for Turret {
    fn react_to_collision_with(&mut self, me: EntityId, other: &dyn Entity, ctx: &mut TickContext<'_>) {
        if self.hp == 0 || other.kind() != EntityKind::PlayerShot {
            return;
        }
        self.hp -= 1;
        if self.hp == 0 {
            go_down(&self.body, me, ctx);
        }
    }
}

impl Activatable for Turret {
    fn try_to_activate(&self, reference: &Body) -> bool {
        within_activation_distance(&self.body, reference, self.activation_distance)
    }
}
