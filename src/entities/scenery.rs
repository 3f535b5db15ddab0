//! Inert level furniture and visual effects

use super::below_viewport;
use crate::backend::SoundCue;
use crate::error::SimError;
use crate::sim::{
    Activatable, Body, Collidable, Color, DebouncedTimer, DrawList, Entity, EntityId, EntityKind,
    GameEvent, Position, TickContext, within_activation_distance,
};

/// Indestructible obstacle
#[derive(Debug, Clone)]
pub struct Rock {
    body: Body,
    activation_distance: f32,
}

impl Rock {
    pub fn new(activation_distance: f32) -> Self {
        Self {
            body: Body::new(Position::ORIGIN, 40.0, 40.0).with_depth(2),
            activation_distance,
        }
    }
}

impl Entity for Rock {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Obstacle
    }

    fn update_status(&mut self, me: EntityId, ctx: &mut TickContext<'_>) {
        if below_viewport(&self.body, &ctx.viewport) {
            ctx.destroy(me);
        }
    }

    fn submit_draw(&self, frame: &mut DrawList) -> Result<(), SimError> {
        frame.rect(
            self.body.position,
            self.body.width(),
            self.body.height(),
            Color::GREY,
            None,
        )
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

impl Collidable for Rock {
    // Rocks are unaffected by anything they touch
    fn react_to_collision_with(&mut self, _me: EntityId, _other: &dyn Entity, _ctx: &mut TickContext<'_>) {}
}

impl Activatable for Rock {
    fn try_to_activate(&self, reference: &Body) -> bool {
        within_activation_distance(&self.body, reference, self.activation_distance)
    }
}

/// Completes the level once the player reaches it
#[derive(Debug, Clone)]
pub struct FinishLine {
    body: Body,
    activation_distance: f32,
    crossed: bool,
}

impl FinishLine {
    pub fn new(activation_distance: f32) -> Self {
        Self {
            body: Body::new(Position::ORIGIN, 8.0, 4.0).with_depth(1),
            activation_distance,
            crossed: false,
        }
    }

    pub fn crossed(&self) -> bool {
        self.crossed
    }
}

impl Entity for FinishLine {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Marker
    }

    fn update_status(&mut self, _me: EntityId, ctx: &mut TickContext<'_>) {
        if self.crossed {
            return;
        }
        let Some(player) = ctx.reference else {
            return;
        };
        if self.body.position.y >= player.position.y {
            self.crossed = true;
            log::info!("Finish line reached at tick {}", ctx.clock.ticks());
            ctx.play_sound(SoundCue::LevelClear);
            ctx.emit(GameEvent::LevelComplete);
        }
    }

    fn submit_draw(&self, frame: &mut DrawList) -> Result<(), SimError> {
        let y = self.body.position.y;
        frame.line(
            Position::new(0.0, y),
            Position::new(10_000.0, y),
            2.0,
            Color::YELLOW,
        )
    }

    fn is_shiftable(&self) -> bool {
        true
    }

    fn as_activatable(&self) -> Option<&dyn Activatable> {
        Some(self)
    }
}

impl Activatable for FinishLine {
    fn try_to_activate(&self, reference: &Body) -> bool {
        within_activation_distance(&self.body, reference, self.activation_distance)
    }
}

/// Ticks an explosion stays on screen
pub const EXPLOSION_TICKS: u32 = 24;

/// Growing blast left behind by anything that goes down
#[derive(Debug, Clone)]
pub struct Explosion {
    body: Body,
    age: u32,
    lifetime: DebouncedTimer,
}

impl Explosion {
    const SIZE: f32 = 16.0;

    /// Centered on `center`
    pub fn at(center: Position) -> Self {
        let corner = Position::new(center.x - Self::SIZE / 2.0, center.y - Self::SIZE / 2.0);
        Self {
            body: Body::new(corner, Self::SIZE, Self::SIZE).with_depth(20),
            age: 0,
            lifetime: DebouncedTimer::new(EXPLOSION_TICKS, 1),
        }
    }
}

impl Entity for Explosion {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Effect
    }

    fn update_status(&mut self, me: EntityId, ctx: &mut TickContext<'_>) {
        self.age += 1;
        self.body.scale = 1.0 + self.age as f32 / EXPLOSION_TICKS as f32;
        if self.lifetime.poll(ctx.clock) {
            ctx.destroy(me);
        }
    }

    fn submit_draw(&self, frame: &mut DrawList) -> Result<(), SimError> {
        frame.image("explosion", self.body.position, 0.0, self.body.scale);
        Ok(())
    }

    fn is_shiftable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testing::with_ctx;

    const ME: EntityId = EntityId {
        index: 2,
        generation: 0,
    };

    #[test]
    fn test_finish_line_fires_once() {
        let mut line = FinishLine::new(300.0);
        line.body_mut().position = Position::new(0.0, 400.0);
        let events = with_ctx(|ctx| {
            ctx.reference = Some(Body::new(Position::new(100.0, 400.0), 24.0, 24.0));
            line.update_status(ME, ctx);
            line.update_status(ME, ctx);
            ctx.take_events()
        });
        assert!(line.crossed());
        assert_eq!(events, vec![GameEvent::LevelComplete]);
    }

    #[test]
    fn test_finish_line_waits_for_player() {
        let mut line = FinishLine::new(300.0);
        line.body_mut().position = Position::new(0.0, -50.0);
        let events = with_ctx(|ctx| {
            ctx.reference = Some(Body::new(Position::new(100.0, 400.0), 24.0, 24.0));
            line.update_status(ME, ctx);
            ctx.take_events()
        });
        assert!(events.is_empty());
    }

    #[test]
    fn test_rock_despawns_below_screen() {
        let mut rock = Rock::new(300.0);
        rock.body_mut().position = Position::new(0.0, 2000.0);
        let queued = with_ctx(|ctx| {
            rock.update_status(ME, ctx);
            ctx.pending_commands()
        });
        assert_eq!(queued, 1);
    }

    #[test]
    fn test_explosion_centered_and_grows() {
        let mut blast = Explosion::at(Position::new(100.0, 100.0));
        assert_eq!(blast.body().center(), Position::new(100.0, 100.0));
        with_ctx(|ctx| blast.update_status(ME, ctx));
        assert!(blast.body().scale > 1.0);
    }
}
