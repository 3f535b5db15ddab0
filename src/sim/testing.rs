//! Scriptable entity and context helpers for unit tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::context::{TickContext, Viewport};
use super::draw::{Color, DrawList};
use super::entity::{
    Activatable, Body, Collidable, Entity, EntityId, EntityKind, Insets, within_activation_distance,
};
use super::position::Position;
use super::timer::GameClock;
use crate::backend::{AudioSink, PlayMode, SoundCue, SoundHandle};
use crate::error::SimError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Status(&'static str),
    Position(&'static str),
    Draw(&'static str),
    Hit { me: &'static str, other: Position },
}

impl Call {
    pub(crate) fn status_name(&self) -> Option<&'static str> {
        match self {
            Call::Status(name) => Some(name),
            _ => None,
        }
    }
}

pub(crate) type ProbeLog = Rc<RefCell<Vec<Call>>>;

pub(crate) fn new_log() -> ProbeLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Audio sink that hands out handles and plays nothing
#[derive(Default)]
pub(crate) struct SilentAudio {
    next: u64,
}

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: SoundCue, _mode: PlayMode) -> SoundHandle {
        self.next += 1;
        SoundHandle(self.next)
    }

    fn stop(&mut self, _handle: SoundHandle) {}
}

/// Run `f` with a throwaway tick context
pub(crate) fn with_ctx<R>(f: impl FnOnce(&mut TickContext<'_>) -> R) -> R {
    let clock = GameClock::new(60);
    let mut rng = Pcg32::seed_from_u64(1);
    let mut audio = SilentAudio::default();
    let viewport = Viewport {
        width: 640.0,
        height: 480.0,
    };
    let mut ctx = TickContext::new(&clock, viewport, &mut rng, &mut audio);
    f(&mut ctx)
}

/// 10x10 entity that records every callback into a shared log
pub(crate) struct Probe {
    pub name: &'static str,
    pub body: Body,
    pub collidable: bool,
    pub shiftable: bool,
    pub activation_distance: Option<f32>,
    pub spawn_child: bool,
    pub destroy_on_hit: bool,
    /// Destroyed (once) during this probe's next status update
    pub destroy_target: Rc<Cell<Option<EntityId>>>,
    pub log: ProbeLog,
}

impl Probe {
    pub(crate) fn new(name: &'static str, x: f32, y: f32, log: &ProbeLog) -> Self {
        Self {
            name,
            body: Body::new(Position::new(x, y), 10.0, 10.0),
            collidable: false,
            shiftable: false,
            activation_distance: None,
            spawn_child: false,
            destroy_on_hit: false,
            destroy_target: Rc::new(Cell::new(None)),
            log: log.clone(),
        }
    }

    pub(crate) fn collidable(mut self) -> Self {
        self.collidable = true;
        self
    }

    pub(crate) fn shiftable(mut self) -> Self {
        self.shiftable = true;
        self
    }

    pub(crate) fn activatable(mut self, distance: f32) -> Self {
        self.activation_distance = Some(distance);
        self
    }

    pub(crate) fn spawning_child(mut self) -> Self {
        self.spawn_child = true;
        self
    }

    pub(crate) fn destroyed_on_hit(mut self) -> Self {
        self.destroy_on_hit = true;
        self
    }
}

impl Entity for Probe {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Hostile
    }

    fn update_status(&mut self, _me: EntityId, ctx: &mut TickContext<'_>) {
        self.log.borrow_mut().push(Call::Status(self.name));
        if self.spawn_child {
            self.spawn_child = false;
            let p = self.body.position;
            ctx.spawn(Box::new(Probe::new("child", p.x, p.y, &self.log)));
        }
        if let Some(target) = self.destroy_target.take() {
            ctx.destroy(target);
        }
    }

    fn update_position(&mut self, _me: EntityId, _ctx: &mut TickContext<'_>) {
        self.log.borrow_mut().push(Call::Position(self.name));
    }

    fn submit_draw(&self, frame: &mut DrawList) -> Result<(), SimError> {
        self.log.borrow_mut().push(Call::Draw(self.name));
        frame.text(self.name, self.body.position, 8.0, Color::WHITE);
        Ok(())
    }

    fn as_collidable(&self) -> Option<&dyn Collidable> {
        self.collidable.then_some(self as &dyn Collidable)
    }

    fn as_collidable_mut(&mut self) -> Option<&mut dyn Collidable> {
        if self.collidable { Some(self) } else { None }
    }

    fn is_shiftable(&self) -> bool {
        self.shiftable
    }

    fn as_activatable(&self) -> Option<&dyn Activatable> {
        self.activation_distance
            .is_some()
            .then_some(self as &dyn Activatable)
    }
}

impl Collidable for Probe {
    fn insets(&self) -> Insets {
        Insets::NONE
    }

    fn react_to_collision_with(&mut self, me: EntityId, other: &dyn Entity, ctx: &mut TickContext<'_>) {
        self.log.borrow_mut().push(Call::Hit {
            me: self.name,
            other: other.body().position,
        });
        if self.destroy_on_hit {
            ctx.destroy(me);
        }
    }
}

impl Activatable for Probe {
    fn try_to_activate(&self, reference: &Body) -> bool {
        let distance = self.activation_distance.unwrap_or(0.0);
        within_activation_distance(&self.body, reference, distance)
    }
}
