//! Per-tick context handed to entity callbacks
//!
//! Entities never touch the pool directly. Spawns and destroys go into a
//! command buffer the loop forwards to the pool's pending lists, so the live
//! list is never mutated mid-iteration.

use rand_pcg::Pcg32;

use super::entity::{Body, Entity, EntityId};
use super::position::Position;
use super::timer::GameClock;
use crate::backend::{AudioSink, PlayMode, SoundCue, SoundHandle};

/// What the player is asking for this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerIntents {
    /// -1 left, +1 right
    pub move_x: f32,
    /// -1 up, +1 down
    pub move_y: f32,
    pub fire: bool,
    /// Forward-speed control; drives world shifting
    pub accelerate: bool,
}

/// Gameplay events surfaced to the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    LevelComplete,
    PlayerDestroyed,
    HostileDestroyed,
}

/// Deferred pool mutation
pub enum Command {
    Spawn(Box<dyn Entity>),
    Destroy(EntityId),
}

/// Visible play area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// True if `pos` lies inside the viewport grown by `margin` on every side
    pub fn contains(&self, pos: &Position, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }
}

pub struct TickContext<'a> {
    pub clock: &'a GameClock,
    pub intents: PlayerIntents,
    /// Snapshot of the reference entity (player) at tick start
    pub reference: Option<Body>,
    pub viewport: Viewport,
    pub rng: &'a mut Pcg32,
    audio: &'a mut dyn AudioSink,
    commands: Vec<Command>,
    events: Vec<GameEvent>,
}

impl<'a> TickContext<'a> {
    pub fn new(
        clock: &'a GameClock,
        viewport: Viewport,
        rng: &'a mut Pcg32,
        audio: &'a mut dyn AudioSink,
    ) -> Self {
        Self {
            clock,
            intents: PlayerIntents::default(),
            reference: None,
            viewport,
            rng,
            audio,
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue an entity for addition at the next tick boundary
    pub fn spawn(&mut self, entity: Box<dyn Entity>) {
        self.commands.push(Command::Spawn(entity));
    }

    /// Queue an entity for removal at the next tick boundary
    pub fn destroy(&mut self, id: EntityId) {
        self.commands.push(Command::Destroy(id));
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Fire-and-forget one-shot sound
    pub fn play_sound(&mut self, cue: SoundCue) -> SoundHandle {
        self.audio.play(cue, PlayMode::OneShot)
    }

    pub fn play_looping(&mut self, cue: SoundCue) -> SoundHandle {
        self.audio.play(cue, PlayMode::Looping)
    }

    pub fn stop_sound(&mut self, handle: SoundHandle) {
        self.audio.stop(handle);
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }
}
