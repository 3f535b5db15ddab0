//! Display, input and audio backend interface
//!
//! The simulation core treats the backend as opaque: it polls input once per
//! tick, fires sounds and forgets them, and hands the accumulated draw list
//! to a blocking present-and-pace call.
//!
//! `HeadlessBackend` implements all three without a window. It replays
//! scripted input, records what it was asked to play and draw, and optionally
//! paces to real time.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::sim::DrawList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Left,
    Right,
    Up,
    Down,
    Space,
    Shift,
    Enter,
    Escape,
    Char(char),
}

/// Discrete input since the last poll
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(KeyCode),
    KeyReleased(KeyCode),
    MouseClicked { x: f32, y: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Keys currently held
    pub pressed: Vec<KeyCode>,
    /// Queued events since the last poll
    pub events: Vec<InputEvent>,
}

impl InputSnapshot {
    pub fn holding(keys: &[KeyCode]) -> Self {
        Self {
            pressed: keys.to_vec(),
            events: Vec::new(),
        }
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn was_pressed(&self, key: KeyCode) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, InputEvent::KeyPressed(k) if *k == key))
    }
}

pub trait InputSource {
    fn poll(&mut self) -> InputSnapshot;
}

/// Sound effects the core can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Shot,
    Explosion,
    PlayerDown,
    LevelClear,
    Engine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    OneShot,
    Looping,
}

/// Handle for stopping a sound later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u64);

pub trait AudioSink {
    fn play(&mut self, cue: SoundCue, mode: PlayMode) -> SoundHandle;
    fn stop(&mut self, handle: SoundHandle);
}

pub trait Display {
    /// Composite `frame`, present it, and block until the next frame boundary
    fn present_and_pace(&mut self, frame: &DrawList);
    /// False once the window is gone; ends the loop
    fn is_visible(&self) -> bool;
}

pub trait Backend: InputSource + AudioSink + Display {}

impl<T: InputSource + AudioSink + Display> Backend for T {}

/// Windowless backend for tests, tooling and the demo binary
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    script: VecDeque<InputSnapshot>,
    /// Snapshot repeated once the script runs out
    idle: InputSnapshot,
    frame_budget: Option<u64>,
    frame_period: Option<Duration>,
    last_present: Option<Instant>,
    next_handle: u64,
    /// Sounds requested, in order
    pub sounds: Vec<(SoundCue, PlayMode)>,
    pub stopped: Vec<SoundHandle>,
    pub frames_presented: u64,
    /// Draw command count of each presented frame
    pub frame_sizes: Vec<usize>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report not-visible after `frames` presents
    pub fn with_frame_budget(mut self, frames: u64) -> Self {
        self.frame_budget = Some(frames);
        self
    }

    /// Sleep out the remainder of each frame period
    pub fn with_pacing(mut self, period: Duration) -> Self {
        self.frame_period = Some(period);
        self
    }

    /// Queue one snapshot per tick
    pub fn with_script(mut self, script: impl IntoIterator<Item = InputSnapshot>) -> Self {
        self.script.extend(script);
        self
    }

    /// Snapshot returned once the script is exhausted
    pub fn with_idle_input(mut self, idle: InputSnapshot) -> Self {
        self.idle = idle;
        self
    }

    pub fn push_input(&mut self, snapshot: InputSnapshot) {
        self.script.push_back(snapshot);
    }
}

impl InputSource for HeadlessBackend {
    fn poll(&mut self) -> InputSnapshot {
        self.script.pop_front().unwrap_or_else(|| self.idle.clone())
    }
}

impl AudioSink for HeadlessBackend {
    fn play(&mut self, cue: SoundCue, mode: PlayMode) -> SoundHandle {
        self.sounds.push((cue, mode));
        self.next_handle += 1;
        SoundHandle(self.next_handle)
    }

    fn stop(&mut self, handle: SoundHandle) {
        self.stopped.push(handle);
    }
}

impl Display for HeadlessBackend {
    fn present_and_pace(&mut self, frame: &DrawList) {
        self.frames_presented += 1;
        self.frame_sizes.push(frame.len());

        if let Some(period) = self.frame_period {
            if let Some(last) = self.last_present {
                let elapsed = last.elapsed();
                if elapsed < period {
                    std::thread::sleep(period - elapsed);
                }
            }
            self.last_present = Some(Instant::now());
        }
    }

    fn is_visible(&self) -> bool {
        self.frame_budget
            .is_none_or(|budget| self.frames_presented < budget)
    }
}
