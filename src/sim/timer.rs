//! Game clock and entity-owned timers
//!
//! Time is counted in ticks so every timer is deterministic. Timers are owned
//! by the entity that polls them and are keyed by an explicit `TimerId` the
//! caller chooses, never by object identity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Monotonic simulation clock
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GameClock {
    ticks: u64,
    tick_rate: u32,
}

impl GameClock {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            ticks: 0,
            tick_rate: tick_rate.max(1),
        }
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Elapsed game time in seconds
    pub fn seconds(&self) -> f64 {
        self.ticks as f64 / self.tick_rate as f64
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    /// Convert a duration in seconds to whole ticks (rounded)
    pub fn ticks_for(&self, seconds: f32) -> u32 {
        (seconds * self.tick_rate as f32).round().max(0.0) as u32
    }
}

/// Two-phase repeating timer
///
/// Arms on the first poll, then reports `false` for `off_ticks` ticks and
/// `true` for `on_ticks` ticks before re-arming itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebouncedTimer {
    pub off_ticks: u32,
    pub on_ticks: u32,
    armed_at: Option<u64>,
}

impl DebouncedTimer {
    pub fn new(off_ticks: u32, on_ticks: u32) -> Self {
        Self {
            off_ticks,
            on_ticks,
            armed_at: None,
        }
    }

    pub fn poll(&mut self, clock: &GameClock) -> bool {
        let now = clock.ticks();
        let armed_at = *self.armed_at.get_or_insert(now);
        let period = self.off_ticks as u64 + self.on_ticks as u64;

        let mut elapsed = now.saturating_sub(armed_at);
        if elapsed >= period {
            self.armed_at = Some(now);
            elapsed = 0;
        }
        elapsed >= self.off_ticks as u64 && elapsed < period
    }

    /// Forget the arm point; the next poll starts a fresh cycle
    pub fn reset(&mut self) {
        self.armed_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }
}

/// Fire-rate limiter: ready immediately, then blocked for `ticks` after each use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cooldown {
    ready_at: u64,
}

impl Cooldown {
    pub fn try_use(&mut self, clock: &GameClock, ticks: u32) -> bool {
        if clock.ticks() < self.ready_at {
            return false;
        }
        self.ready_at = clock.ticks() + ticks as u64;
        true
    }
}

/// Stable, caller-chosen timer name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub &'static str);

/// Named timers owned by one entity
#[derive(Debug, Clone, Default)]
pub struct Timers {
    timers: HashMap<TimerId, DebouncedTimer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll the named timer, creating it with the given durations on first use
    pub fn poll(&mut self, id: TimerId, off_ticks: u32, on_ticks: u32, clock: &GameClock) -> bool {
        self.timers
            .entry(id)
            .or_insert_with(|| DebouncedTimer::new(off_ticks, on_ticks))
            .poll(clock)
    }

    pub fn reset(&mut self, id: TimerId) {
        if let Some(timer) = self.timers.get_mut(&id) {
            timer.reset();
        }
    }
}
