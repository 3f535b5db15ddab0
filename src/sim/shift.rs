//! World scrolling by coordinate shift
//!
//! The viewport never moves. Forward travel is simulated by translating every
//! registered shiftable entity (live or dormant) by the same vertical delta.
//! The player is never registered; its position is the visual anchor.
//!
//! Gameplay code requests shifts during a tick; the accumulated delta is
//! applied once, at the start of the next live pass, before any entity's own
//! movement, so the two translations add up.

use super::entity::EntityId;
use super::pool::EntityPool;

#[derive(Debug, Clone, Default)]
pub struct WorldShiftCoordinator {
    members: Vec<EntityId>,
    pending_dy: f32,
    /// Net distance shifted since the last reset (positive = travelled forward)
    travelled: f32,
}

impl WorldShiftCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: EntityId) {
        if !self.members.contains(&id) {
            self.members.push(id);
        }
    }

    pub fn remove(&mut self, id: EntityId) {
        self.members.retain(|m| *m != id);
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Move the world toward the player (forward travel)
    pub fn shift_down(&mut self, amount: f32) {
        self.pending_dy += amount;
    }

    /// Move the world away from the player (rewind during respawn)
    pub fn shift_up(&mut self, amount: f32) {
        self.pending_dy -= amount;
    }

    pub fn pending(&self) -> f32 {
        self.pending_dy
    }

    pub fn travelled(&self) -> f32 {
        self.travelled
    }

    /// Drop members and accumulated state (level reload)
    pub fn reset(&mut self) {
        self.members.clear();
        self.pending_dy = 0.0;
        self.travelled = 0.0;
    }

    /// Translate every member by the accumulated delta; returns the delta applied
    pub fn apply(&mut self, pool: &mut EntityPool) -> f32 {
        let dy = std::mem::take(&mut self.pending_dy);
        if dy == 0.0 {
            return 0.0;
        }
        for &id in &self.members {
            if let Some(entity) = pool.get_mut(id) {
                entity.body_mut().position.translate(0.0, dy);
            }
        }
        self.travelled += dy;
        dy
    }
}
