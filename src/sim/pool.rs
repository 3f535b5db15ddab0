//! Entity pool: authoritative owner of every entity
//!
//! Entities sit in an arena of generational slots. Additions and removals are
//! buffered and applied at exactly one point per tick (`apply_pending`), so
//! callbacks running during the live pass can spawn or destroy freely without
//! disturbing the iteration.
//!
//! Slots can also hold dormant entities: parsed from a level map, owned here,
//! shifted with the world, but neither iterated nor counted toward the cap
//! until the streamer activates them.

use super::collision::CollisionIndex;
use super::context::{Command, TickContext};
use super::draw::DrawList;
use super::entity::{Body, Entity, EntityId};
use super::shift::WorldShiftCoordinator;
use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Free,
    Pending,
    Live,
    Dormant,
}

struct Slot {
    generation: u32,
    state: SlotState,
    entity: Option<Box<dyn Entity>>,
}

pub struct EntityPool {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Live entities in insertion order
    live: Vec<EntityId>,
    pending_add: Vec<EntityId>,
    pending_remove: Vec<EntityId>,
    /// Reference entity (the player) for activation and follower targeting
    reference: Option<EntityId>,
    max_live: usize,
}

impl EntityPool {
    pub fn new(max_live: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: Vec::new(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
            reference: None,
            max_live,
        }
    }

    pub fn max_live(&self) -> usize {
        self.max_live
    }

    fn alloc(&mut self, entity: Box<dyn Entity>, state: SlotState) -> EntityId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.state = state;
            slot.entity = Some(entity);
            EntityId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                state,
                entity: Some(entity),
            });
            EntityId {
                index,
                generation: 0,
            }
        }
    }

    fn release(&mut self, id: EntityId) -> Option<Box<dyn Entity>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        let entity = slot.entity.take();
        slot.state = SlotState::Free;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        if self.reference == Some(id) {
            self.reference = None;
        }
        entity
    }

    fn state_of(&self, id: EntityId) -> Option<SlotState> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation && s.state != SlotState::Free)
            .map(|s| s.state)
    }

    /// Queue an entity for the next tick boundary; the id is valid immediately
    pub fn spawn(&mut self, entity: Box<dyn Entity>) -> EntityId {
        let id = self.alloc(entity, SlotState::Pending);
        self.pending_add.push(id);
        id
    }

    /// Queue removal; repeated or stale requests are no-ops
    pub fn destroy(&mut self, id: EntityId) {
        if self.state_of(id).is_some() && !self.pending_remove.contains(&id) {
            self.pending_remove.push(id);
        }
    }

    /// Discard pending additions and mark every live entity for removal
    pub fn destroy_all(&mut self) {
        for id in std::mem::take(&mut self.pending_add) {
            if self.state_of(id) == Some(SlotState::Pending) {
                self.release(id);
            }
        }
        for i in 0..self.live.len() {
            let id = self.live[i];
            self.destroy(id);
        }
    }

    /// Store an entity without making it live (dormant registry storage)
    pub fn park(&mut self, entity: Box<dyn Entity>) -> EntityId {
        self.alloc(entity, SlotState::Dormant)
    }

    /// Move a dormant entity to pending-add; false if it is not dormant
    pub fn activate(&mut self, id: EntityId) -> bool {
        if self.state_of(id) != Some(SlotState::Dormant) {
            return false;
        }
        self.slots[id.index as usize].state = SlotState::Pending;
        self.pending_add.push(id);
        true
    }

    /// Drop a dormant entity immediately
    pub fn discard(&mut self, id: EntityId) -> Option<Box<dyn Entity>> {
        if self.state_of(id) != Some(SlotState::Dormant) {
            return None;
        }
        self.release(id)
    }

    /// Forward deferred commands from entity callbacks
    pub fn absorb(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Spawn(entity) => {
                    self.spawn(entity);
                }
                Command::Destroy(id) => self.destroy(id),
            }
        }
    }

    /// Live count once the pending lists are applied
    pub fn projected_live(&self) -> usize {
        let removed = self
            .pending_remove
            .iter()
            .filter(|id| self.state_of(**id) == Some(SlotState::Live))
            .count();
        let added = self
            .pending_add
            .iter()
            .filter(|id| {
                self.state_of(**id) == Some(SlotState::Pending) && !self.pending_remove.contains(id)
            })
            .count();
        self.live.len() - removed + added
    }

    /// Tick boundary: enforce the cap, apply removals, then additions
    pub fn apply_pending(
        &mut self,
        collisions: &mut CollisionIndex,
        shifter: &mut WorldShiftCoordinator,
    ) -> Result<(), SimError> {
        let projected = self.projected_live();
        if projected > self.max_live {
            log::error!(
                "Entity cap exceeded: {} live after pending ({} adds, {} removes), cap {}",
                projected,
                self.pending_add.len(),
                self.pending_remove.len(),
                self.max_live
            );
            return Err(SimError::CapacityExceeded {
                projected,
                max: self.max_live,
            });
        }

        let removals = std::mem::take(&mut self.pending_remove);
        let mut removed_live = Vec::new();
        for id in removals {
            match self.state_of(id) {
                Some(SlotState::Live) => removed_live.push(id),
                Some(_) => {}
                None => continue,
            }
            collisions.remove(id);
            shifter.remove(id);
            self.release(id);
        }
        if !removed_live.is_empty() {
            self.live.retain(|id| !removed_live.contains(id));
        }

        for id in std::mem::take(&mut self.pending_add) {
            if self.state_of(id) != Some(SlotState::Pending) {
                continue;
            }
            let slot = &mut self.slots[id.index as usize];
            slot.state = SlotState::Live;
            if let Some(entity) = slot.entity.as_deref() {
                if entity.as_collidable().is_some() {
                    collisions.insert(id);
                }
                if entity.is_shiftable() {
                    shifter.insert(id);
                }
            }
            self.live.push(id);
        }
        Ok(())
    }

    /// Status, position and draw for every live entity, in insertion order
    pub fn update_all(&mut self, ctx: &mut TickContext<'_>, frame: &mut DrawList) -> Result<(), SimError> {
        for &id in &self.live {
            let Some(entity) = self.slots[id.index as usize].entity.as_deref_mut() else {
                continue;
            };
            entity.update_status(id, ctx);
            entity.update_position(id, ctx);
            frame.set_depth(entity.body().depth);
            entity.submit_draw(frame)?;
        }
        Ok(())
    }

    /// One pool tick: apply pending mutations and world shift, then run the live pass
    pub fn tick(
        &mut self,
        collisions: &mut CollisionIndex,
        shifter: &mut WorldShiftCoordinator,
        ctx: &mut TickContext<'_>,
        frame: &mut DrawList,
    ) -> Result<(), SimError> {
        self.apply_pending(collisions, shifter)?;
        shifter.apply(self);
        ctx.reference = self.reference_body();
        self.update_all(ctx, frame)
    }

    pub fn get(&self, id: EntityId) -> Option<&dyn Entity> {
        self.state_of(id)?;
        self.slots[id.index as usize].entity.as_deref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut dyn Entity> {
        self.state_of(id)?;
        match self.slots[id.index as usize].entity.as_deref_mut() {
            Some(entity) => Some(entity),
            None => None,
        }
    }

    /// Two distinct entities borrowed mutably at once
    pub fn pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut dyn Entity, &mut dyn Entity)> {
        if a.index == b.index {
            return None;
        }
        self.state_of(a)?;
        self.state_of(b)?;

        let (lo, hi, swapped) = if a.index < b.index {
            (a.index as usize, b.index as usize, false)
        } else {
            (b.index as usize, a.index as usize, true)
        };
        let (left, right) = self.slots.split_at_mut(hi);
        let first: &mut dyn Entity = left[lo].entity.as_deref_mut()?;
        let second: &mut dyn Entity = right[0].entity.as_deref_mut()?;
        if swapped {
            Some((second, first))
        } else {
            Some((first, second))
        }
    }

    pub fn is_live(&self, id: EntityId) -> bool {
        self.state_of(id) == Some(SlotState::Live)
    }

    pub fn is_dormant(&self, id: EntityId) -> bool {
        self.state_of(id) == Some(SlotState::Dormant)
    }

    pub fn is_pending(&self, id: EntityId) -> bool {
        self.state_of(id) == Some(SlotState::Pending)
    }

    pub fn live_ids(&self) -> &[EntityId] {
        &self.live
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn pending_add_count(&self) -> usize {
        self.pending_add.len()
    }

    pub fn pending_remove_count(&self) -> usize {
        self.pending_remove.len()
    }

    pub fn set_reference(&mut self, id: EntityId) {
        self.reference = Some(id);
    }

    pub fn reference(&self) -> Option<EntityId> {
        self.reference
    }

    pub fn reference_body(&self) -> Option<Body> {
        self.reference
            .and_then(|id| self.get(id))
            .map(|entity| *entity.body())
    }
}
