//! Axis-aligned hitbox collision between collidable entities
//!
//! Full pairwise scan over the registered members: at the entity counts the
//! pool allows, a broad phase buys nothing. Hitboxes are snapshotted before
//! any reaction runs, so every pair in a pass sees the same geometry.

use super::context::TickContext;
use super::entity::{Body, Entity, EntityId, Insets};
use super::pool::EntityPool;
use crate::error::SimError;

/// Collision rectangle in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Hitbox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, SimError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(SimError::InvalidHitbox { width, height });
        }
        Ok(Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        })
    }

    /// Entity rectangle at its position, adjusted by signed insets
    pub fn from_body(body: &Body, insets: Insets) -> Result<Self, SimError> {
        let left = body.position.x + insets.left;
        let top = body.position.y + insets.top;
        let right = body.position.x + body.width() + insets.right;
        let bottom = body.position.y + body.height() + insets.bottom;
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Strict overlap; rectangles that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Hitbox) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

/// Hitbox of a collidable entity, `None` if it does not collide
pub fn hitbox_of(entity: &dyn Entity) -> Option<Result<Hitbox, SimError>> {
    entity
        .as_collidable()
        .map(|c| Hitbox::from_body(entity.body(), c.insets()))
}

/// Membership list of live collidable entities
#[derive(Debug, Clone, Default)]
pub struct CollisionIndex {
    members: Vec<EntityId>,
}

impl CollisionIndex {
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

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Test every unordered pair once and notify both sides of each overlap
    ///
    /// Returns the number of overlapping pairs. Reactions may queue spawns and
    /// destroys through `ctx`; nothing takes effect until the next tick.
    pub fn pass(&self, pool: &mut EntityPool, ctx: &mut TickContext<'_>) -> Result<usize, SimError> {
        let mut boxes = Vec::with_capacity(self.members.len());
        for &id in &self.members {
            let Some(entity) = pool.get(id) else {
                continue;
            };
            if let Some(hitbox) = hitbox_of(entity) {
                boxes.push((id, hitbox?));
            }
        }

        let mut overlaps = 0;
        for (i, &(a, box_a)) in boxes.iter().enumerate() {
            for &(b, box_b) in &boxes[i + 1..] {
                if !box_a.intersects(&box_b) {
                    continue;
                }
                let Some((entity_a, entity_b)) = pool.pair_mut(a, b) else {
                    continue;
                };
                notify(entity_a, a, entity_b, ctx);
                notify(entity_b, b, entity_a, ctx);
                overlaps += 1;
            }
        }
        Ok(overlaps)
    }
}

fn notify(target: &mut dyn Entity, me: EntityId, other: &dyn Entity, ctx: &mut TickContext<'_>) {
    if let Some(collidable) = target.as_collidable_mut() {
        collidable.react_to_collision_with(me, other, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::draw::DrawList;
    use crate::sim::position::Position;
    use crate::sim::shift::WorldShiftCoordinator;
    use crate::sim::testing::{Call, Probe, new_log, with_ctx};

    fn settle(pool: &mut EntityPool, index: &mut CollisionIndex) {
        let mut shifter = WorldShiftCoordinator::new();
        pool.apply_pending(index, &mut shifter).unwrap();
    }

    #[test]
    fn test_hitbox_from_body_with_insets() {
        let body = Body::new(Position::new(10.0, 20.0), 30.0, 40.0);
        let insets = Insets {
            left: 2.0,
            top: 3.0,
            right: -4.0,
            bottom: -5.0,
        };
        let hb = Hitbox::from_body(&body, insets).unwrap();
        assert_eq!(hb, Hitbox { left: 12.0, top: 23.0, right: 36.0, bottom: 55.0 });
    }

    #[test]
    fn test_malformed_hitbox_rejected() {
        assert!(matches!(
            Hitbox::new(0.0, 0.0, 0.0, 5.0),
            Err(SimError::InvalidHitbox { .. })
        ));
        let body = Body::new(Position::ORIGIN, 4.0, 4.0);
        assert!(Hitbox::from_body(&body, Insets::uniform(2.0)).is_err());
    }

    #[test]
    fn test_intersection() {
        let a = Hitbox::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let b = Hitbox::new(5.0, 5.0, 10.0, 10.0).unwrap();
        let c = Hitbox::new(20.0, 20.0, 10.0, 10.0).unwrap();
        let touching = Hitbox::new(10.0, 0.0, 10.0, 10.0).unwrap();
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!b.intersects(&c));
        assert!(!a.intersects(&touching));
    }

    #[test]
    fn test_only_overlapping_pair_notified() {
        let log = new_log();
        let mut pool = EntityPool::new(10);
        let mut index = CollisionIndex::new();
        pool.spawn(Box::new(Probe::new("a", 0.0, 0.0, &log).collidable()));
        pool.spawn(Box::new(Probe::new("b", 5.0, 5.0, &log).collidable()));
        pool.spawn(Box::new(Probe::new("c", 20.0, 20.0, &log).collidable()));
        settle(&mut pool, &mut index);

        let overlaps = with_ctx(|ctx| index.pass(&mut pool, ctx)).unwrap();
        assert_eq!(overlaps, 1);
        assert_eq!(
            *log.borrow(),
            vec![
                Call::Hit { me: "a", other: Position::new(5.0, 5.0) },
                Call::Hit { me: "b", other: Position::new(0.0, 0.0) },
            ]
        );
    }

    #[test]
    fn test_overlap_refires_every_pass() {
        let log = new_log();
        let mut pool = EntityPool::new(10);
        let mut index = CollisionIndex::new();
        pool.spawn(Box::new(Probe::new("a", 0.0, 0.0, &log).collidable()));
        pool.spawn(Box::new(Probe::new("b", 1.0, 1.0, &log).collidable()));
        settle(&mut pool, &mut index);

        for _ in 0..3 {
            with_ctx(|ctx| index.pass(&mut pool, ctx)).unwrap();
        }
        assert_eq!(log.borrow().len(), 6);
    }

    #[test]
    fn test_destroy_in_reaction_keeps_pass_consistent() {
        let log = new_log();
        let mut pool = EntityPool::new(10);
        let mut index = CollisionIndex::new();
        pool.spawn(Box::new(
            Probe::new("a", 0.0, 0.0, &log).collidable().destroyed_on_hit(),
        ));
        pool.spawn(Box::new(Probe::new("b", 2.0, 2.0, &log).collidable()));
        pool.spawn(Box::new(Probe::new("c", 4.0, 4.0, &log).collidable()));
        settle(&mut pool, &mut index);

        let (overlaps, queued) = with_ctx(|ctx| {
            let n = index.pass(&mut pool, ctx).unwrap();
            (n, ctx.take_commands())
        });
        // a destroys itself twice (a-b, a-c); all three pairs still resolve
        assert_eq!(overlaps, 3);
        assert_eq!(queued.len(), 2);
        pool.absorb(queued);
        assert_eq!(pool.pending_remove_count(), 1);
    }

    #[test]
    fn test_non_collidable_not_registered() {
        let log = new_log();
        let mut pool = EntityPool::new(10);
        let mut index = CollisionIndex::new();
        pool.spawn(Box::new(Probe::new("a", 0.0, 0.0, &log)));
        pool.spawn(Box::new(Probe::new("b", 0.0, 0.0, &log).collidable()));
        settle(&mut pool, &mut index);
        assert_eq!(index.len(), 1);

        let overlaps = with_ctx(|ctx| index.pass(&mut pool, ctx)).unwrap();
        assert_eq!(overlaps, 0);

        let mut frame = DrawList::new();
        with_ctx(|ctx| pool.update_all(ctx, &mut frame)).unwrap();
        assert_eq!(frame.len(), 2);
    }
}
