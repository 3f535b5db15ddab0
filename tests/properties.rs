//! Property tests for the collision pass and world shifting

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use skyfall::SimError;
use skyfall::backend::HeadlessBackend;
use skyfall::sim::{
    Body, Collidable, CollisionIndex, DrawList, Entity, EntityId, EntityKind, EntityPool,
    GameClock, Hitbox, Position, TickContext, Viewport, WorldShiftCoordinator,
};

type HitLog = Rc<RefCell<Vec<(Position, Position)>>>;

/// Plain rectangle that logs (own position, other position) for every hit
struct Block {
    body: Body,
    dy: f32,
    shiftable: bool,
    hits: HitLog,
}

impl Block {
    fn new(x: f32, y: f32, w: f32, h: f32, hits: &HitLog) -> Self {
        Self {
            body: Body::new(Position::new(x, y), w, h),
            dy: 0.0,
            shiftable: false,
            hits: hits.clone(),
        }
    }
}

impl Entity for Block {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Obstacle
    }

    fn update_position(&mut self, _me: EntityId, _ctx: &mut TickContext<'_>) {
        self.body.position.translate(0.0, self.dy);
    }

    fn submit_draw(&self, _frame: &mut DrawList) -> Result<(), SimError> {
        Ok(())
    }

    fn as_collidable(&self) -> Option<&dyn Collidable> {
        Some(self)
    }

    fn as_collidable_mut(&mut self) -> Option<&mut dyn Collidable> {
        Some(self)
    }

    fn is_shiftable(&self) -> bool {
        self.shiftable
    }
}

impl Collidable for Block {
    fn react_to_collision_with(&mut self, _me: EntityId, other: &dyn Entity, _ctx: &mut TickContext<'_>) {
        self.hits
            .borrow_mut()
            .push((self.body.position, other.body().position));
    }
}

const VIEWPORT: Viewport = Viewport {
    width: 640.0,
    height: 480.0,
};

/// Run `f` with a fresh tick context
fn with_ctx<R>(f: impl FnOnce(&mut TickContext<'_>) -> R) -> R {
    let clock = GameClock::new(60);
    let mut rng = Pcg32::seed_from_u64(7);
    let mut audio = HeadlessBackend::new();
    let mut ctx = TickContext::new(&clock, VIEWPORT, &mut rng, &mut audio);
    f(&mut ctx)
}

/// Unique top-left corners mapped to sizes
fn layouts() -> impl Strategy<Value = BTreeMap<(u16, u16), (u16, u16)>> {
    prop::collection::btree_map((0u16..200, 0u16..200), (1u16..40, 1u16..40), 0..25)
}

proptest! {
    #[test]
    fn hitbox_intersection_is_symmetric(
        a in (-100.0f32..100.0, -100.0f32..100.0, 0.5f32..50.0, 0.5f32..50.0),
        b in (-100.0f32..100.0, -100.0f32..100.0, 0.5f32..50.0, 0.5f32..50.0),
    ) {
        let box_a = Hitbox::new(a.0, a.1, a.2, a.3).unwrap();
        let box_b = Hitbox::new(b.0, b.1, b.2, b.3).unwrap();
        prop_assert_eq!(box_a.intersects(&box_b), box_b.intersects(&box_a));
    }

    #[test]
    fn non_positive_hitbox_is_rejected(w in -50.0f32..=0.0, h in 0.5f32..50.0) {
        let is_invalid = matches!(
            Hitbox::new(0.0, 0.0, w, h),
            Err(SimError::InvalidHitbox { .. })
        );
        prop_assert!(is_invalid);
    }

    #[test]
    fn collision_pass_notifies_both_sides_once(layout in layouts()) {
        let hits: HitLog = Rc::new(RefCell::new(Vec::new()));
        let mut pool = EntityPool::new(100);
        let mut index = CollisionIndex::new();
        let mut shifter = WorldShiftCoordinator::new();
        for (&(x, y), &(w, h)) in &layout {
            pool.spawn(Box::new(Block::new(x as f32, y as f32, w as f32, h as f32, &hits)));
        }
        pool.apply_pending(&mut index, &mut shifter).unwrap();

        let overlaps = with_ctx(|ctx| index.pass(&mut pool, ctx)).unwrap();
        let hits = hits.take();

        let boxes: Vec<_> = layout
            .iter()
            .map(|(&(x, y), &(w, h))| Hitbox::new(x as f32, y as f32, w as f32, h as f32).unwrap())
            .collect();
        let mut expected = 0;
        for i in 0..boxes.len() {
            for j in i + 1..boxes.len() {
                if boxes[i].intersects(&boxes[j]) {
                    expected += 1;
                }
            }
        }

        prop_assert_eq!(overlaps, expected);
        prop_assert_eq!(hits.len(), 2 * expected);
        for &(me, other) in &hits {
            // Corners are unique, so equal positions would mean a self-test
            prop_assert_ne!(me, other);
            let mirrored = hits.iter().filter(|&&h| h == (other, me)).count();
            prop_assert_eq!(mirrored, 1);
        }
    }

    #[test]
    fn shift_composes_with_own_movement(
        shifts in prop::collection::vec(-20.0f32..20.0, 1..20),
        own_dy in -5.0f32..5.0,
    ) {
        let hits: HitLog = Rc::new(RefCell::new(Vec::new()));
        let mut pool = EntityPool::new(10);
        let mut index = CollisionIndex::new();
        let mut shifter = WorldShiftCoordinator::new();

        let mut scenery = Block::new(0.0, 0.0, 10.0, 10.0, &hits);
        scenery.shiftable = true;
        scenery.dy = own_dy;
        let scenery = pool.spawn(Box::new(scenery));
        let mut anchor = Block::new(300.0, 300.0, 10.0, 10.0, &hits);
        anchor.dy = own_dy;
        let anchor = pool.spawn(Box::new(anchor));

        let (mut scenery_y, mut anchor_y) = (0.0f32, 300.0f32);
        for &shift in &shifts {
            if shift >= 0.0 {
                shifter.shift_down(shift);
            } else {
                shifter.shift_up(-shift);
            }
            with_ctx(|ctx| {
                let mut frame = DrawList::new();
                pool.tick(&mut index, &mut shifter, ctx, &mut frame)
            })
            .unwrap();
            scenery_y += shift;
            scenery_y += own_dy;
            anchor_y += own_dy;
        }

        prop_assert_eq!(pool.get(scenery).unwrap().body().position.y, scenery_y);
        prop_assert_eq!(pool.get(anchor).unwrap().body().position.y, anchor_y);
        prop_assert_eq!(pool.get(anchor).unwrap().body().position.x, 300.0);
    }
}
