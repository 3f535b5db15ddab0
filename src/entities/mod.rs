//! Stock entity types
//!
//! Behaviors here are deliberately small; they exist to exercise the core's
//! lifecycle and capability contracts and to give level maps something to place.

pub mod hostile;
pub mod player;
pub mod projectile;
pub mod scenery;

pub use hostile::{Drone, Turret};
pub use player::Player;
pub use projectile::Shot;
pub use scenery::{Explosion, FinishLine, Rock};

use crate::sim::{Body, Entity, EntityCatalog, Viewport};

/// Margin beyond the viewport before an entity counts as gone
pub const OFFSCREEN_MARGIN: f32 = 100.0;

/// Scrolled past the bottom of the screen
pub(crate) fn below_viewport(body: &Body, viewport: &Viewport) -> bool {
    body.position.y > viewport.height + OFFSCREEN_MARGIN
}

/// Glyph table for the bundled level maps
///
/// | glyph | entity      |
/// |-------|-------------|
/// | `#`   | rock        |
/// | `E`   | drone       |
/// | `T`   | turret      |
/// | `F`   | finish line |
#[derive(Debug, Clone, Copy)]
pub struct StandardCatalog {
    pub activation_distance: f32,
}

impl StandardCatalog {
    pub fn new(activation_distance: f32) -> Self {
        Self { activation_distance }
    }
}

impl EntityCatalog for StandardCatalog {
    fn build(&self, glyph: char) -> Option<Box<dyn Entity>> {
        let d = self.activation_distance;
        match glyph {
            '#' => Some(Box::new(Rock::new(d))),
            'E' => Some(Box::new(Drone::new(d))),
            'T' => Some(Box::new(Turret::new(d))),
            'F' => Some(Box::new(FinishLine::new(d))),
            _ => None,
        }
    }
}
