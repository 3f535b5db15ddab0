//! Mutable 2D coordinate owned by each entity
//!
//! Screen space: x grows to the right, y grows downward. "Ahead" of the
//! player is numerically smaller y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Move in place by (dx, dy)
    #[inline]
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        self.as_vec2().distance(other.as_vec2())
    }

    /// Step toward `target` by at most `max_step`, landing exactly on it when close enough
    pub fn move_toward(&mut self, target: &Position, max_step: f32) {
        let to_target = target.as_vec2() - self.as_vec2();
        let dist = to_target.length();
        if dist <= max_step || dist == 0.0 {
            *self = *target;
        } else {
            *self = (self.as_vec2() + to_target / dist * max_step).into();
        }
    }

    /// Unit direction toward `target` (zero when coincident)
    pub fn direction_to(&self, target: &Position) -> Vec2 {
        (target.as_vec2() - self.as_vec2()).normalize_or_zero()
    }
}

impl From<Vec2> for Position {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Position> for Vec2 {
    fn from(p: Position) -> Self {
        p.as_vec2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        let mut p = Position::new(1.0, 2.0);
        p.translate(3.0, -4.0);
        assert_eq!(p, Position::new(4.0, -2.0));
    }

    #[test]
    fn test_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_move_toward_clamps_step() {
        let mut p = Position::new(0.0, 0.0);
        let target = Position::new(10.0, 0.0);
        p.move_toward(&target, 4.0);
        assert!((p.x - 4.0).abs() < 1e-6);
        p.move_toward(&target, 4.0);
        p.move_toward(&target, 4.0);
        // Never overshoots
        assert_eq!(p, target);
    }
}
