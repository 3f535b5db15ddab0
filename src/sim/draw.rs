//! Draw submissions accumulated during a tick
//!
//! Entities push primitives; the display composites them ordered by each
//! submitter's distance-to-background (lower first, further back).

use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(220, 40, 40);
    pub const ORANGE: Color = Color::rgb(255, 150, 30);
    pub const GREY: Color = Color::rgb(120, 120, 130);
    pub const CYAN: Color = Color::rgb(60, 220, 240);
    pub const YELLOW: Color = Color::rgb(250, 230, 60);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Image {
        key: &'static str,
        at: Position,
        rotation: f32,
        scale: f32,
    },
    Rect {
        at: Position,
        width: f32,
        height: f32,
        color: Color,
        /// `None` = filled
        line_weight: Option<f32>,
    },
    Line {
        from: Position,
        to: Position,
        weight: f32,
        color: Color,
    },
    Text {
        text: String,
        at: Position,
        size: f32,
        color: Color,
    },
}

#[derive(Debug, Clone)]
struct Entry {
    depth: i32,
    command: DrawCommand,
}

/// One frame's worth of draw submissions
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    entries: Vec<Entry>,
    depth: i32,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth key applied to subsequent submissions
    pub fn set_depth(&mut self, depth: i32) {
        self.depth = depth;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.depth = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, command: DrawCommand) {
        self.entries.push(Entry {
            depth: self.depth,
            command,
        });
    }

    pub fn image(&mut self, key: &'static str, at: Position, rotation: f32, scale: f32) {
        self.push(DrawCommand::Image {
            key,
            at,
            rotation,
            scale,
        });
    }

    pub fn rect(
        &mut self,
        at: Position,
        width: f32,
        height: f32,
        color: Color,
        line_weight: Option<f32>,
    ) -> Result<(), SimError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(SimError::InvalidDimension { width, height });
        }
        if let Some(weight) = line_weight {
            check_weight(weight)?;
        }
        self.push(DrawCommand::Rect {
            at,
            width,
            height,
            color,
            line_weight,
        });
        Ok(())
    }

    pub fn line(&mut self, from: Position, to: Position, weight: f32, color: Color) -> Result<(), SimError> {
        check_weight(weight)?;
        self.push(DrawCommand::Line {
            from,
            to,
            weight,
            color,
        });
        Ok(())
    }

    pub fn text(&mut self, text: impl Into<String>, at: Position, size: f32, color: Color) {
        self.push(DrawCommand::Text {
            text: text.into(),
            at,
            size,
            color,
        });
    }

    /// Commands in compositing order: by depth, then submission order
    pub fn commands(&self) -> Vec<&DrawCommand> {
        let mut ordered: Vec<&Entry> = self.entries.iter().collect();
        // Stable sort keeps submission order within a depth
        ordered.sort_by_key(|e| e.depth);
        ordered.into_iter().map(|e| &e.command).collect()
    }
}

fn check_weight(weight: f32) -> Result<(), SimError> {
    if weight < 0.0 {
        return Err(SimError::InvalidLineWeight { weight });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_ordered_by_depth_then_submission() {
        let mut list = DrawList::new();
        list.set_depth(5);
        list.text("front", Position::ORIGIN, 10.0, Color::WHITE);
        list.set_depth(-1);
        list.text("back-a", Position::ORIGIN, 10.0, Color::WHITE);
        list.text("back-b", Position::ORIGIN, 10.0, Color::WHITE);

        let texts: Vec<&str> = list
            .commands()
            .into_iter()
            .map(|c| match c {
                DrawCommand::Text { text, .. } => text.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(texts, vec!["back-a", "back-b", "front"]);
    }

    #[test]
    fn test_negative_line_weight_rejected() {
        let mut list = DrawList::new();
        let err = list
            .line(Position::ORIGIN, Position::new(1.0, 1.0), -0.5, Color::WHITE)
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidLineWeight { .. }));
        assert!(list.is_empty());
    }

    #[test]
    fn test_non_positive_rect_rejected() {
        let mut list = DrawList::new();
        assert!(list.rect(Position::ORIGIN, 0.0, 5.0, Color::RED, None).is_err());
        assert!(list.rect(Position::ORIGIN, 5.0, 5.0, Color::RED, Some(1.0)).is_ok());
        assert_eq!(list.len(), 1);
    }
}
