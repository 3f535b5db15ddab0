//! Level streaming from text maps
//!
//! A level is a rectangular block of text, one glyph per cell. Loading turns
//! every recognized glyph into an entity placed at
//! `((column - column_offset) * column_factor, (row - row_offset) * row_factor)`.
//! Rows above the reference row (`row_offset`) start dormant: parked in the
//! pool, scrolled with the world, and promoted to live once they come within
//! activation distance of the player. This keeps the simulated set near the
//! viewport no matter how long the level is.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};
use super::pool::EntityPool;
use super::position::Position;
use super::shift::WorldShiftCoordinator;
use crate::error::SimError;

/// One level map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    /// Map rows, top (furthest ahead) first; space = empty cell
    pub rows: Vec<String>,
    #[serde(default)]
    pub column_offset: i32,
    /// Map row that lines up with the player's reference line
    pub row_offset: i32,
}

impl Level {
    pub fn from_text(name: impl Into<String>, text: &str, column_offset: i32, row_offset: i32) -> Self {
        Self {
            name: name.into(),
            rows: text.lines().map(str::to_owned).collect(),
            column_offset,
            row_offset,
        }
    }

    /// Width of the widest row; shorter rows are blank-padded
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn glyph_at(&self, column: usize, row: usize) -> char {
        self.rows
            .get(row)
            .and_then(|r| r.chars().nth(column))
            .unwrap_or(' ')
    }
}

/// A non-blank map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub glyph: char,
    pub column: usize,
    pub row: usize,
}

impl Placement {
    pub fn world_position(&self, level: &Level, (column_factor, row_factor): (f32, f32)) -> Position {
        Position::new(
            (self.column as i64 - level.column_offset as i64) as f32 * column_factor,
            (self.row as i64 - level.row_offset as i64) as f32 * row_factor,
        )
    }

    /// Row lies ahead of the reference line
    pub fn is_ahead(&self, level: &Level) -> bool {
        (self.row as i64) < level.row_offset as i64
    }
}

/// Non-blank cells, row-major from the top-left
pub fn parse_placements(level: &Level) -> Vec<Placement> {
    let mut placements = Vec::new();
    for (row, line) in level.rows.iter().enumerate() {
        for (column, glyph) in line.chars().enumerate() {
            if !glyph.is_whitespace() {
                placements.push(Placement { glyph, column, row });
            }
        }
    }
    placements
}

/// Maps a glyph to a fresh entity; `None` for unrecognized glyphs
pub trait EntityCatalog {
    fn build(&self, glyph: char) -> Option<Box<dyn Entity>>;
}

impl<F> EntityCatalog for F
where
    F: Fn(char) -> Option<Box<dyn Entity>>,
{
    fn build(&self, glyph: char) -> Option<Box<dyn Entity>> {
        self(glyph)
    }
}

/// Ordered level list, never empty
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CatalogFile")]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

/// On-disk shape, checked by `LevelCatalog::new` before use
#[derive(Deserialize)]
struct CatalogFile {
    levels: Vec<Level>,
}

impl TryFrom<CatalogFile> for LevelCatalog {
    type Error = SimError;

    fn try_from(file: CatalogFile) -> Result<Self, SimError> {
        Self::new(file.levels)
    }
}

impl LevelCatalog {
    pub fn new(levels: Vec<Level>) -> Result<Self, SimError> {
        if levels.is_empty() {
            return Err(SimError::EmptyCatalog);
        }
        Ok(Self { levels })
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.levels)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let catalog = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded {} levels from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn first(&self) -> &Level {
        &self.levels[0]
    }

    pub fn get(&self, name: &str) -> Result<&Level, SimError> {
        self.levels
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| SimError::UnknownLevel {
                name: name.to_owned(),
            })
    }

    /// Level following `name`; exhausted content is an error, never a wrap-around
    pub fn next_after(&self, name: &str) -> Result<&Level, SimError> {
        let index = self
            .levels
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| SimError::UnknownLevel {
                name: name.to_owned(),
            })?;
        self.levels
            .get(index + 1)
            .ok_or_else(|| SimError::ContentExhausted {
                after: name.to_owned(),
            })
    }
}

/// What a level load produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub live: usize,
    pub dormant: usize,
    /// Non-blank glyphs the catalog did not recognize
    pub skipped: usize,
}

/// Owns the dormant registry and drives level (re)loads
#[derive(Debug, Clone)]
pub struct WorldStreamer {
    dormant: Vec<EntityId>,
    current: Option<String>,
    pixel_factors: (f32, f32),
}

impl WorldStreamer {
    pub fn new(pixel_factors: (f32, f32)) -> Self {
        Self {
            dormant: Vec::new(),
            current: None,
            pixel_factors,
        }
    }

    pub fn current_level(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn dormant_ids(&self) -> &[EntityId] {
        &self.dormant
    }

    pub fn dormant_count(&self) -> usize {
        self.dormant.len()
    }

    /// Drop every dormant entity immediately
    pub fn clear(&mut self, pool: &mut EntityPool, shifter: &mut WorldShiftCoordinator) {
        for id in self.dormant.drain(..) {
            shifter.remove(id);
            pool.discard(id);
        }
    }

    /// Replace the world with `level`: clear dormant and live sets, then place the map
    pub fn load(
        &mut self,
        level: &Level,
        catalog: &dyn EntityCatalog,
        pool: &mut EntityPool,
        shifter: &mut WorldShiftCoordinator,
    ) -> LoadReport {
        self.clear(pool, shifter);
        pool.destroy_all();
        shifter.reset();

        let mut report = LoadReport::default();
        for placement in parse_placements(level) {
            let Some(mut entity) = catalog.build(placement.glyph) else {
                report.skipped += 1;
                continue;
            };
            entity.body_mut().position = placement.world_position(level, self.pixel_factors);

            if !placement.is_ahead(level) {
                pool.spawn(entity);
                report.live += 1;
            } else if entity.as_activatable().is_some() {
                let id = pool.park(entity);
                shifter.insert(id);
                self.dormant.push(id);
                report.dormant += 1;
            } else {
                log::warn!(
                    "'{}' at row {} is ahead of the reference line but cannot activate; spawning now",
                    placement.glyph,
                    placement.row
                );
                pool.spawn(entity);
                report.live += 1;
            }
        }

        log::info!(
            "Loaded level '{}': {} live, {} dormant, {} skipped glyphs",
            level.name,
            report.live,
            report.dormant,
            report.skipped
        );
        self.current = Some(level.name.clone());
        report
    }

    /// Load the level after the current one
    pub fn advance(
        &mut self,
        levels: &LevelCatalog,
        catalog: &dyn EntityCatalog,
        pool: &mut EntityPool,
        shifter: &mut WorldShiftCoordinator,
    ) -> Result<LoadReport, SimError> {
        let next = match self.current.as_deref() {
            Some(current) => levels.next_after(current).inspect_err(|e| {
                if e.is_content_exhausted() {
                    log::error!("No level after '{}'", current);
                }
            })?,
            None => levels.first(),
        };
        Ok(self.load(next, catalog, pool, shifter))
    }

    /// Promote every dormant entity whose activation test passes against the player
    ///
    /// Promoted entities go to the pool's pending-add list and leave the
    /// registry for good. Returns the number promoted.
    pub fn activate(&mut self, pool: &mut EntityPool, shifter: &mut WorldShiftCoordinator) -> usize {
        let Some(reference) = pool.reference_body() else {
            return 0;
        };

        let mut promoted = 0;
        self.dormant.retain(|&id| {
            let (ready, shiftable) = match pool.get(id) {
                Some(entity) => (
                    entity
                        .as_activatable()
                        .is_some_and(|a| a.try_to_activate(&reference)),
                    entity.is_shiftable(),
                ),
                // Destroyed while dormant
                None => return false,
            };
            if !ready {
                return true;
            }
            if !shiftable {
                shifter.remove(id);
            }
            pool.activate(id);
            log::debug!("Activated {}", id);
            promoted += 1;
            false
        });
        promoted
    }
}
