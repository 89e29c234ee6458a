//! Terrain model - ground bitmap, steel bitmap, and arrow zones.
//!
//! The terrain is a pixel occupancy grid that lemmings walk on and carve
//! through. Steel cells are immune to carving; arrow zones only let
//! destructive skills through in one direction. Every query is bounds-checked
//! and resolves to "nothing there" outside the grid.

use crate::components::Facing;
use crate::error::{SimError, SimResult};
use crate::masks::Mask;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// A one-way rectangle: destructive skills may only pass in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrowZone {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// The permitted direction.
    pub direction: Facing,
}

impl ArrowZone {
    /// Far edges are computed in i64 so zones reaching past `i32::MAX` stay valid.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        let (x0, y0) = (i64::from(self.x), i64::from(self.y));
        x >= x0 && x < x0 + i64::from(self.width) && y >= y0 && y < y0 + i64::from(self.height)
    }
}

/// Pixel terrain for one level.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Terrain {
    width: usize,
    height: usize,
    /// Row-major occupancy.
    ground: Vec<bool>,
    /// Row-major carve protection.
    steel: Vec<bool>,
    arrows: Vec<ArrowZone>,
}

impl Terrain {
    /// Create an empty (all air) terrain.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ground: vec![false; width * height],
            steel: vec![false; width * height],
            arrows: Vec::new(),
        }
    }

    /// Build terrain from pre-decoded bitmaps.
    pub fn from_bits(width: usize, height: usize, ground: Vec<bool>, steel: Vec<bool>) -> SimResult<Self> {
        let cells = width * height;
        if width == 0 || height == 0 {
            return Err(SimError::InvalidLevel(format!("terrain is {}x{}", width, height)));
        }
        if ground.len() != cells || steel.len() != cells {
            return Err(SimError::InvalidLevel(format!(
                "bitmap sizes {}/{} do not match {}x{}",
                ground.len(),
                steel.len(),
                width,
                height
            )));
        }
        Ok(Self { width, height, ground, steel, arrows: Vec::new() })
    }

    /// Build terrain from text rows: `#` is ground, `=` is steel ground,
    /// anything else is air. Short rows are padded with air.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut terrain = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let i = y * width + x;
                match ch {
                    '#' => terrain.ground[i] = true,
                    '=' => {
                        terrain.ground[i] = true;
                        terrain.steel[i] = true;
                    }
                    _ => {}
                }
            }
        }
        terrain
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width as i32
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height as i32
    }

    pub fn arrows(&self) -> &[ArrowZone] {
        &self.arrows
    }

    /// Get the cell index for pixel coordinates.
    #[inline]
    fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn has_ground(&self, x: i32, y: i32) -> bool {
        self.cell_index(x, y).map_or(false, |i| self.ground[i])
    }

    #[inline]
    pub fn has_steel(&self, x: i32, y: i32) -> bool {
        self.cell_index(x, y).map_or(false, |i| self.steel[i])
    }

    /// Whether `(x, y)` lies in an arrow zone that forbids `direction`.
    pub fn is_arrow_blocking(&self, x: i32, y: i32, direction: Facing) -> bool {
        self.arrows
            .iter()
            .any(|zone| zone.direction != direction && zone.contains(x, y))
    }

    /// Clear the mask's footprint at `(x, y)`, skipping steel.
    /// Returns whether any pixel changed.
    pub fn carve(&mut self, mask: &Mask, x: i32, y: i32) -> bool {
        let mut changed = false;
        for (dx, dy) in mask.footprint() {
            if let Some(i) = self.cell_index(x + dx, y + dy) {
                if self.ground[i] && !self.steel[i] {
                    self.ground[i] = false;
                    changed = true;
                }
            }
        }
        changed
    }

    /// Fill the mask's footprint at `(x, y)` with ground.
    /// Returns whether any pixel changed.
    pub fn restore(&mut self, mask: &Mask, x: i32, y: i32) -> bool {
        let mut changed = false;
        for (dx, dy) in mask.footprint() {
            if let Some(i) = self.cell_index(x + dx, y + dy) {
                if !self.ground[i] {
                    self.ground[i] = true;
                    changed = true;
                }
            }
        }
        changed
    }

    /// True if `predicate` holds at any footprint coordinate of the mask
    /// applied at `(x, y)`. Coordinates are passed unclipped.
    pub fn under_mask<F>(&self, mask: &Mask, x: i32, y: i32, mut predicate: F) -> bool
    where
        F: FnMut(&Terrain, i32, i32) -> bool,
    {
        mask.footprint().any(|(dx, dy)| predicate(self, x + dx, y + dy))
    }

    /// Steel anywhere under the mask.
    pub fn steel_under(&self, mask: &Mask, x: i32, y: i32) -> bool {
        self.under_mask(mask, x, y, |t, px, py| t.has_steel(px, py))
    }

    /// Steel, or ground an arrow zone protects from `facing`, under the mask.
    pub fn protected_under(&self, mask: &Mask, x: i32, y: i32, facing: Facing) -> bool {
        self.under_mask(mask, x, y, |t, px, py| {
            t.has_steel(px, py) || (t.has_ground(px, py) && t.is_arrow_blocking(px, py, facing))
        })
    }

    // ------------------------------------------------------------------------
    // Level construction
    // ------------------------------------------------------------------------

    /// Fill a rectangle with ground (clipped to the grid).
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        for py in y..y + height {
            for px in x..x + width {
                if let Some(i) = self.cell_index(px, py) {
                    self.ground[i] = true;
                }
            }
        }
    }

    /// Mark a rectangle as steel ground (clipped to the grid).
    pub fn set_steel_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        for py in y..y + height {
            for px in x..x + width {
                if let Some(i) = self.cell_index(px, py) {
                    self.ground[i] = true;
                    self.steel[i] = true;
                }
            }
        }
    }

    pub fn add_arrow_zone(&mut self, zone: ArrowZone) {
        self.arrows.push(zone);
    }

    /// Number of ground pixels.
    pub fn ground_count(&self) -> usize {
        self.ground.iter().filter(|g| **g).count()
    }
}

/// Cell codes used by `TerrainSnapshot::cells`.
pub const CELL_AIR: u8 = 0;
pub const CELL_GROUND: u8 = 1;
pub const CELL_STEEL: u8 = 2;

/// Snapshot of terrain for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major cell codes (`CELL_*`).
    pub cells: Vec<u8>,
    pub arrows: Vec<ArrowZone>,
}

impl TerrainSnapshot {
    pub fn from_terrain(terrain: &Terrain) -> Self {
        let cells = terrain
            .ground
            .iter()
            .zip(&terrain.steel)
            .map(|(&g, &s)| match (g, s) {
                (true, true) => CELL_STEEL,
                (true, false) => CELL_GROUND,
                _ => CELL_AIR,
            })
            .collect();
        Self {
            width: terrain.width,
            height: terrain.height,
            cells,
            arrows: terrain.arrows.clone(),
        }
    }

    /// Rebuild a terrain from this snapshot.
    pub fn to_terrain(&self) -> SimResult<Terrain> {
        let ground = self.cells.iter().map(|&c| c != CELL_AIR).collect();
        let steel = self.cells.iter().map(|&c| c == CELL_STEEL).collect();
        let mut terrain = Terrain::from_bits(self.width, self.height, ground, steel)?;
        terrain.arrows = self.arrows.clone();
        Ok(terrain)
    }
}
