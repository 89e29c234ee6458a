//! Minimap: a downsampled view of the terrain plus fading death markers.
//!
//! Read-only with respect to the simulation. It consumes `SimEvent`s
//! drained by the caller and re-reads terrain only when told it changed.

use crate::events::SimEvent;
use crate::terrain::Terrain;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Ticks a death marker stays visible.
pub const DEATH_MARKER_TICKS: u32 = 32;

/// A recent death, fading out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathMarker {
    /// Minimap cell coordinates.
    pub cx: usize,
    pub cy: usize,
    pub ttl: u32,
}

/// Coarse terrain occupancy and death markers for an overview display.
#[derive(Debug, Clone)]
pub struct Minimap {
    scale: usize,
    width: usize,
    height: usize,
    /// Fraction of ground pixels per cell, row-major.
    cells: Vec<f32>,
    markers: Vec<DeathMarker>,
}

impl Minimap {
    /// Build a minimap where each cell covers `scale x scale` terrain pixels.
    pub fn new(terrain: &Terrain, scale: usize) -> Self {
        let scale = scale.max(1);
        let width = (terrain.width() as usize).div_ceil(scale);
        let height = (terrain.height() as usize).div_ceil(scale);
        let mut minimap = Self {
            scale,
            width,
            height,
            cells: vec![0.0; width * height],
            markers: Vec::new(),
        };
        minimap.redraw(terrain);
        minimap
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    /// Ground coverage of one cell, 0.0 outside the map.
    pub fn coverage(&self, cx: usize, cy: usize) -> f32 {
        if cx >= self.width || cy >= self.height {
            return 0.0;
        }
        self.cells[cy * self.width + cx]
    }

    pub fn markers(&self) -> &[DeathMarker] {
        &self.markers
    }

    /// Recompute every cell from the terrain.
    pub fn redraw(&mut self, terrain: &Terrain) {
        let (width, scale) = (self.width, self.scale);
        if width == 0 {
            return;
        }

        #[cfg(feature = "parallel")]
        {
            self.cells
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(cy, row)| fill_row(terrain, scale, cy, row));
        }

        #[cfg(not(feature = "parallel"))]
        {
            for (cy, row) in self.cells.chunks_mut(width).enumerate() {
                fill_row(terrain, scale, cy, row);
            }
        }
    }

    /// Apply one tick's worth of events, then age the markers.
    ///
    /// Returns whether any terrain change was seen, after which the map has
    /// already been redrawn.
    pub fn update(&mut self, terrain: &Terrain, events: &[SimEvent]) -> bool {
        for marker in &mut self.markers {
            marker.ttl = marker.ttl.saturating_sub(1);
        }
        self.markers.retain(|m| m.ttl > 0);

        let mut terrain_changed = false;
        for event in events {
            match *event {
                SimEvent::Died { x, y, .. } => self.add_marker(x, y),
                SimEvent::TerrainChanged { .. } => terrain_changed = true,
                _ => {}
            }
        }
        if terrain_changed {
            self.redraw(terrain);
        }
        terrain_changed
    }

    fn add_marker(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 {
            return;
        }
        let (cx, cy) = (x as usize / self.scale, y as usize / self.scale);
        if cx < self.width && cy < self.height {
            self.markers.push(DeathMarker { cx, cy, ttl: DEATH_MARKER_TICKS });
        }
    }
}

fn fill_row(terrain: &Terrain, scale: usize, cy: usize, row: &mut [f32]) {
    let y0 = (cy * scale) as i32;
    for (cx, cell) in row.iter_mut().enumerate() {
        let x0 = (cx * scale) as i32;
        let mut ground = 0usize;
        let mut total = 0usize;
        for y in y0..(y0 + scale as i32).min(terrain.height()) {
            for x in x0..(x0 + scale as i32).min(terrain.width()) {
                total += 1;
                if terrain.has_ground(x, y) {
                    ground += 1;
                }
            }
        }
        *cell = if total == 0 { 0.0 } else { ground as f32 / total as f32 };
    }
}
