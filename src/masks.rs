//! Terrain stamps used by destructive and constructive actions.
//!
//! A mask is a small grid of cells with an offset from the point it is applied
//! at (a lemming's foot pixel). Solid cells are left alone; the remaining
//! cells form the footprint that `Terrain::carve` clears and
//! `Terrain::restore` fills.

use crate::components::Facing;
use bevy_ecs::prelude::*;

/// Frames in a basher swing that carve.
pub const BASH_FRAMES: usize = 4;
/// Frames in a miner swing that carve.
pub const MINE_FRAMES: usize = 2;

/// An immutable terrain stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pub width: i32,
    pub height: i32,
    pub offset_x: i32,
    pub offset_y: i32,
    /// Row-major, `true` = solid (outside the footprint).
    solid: Vec<bool>,
}

impl Mask {
    /// A mask whose every cell belongs to the footprint.
    pub fn open(width: i32, height: i32, offset_x: i32, offset_y: i32) -> Self {
        Self::from_fn(width, height, offset_x, offset_y, |_, _| true)
    }

    /// Build a mask cell by cell. `is_open(dx, dy)` receives cell coordinates
    /// relative to the application point (offset already applied).
    pub fn from_fn(
        width: i32,
        height: i32,
        offset_x: i32,
        offset_y: i32,
        mut is_open: impl FnMut(i32, i32) -> bool,
    ) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let mut solid = Vec::with_capacity((width * height) as usize);
        for my in 0..height {
            for mx in 0..width {
                solid.push(!is_open(mx + offset_x, my + offset_y));
            }
        }
        Self { width, height, offset_x, offset_y, solid }
    }

    /// Whether the cell at mask-local coordinates is solid.
    /// Cells outside the mask count as solid.
    pub fn is_solid(&self, mx: i32, my: i32) -> bool {
        if mx < 0 || my < 0 || mx >= self.width || my >= self.height {
            return true;
        }
        self.solid[(my * self.width + mx) as usize]
    }

    /// Offsets (relative to the application point) of every footprint cell.
    pub fn footprint(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.height).flat_map(move |my| {
            (0..self.width).filter_map(move |mx| {
                if self.is_solid(mx, my) {
                    None
                } else {
                    Some((mx + self.offset_x, my + self.offset_y))
                }
            })
        })
    }

    /// Number of footprint cells.
    pub fn open_count(&self) -> usize {
        self.solid.iter().filter(|s| !**s).count()
    }

    /// Horizontal mirror around the application point.
    pub fn mirrored(&self) -> Self {
        let offset_x = -(self.offset_x + self.width - 1);
        let mut solid = Vec::with_capacity(self.solid.len());
        for my in 0..self.height {
            for mx in (0..self.width).rev() {
                solid.push(self.is_solid(mx, my));
            }
        }
        Self {
            width: self.width,
            height: self.height,
            offset_x,
            offset_y: self.offset_y,
            solid,
        }
    }

    /// Bounding rectangle `(x, y, width, height)` of the mask applied at `(x, y)`.
    pub fn bounds_at(&self, x: i32, y: i32) -> (i32, i32, i32, i32) {
        (x + self.offset_x, y + self.offset_y, self.width, self.height)
    }
}

/// A right-facing mask and its mirror.
#[derive(Debug, Clone)]
pub struct Directional {
    pub right: Mask,
    pub left: Mask,
}

impl Directional {
    fn from_right(right: Mask) -> Self {
        let left = right.mirrored();
        Self { right, left }
    }

    pub fn get(&self, facing: Facing) -> &Mask {
        match facing {
            Facing::Right => &self.right,
            Facing::Left => &self.left,
        }
    }
}

/// Every stamp the action programs apply, shared across the colony.
#[derive(Resource, Debug, Clone)]
pub struct MaskSet {
    pub dig: Mask,
    pub bash: [Directional; BASH_FRAMES],
    pub mine: [Directional; MINE_FRAMES],
    pub brick: Directional,
    pub explode: Mask,
}

impl Default for MaskSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl MaskSet {
    /// The stock stamp set, laid out around a 10 pixel tall lemming.
    pub fn standard() -> Self {
        // Nine pixel row centred on the foot.
        let dig = Mask::open(9, 1, -4, 0);

        // Each swing frame reaches two pixels further into the body rows.
        let bash = std::array::from_fn(|k| {
            let reach = 2 + 2 * k as i32;
            Directional::from_right(Mask::from_fn(9, 10, 0, -10, |dx, _| dx <= reach))
        });

        let mine = [
            Directional::from_right(Mask::open(3, 10, 1, -9)),
            Directional::from_right(Mask::from_fn(4, 11, 1, -9, |dx, dy| dy <= 0 || dx >= 3)),
        ];

        let brick = Directional::from_right(Mask::open(6, 1, 0, -1));

        let explode = Mask::from_fn(17, 17, -8, -13, |dx, dy| {
            let cy = dy + 5;
            dx * dx + cy * cy <= 64
        });

        Self { dig, bash, mine, brick, explode }
    }
}
