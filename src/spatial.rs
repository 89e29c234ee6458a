//! Spatial trigger index.
//!
//! Trigger regions (exits, water, fire, traps, blocker walls) are bucketed
//! into a uniform grid so a point query only tests the handful of regions in
//! one cell, rather than every region in the level.

use crate::components::LemmingId;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What happens to a lemming standing in a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    Exit,
    Drown,
    Fry,
    Trap,
    /// Left wall of a blocker: turns right-facing walkers around.
    BlockerLeft,
    /// Right wall of a blocker: turns left-facing walkers around.
    BlockerRight,
}

/// Handle to a region stored in a `TriggerIndex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(pub usize);

/// A half-open rectangle `[x1, x2) x [y1, y2)` that yields its kind when
/// queried inside while armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRegion {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub kind: TriggerKind,
    /// Ticks between two firings. 0 fires every tick.
    pub cooldown: u64,
    /// The region is armed once the tick reaches this value.
    pub disabled_until: u64,
    /// Lemming owning the region, for bulk removal.
    pub owner: Option<LemmingId>,
}

impl TriggerRegion {
    /// Region spanning two arbitrary corners.
    pub fn new(xa: i32, ya: i32, xb: i32, yb: i32, kind: TriggerKind) -> Self {
        Self {
            x1: xa.min(xb),
            y1: ya.min(yb),
            x2: xa.max(xb),
            y2: ya.max(yb),
            kind,
            cooldown: 0,
            disabled_until: 0,
            owner: None,
        }
    }

    pub fn with_cooldown(mut self, cooldown: u64) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn owned_by(mut self, owner: LemmingId) -> Self {
        self.owner = Some(owner);
        self
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }

    /// Zero-area regions never fire.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }
}

/// Grid-bucketed trigger regions.
#[derive(Resource, Debug)]
pub struct TriggerIndex {
    /// Bucket edge length in pixels.
    cell_size: i32,
    /// Map from cell coordinates to the regions overlapping that cell.
    cells: HashMap<(i32, i32), Vec<RegionId>>,
    /// Region storage; removed regions leave `None` until the slot is reused.
    regions: Vec<Option<TriggerRegion>>,
    /// Empty slots in `regions`, reused by `add`.
    free: Vec<RegionId>,
    live: usize,
    /// Reverse lookup: owner to its regions.
    owner_regions: HashMap<LemmingId, Vec<RegionId>>,
}

impl Default for TriggerIndex {
    fn default() -> Self {
        Self::new(16)
    }
}

impl TriggerIndex {
    /// Create an empty index. Non-positive cell sizes fall back to 1.
    pub fn new(cell_size: i32) -> Self {
        Self {
            cell_size: cell_size.max(1),
            cells: HashMap::new(),
            regions: Vec::new(),
            free: Vec::new(),
            live: 0,
            owner_regions: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Convert pixel coordinates to cell coordinates.
    #[inline]
    pub fn point_to_cell(&self, x: i32, y: i32) -> (i32, i32) {
        (x.div_euclid(self.cell_size), y.div_euclid(self.cell_size))
    }

    /// Cells overlapped by a region, as an inclusive cell rectangle.
    fn cell_span(&self, region: &TriggerRegion) -> Option<((i32, i32), (i32, i32))> {
        if region.is_degenerate() {
            return None;
        }
        let min = self.point_to_cell(region.x1, region.y1);
        let max = self.point_to_cell(region.x2 - 1, region.y2 - 1);
        Some((min, max))
    }

    /// Insert a region into every bucket it overlaps.
    ///
    /// Ids of removed regions may be handed out again.
    pub fn add(&mut self, region: TriggerRegion) -> RegionId {
        let id = self.free.pop().unwrap_or(RegionId(self.regions.len()));
        if let Some(((cx1, cy1), (cx2, cy2))) = self.cell_span(&region) {
            for cy in cy1..=cy2 {
                for cx in cx1..=cx2 {
                    self.cells.entry((cx, cy)).or_default().push(id);
                }
            }
        }
        if let Some(owner) = region.owner {
            self.owner_regions.entry(owner).or_default().push(id);
        }
        match self.regions.get_mut(id.0) {
            Some(slot) => *slot = Some(region),
            None => self.regions.push(Some(region)),
        }
        self.live += 1;
        id
    }

    pub fn add_range<I>(&mut self, regions: I) -> Vec<RegionId>
    where
        I: IntoIterator<Item = TriggerRegion>,
    {
        regions.into_iter().map(|r| self.add(r)).collect()
    }

    /// Remove every region owned by `owner` from every bucket it occupies.
    /// Returns how many regions were removed.
    pub fn remove_by_owner(&mut self, owner: LemmingId) -> usize {
        let Some(ids) = self.owner_regions.remove(&owner) else {
            return 0;
        };
        let mut removed = 0;
        for id in ids {
            let Some(region) = self.regions.get_mut(id.0).and_then(Option::take) else {
                continue;
            };
            if let Some(((cx1, cy1), (cx2, cy2))) = self.cell_span(&region) {
                for cy in cy1..=cy2 {
                    for cx in cx1..=cx2 {
                        if let Some(bucket) = self.cells.get_mut(&(cx, cy)) {
                            bucket.retain(|r| *r != id);
                            if bucket.is_empty() {
                                self.cells.remove(&(cx, cy));
                            }
                        }
                    }
                }
            }
            self.free.push(id);
            removed += 1;
        }
        self.live -= removed;
        removed
    }

    /// First armed region containing `(x, y)`; re-arms it at `tick + cooldown`.
    pub fn query(&mut self, x: i32, y: i32, tick: u64) -> Option<TriggerKind> {
        let cell = self.point_to_cell(x, y);
        let bucket = self.cells.get(&cell)?;
        for id in bucket {
            if let Some(Some(region)) = self.regions.get_mut(id.0) {
                if region.contains(x, y) && region.disabled_until <= tick {
                    region.disabled_until = tick.saturating_add(region.cooldown);
                    return Some(region.kind);
                }
            }
        }
        None
    }

    /// Look up a region by id.
    pub fn get(&self, id: RegionId) -> Option<&TriggerRegion> {
        self.regions.get(id.0).and_then(Option::as_ref)
    }

    /// Live regions owned by `owner`.
    pub fn regions_owned_by(&self, owner: LemmingId) -> usize {
        self.owner_regions.get(&owner).map_or(0, Vec::len)
    }

    /// Number of region references in a bucket.
    pub fn bucket_len(&self, cell: (i32, i32)) -> usize {
        self.cells.get(&cell).map_or(0, Vec::len)
    }

    /// Whether any bucket still references a region owned by `owner`.
    pub fn any_bucket_references(&self, owner: LemmingId) -> bool {
        self.cells.values().flatten().any(|id| {
            self.get(*id).map_or(false, |r| r.owner == Some(owner))
        })
    }

    /// Number of live regions.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Allocated region slots, live or free.
    pub fn capacity(&self) -> usize {
        self.regions.len()
    }

    /// All live regions (for debugging/visualization).
    pub fn regions(&self) -> impl Iterator<Item = &TriggerRegion> {
        self.regions.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_hits_and_misses() {
        let mut index = TriggerIndex::new(16);
        index.add(TriggerRegion::new(10, 10, 20, 20, TriggerKind::Exit));

        assert_eq!(index.query(10, 10, 0), Some(TriggerKind::Exit));
        assert_eq!(index.query(19, 19, 0), Some(TriggerKind::Exit));
        // Half-open on the far edges.
        assert_eq!(index.query(20, 15, 0), None);
        assert_eq!(index.query(15, 20, 0), None);
        assert_eq!(index.query(-100, -100, 0), None);
    }

    #[test]
    fn test_corners_are_normalised() {
        let region = TriggerRegion::new(20, 5, 10, 1, TriggerKind::Fry);
        assert_eq!((region.x1, region.y1, region.x2, region.y2), (10, 1, 20, 5));
    }

    #[test]
    fn test_region_spans_multiple_buckets() {
        let mut index = TriggerIndex::new(16);
        index.add(TriggerRegion::new(0, 0, 40, 10, TriggerKind::Drown));
        assert_eq!(index.bucket_len((0, 0)), 1);
        assert_eq!(index.bucket_len((1, 0)), 1);
        assert_eq!(index.bucket_len((2, 0)), 1);
        assert_eq!(index.bucket_len((3, 0)), 0);
        assert_eq!(index.query(39, 9, 0), Some(TriggerKind::Drown));
    }

    #[test]
    fn test_negative_coordinates_bucket_with_floor() {
        let mut index = TriggerIndex::new(16);
        index.add(TriggerRegion::new(-8, -8, -1, -1, TriggerKind::Trap));
        assert_eq!(index.point_to_cell(-1, -1), (-1, -1));
        assert_eq!(index.query(-5, -5, 0), Some(TriggerKind::Trap));
    }

    #[test]
    fn test_cooldown_window() {
        let mut index = TriggerIndex::new(16);
        let cooldown = 5;
        index.add(TriggerRegion::new(0, 0, 8, 8, TriggerKind::Trap).with_cooldown(cooldown));

        let first = 10;
        assert_eq!(index.query(4, 4, first), Some(TriggerKind::Trap));
        for tick in first + 1..first + cooldown {
            assert_eq!(index.query(4, 4, tick), None, "tick {}", tick);
        }
        assert_eq!(index.query(4, 4, first + cooldown), Some(TriggerKind::Trap));
    }

    #[test]
    fn test_zero_cooldown_fires_every_tick() {
        let mut index = TriggerIndex::new(16);
        index.add(TriggerRegion::new(0, 0, 8, 8, TriggerKind::Exit));
        for tick in 0..5 {
            assert_eq!(index.query(1, 1, tick), Some(TriggerKind::Exit));
            assert_eq!(index.query(1, 1, tick), Some(TriggerKind::Exit));
        }
    }

    #[test]
    fn test_degenerate_region_never_fires() {
        let mut index = TriggerIndex::new(16);
        index.add(TriggerRegion::new(5, 5, 5, 20, TriggerKind::Exit));
        assert_eq!(index.query(5, 5, 0), None);
        assert_eq!(index.query(5, 10, 0), None);
    }

    #[test]
    fn test_remove_by_owner() {
        let mut index = TriggerIndex::new(16);
        let owner = LemmingId(3);
        let other = LemmingId(4);
        index.add(TriggerRegion::new(0, 0, 40, 40, TriggerKind::BlockerLeft).owned_by(owner));
        index.add(TriggerRegion::new(50, 0, 60, 40, TriggerKind::BlockerRight).owned_by(owner));
        index.add(TriggerRegion::new(50, 0, 60, 40, TriggerKind::BlockerLeft).owned_by(other));
        assert_eq!(index.len(), 3);

        assert_eq!(index.remove_by_owner(owner), 2);
        assert!(!index.any_bucket_references(owner));
        assert_eq!(index.regions_owned_by(owner), 0);
        for y in (0..40).step_by(7) {
            for x in (0..50).step_by(7) {
                assert_eq!(index.query(x, y, 0), None);
            }
        }
        // The other owner's wall survives.
        assert_eq!(index.query(55, 10, 0), Some(TriggerKind::BlockerLeft));
        assert_eq!(index.remove_by_owner(owner), 0);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_first_armed_match_wins() {
        let mut index = TriggerIndex::new(16);
        index.add(TriggerRegion::new(0, 0, 8, 8, TriggerKind::Exit).with_cooldown(100));
        index.add(TriggerRegion::new(0, 0, 8, 8, TriggerKind::Fry));
        assert_eq!(index.query(2, 2, 0), Some(TriggerKind::Exit));
        assert_eq!(index.query(2, 2, 1), Some(TriggerKind::Fry));
    }

    #[test]
    fn test_fire_once_region_stays_disarmed() {
        let mut index = TriggerIndex::new(16);
        index.add(TriggerRegion::new(0, 0, 8, 8, TriggerKind::Trap).with_cooldown(u64::MAX));
        assert_eq!(index.query(4, 4, 5), Some(TriggerKind::Trap));
        assert_eq!(index.query(4, 4, 6), None);
        assert_eq!(index.query(4, 4, 1_000_000), None);
    }

    #[test]
    fn test_removed_slots_are_reused() {
        let mut index = TriggerIndex::new(16);
        index.add(TriggerRegion::new(100, 0, 108, 8, TriggerKind::Exit));
        for n in 0..50 {
            let owner = LemmingId(n);
            index.add_range([
                TriggerRegion::new(0, 0, 4, 14, TriggerKind::BlockerLeft).owned_by(owner),
                TriggerRegion::new(10, 0, 14, 14, TriggerKind::BlockerRight).owned_by(owner),
            ]);
            assert_eq!(index.len(), 3);
            assert_eq!(index.remove_by_owner(owner), 2);
        }
        assert_eq!(index.len(), 1);
        assert_eq!(index.capacity(), 3);
        assert_eq!(index.query(104, 4, 0), Some(TriggerKind::Exit));
        assert_eq!(index.query(2, 2, 0), None);
    }
}
