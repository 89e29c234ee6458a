//! Slot store for every lemming released into the level.

use crate::components::{ActionTag, Facing, Lemming, LemmingId};
use bevy_ecs::prelude::*;

/// Half width of the hit box used by `Colony::lemming_at`.
const SELECT_HALF_WIDTH: i32 = 4;
/// Height of the hit box above the foot.
const SELECT_HEIGHT: i32 = 10;

/// All lemmings, in release order. Slots are never reused.
#[derive(Resource, Debug, Default)]
pub struct Colony {
    lemmings: Vec<Lemming>,
}

impl Colony {
    /// Append a new lemming and return its slot id.
    pub fn spawn(&mut self, x: i32, y: i32, facing: Facing, action: ActionTag) -> LemmingId {
        let id = LemmingId(self.lemmings.len() as u32);
        self.lemmings.push(Lemming::new(id, x, y, facing, action));
        id
    }

    pub fn get(&self, id: LemmingId) -> Option<&Lemming> {
        self.lemmings.get(id.index())
    }

    pub fn get_mut(&mut self, id: LemmingId) -> Option<&mut Lemming> {
        self.lemmings.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lemming> {
        self.lemmings.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Lemming> {
        self.lemmings.iter_mut()
    }

    pub fn as_slice(&self) -> &[Lemming] {
        &self.lemmings
    }

    /// Total slots, including removed lemmings.
    pub fn len(&self) -> usize {
        self.lemmings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmings.is_empty()
    }

    /// Lemmings that have not been removed.
    pub fn live_count(&self) -> usize {
        self.lemmings.iter().filter(|l| l.is_live()).count()
    }

    /// Select the live lemming whose hit box contains `(x, y)`, preferring the
    /// one whose foot is closest. Ties go to the lower slot.
    pub fn lemming_at(&self, x: i32, y: i32) -> Option<LemmingId> {
        self.lemmings
            .iter()
            .filter(|l| l.is_live())
            .filter(|l| {
                (x - l.x).abs() <= SELECT_HALF_WIDTH && y <= l.y && y > l.y - SELECT_HEIGHT
            })
            .min_by_key(|l| {
                let dx = x - l.x;
                let dy = y - (l.y - SELECT_HEIGHT / 2);
                (dx * dx + dy * dy, l.id)
            })
            .map(|l| l.id)
    }
}
