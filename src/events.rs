//! Fire-and-forget notifications produced during a tick.
//!
//! The simulation appends to `SimEvents`; the caller drains it after each
//! step to feed the minimap, sound, or any other observer.

use crate::components::LemmingId;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    Spawned { id: LemmingId, x: i32, y: i32 },
    /// A lemming died at `(x, y)`.
    Died { id: LemmingId, x: i32, y: i32 },
    Saved { id: LemmingId },
    /// Emitted for every lemming taken out of the level, after `Died` or `Saved`.
    Removed { id: LemmingId },
    /// Pixels inside this rectangle may have changed.
    TerrainChanged { x: i32, y: i32, width: i32, height: i32 },
}

/// Resource buffering events until the caller drains them.
#[derive(Resource, Debug, Default)]
pub struct SimEvents {
    events: Vec<SimEvent>,
    /// Set by any terrain change, cleared by the snapshot that reports it.
    terrain_dirty: bool,
}

impl SimEvents {
    pub fn push(&mut self, event: SimEvent) {
        if matches!(event, SimEvent::TerrainChanged { .. }) {
            self.terrain_dirty = true;
        }
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn terrain_dirty(&self) -> bool {
        self.terrain_dirty
    }

    /// Read and reset the dirty flag.
    pub fn take_terrain_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.terrain_dirty, false)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_buffer() {
        let mut events = SimEvents::default();
        events.push(SimEvent::Saved { id: LemmingId(1) });
        events.push(SimEvent::Died { id: LemmingId(2), x: 3, y: 4 });
        assert_eq!(events.drain().len(), 2);
        assert!(events.pending().is_empty());
    }

    #[test]
    fn test_terrain_change_marks_dirty() {
        let mut events = SimEvents::default();
        assert!(!events.terrain_dirty());
        events.push(SimEvent::TerrainChanged { x: 0, y: 0, width: 9, height: 1 });
        events.clear();
        assert!(events.take_terrain_dirty());
        assert!(!events.terrain_dirty());
    }
}
