//! Snapshot types.
//!
//! A `Snapshot` is a serializable view of the colony for renderers, replays
//! and debugging. It never feeds back into the simulation.

use crate::colony::Colony;
use crate::components::{ActionTag, Facing, Lemming};
use crate::events::SimEvents;
use crate::progress::LevelProgress;
use crate::systems::ColonyStats;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// One live lemming as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LemmingSnapshot {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
    pub action: ActionTag,
    pub frame: i32,
    /// 5..=1 while the fuse burns, 0 otherwise.
    pub countdown: i32,
    pub can_climb: bool,
    pub has_parachute: bool,
    pub disabled: bool,
}

impl From<&Lemming> for LemmingSnapshot {
    fn from(lem: &Lemming) -> Self {
        Self {
            id: lem.id.0,
            x: lem.x,
            y: lem.y,
            facing: lem.facing,
            action: lem.action,
            frame: lem.frame,
            countdown: lem.countdown_digit(),
            can_climb: lem.can_climb,
            has_parachute: lem.has_parachute,
            disabled: lem.disabled,
        }
    }
}

/// Complete simulation state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current simulation tick.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub time: f32,
    /// Live lemmings in slot order.
    pub lemmings: Vec<LemmingSnapshot>,
    pub progress: LevelProgress,
    pub stats: ColonyStats,
    /// Whether terrain has changed since the previous snapshot.
    pub terrain_dirty: bool,
}

impl Snapshot {
    /// Create a snapshot from the ECS world.
    ///
    /// Leaves the terrain dirty flag set; `SimWorld::snapshot` is the one
    /// that consumes it.
    pub fn from_world(world: &World, tick: u64, time: f32) -> Self {
        let lemmings = world
            .get_resource::<Colony>()
            .map(|colony| colony.iter().filter(|l| l.is_live()).map(LemmingSnapshot::from).collect())
            .unwrap_or_default();

        Self {
            tick,
            time,
            lemmings,
            progress: world.get_resource::<LevelProgress>().cloned().unwrap_or_default(),
            stats: world.get_resource::<ColonyStats>().cloned().unwrap_or_default(),
            terrain_dirty: world
                .get_resource::<SimEvents>()
                .map(|e| e.terrain_dirty())
                .unwrap_or(false),
        }
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
