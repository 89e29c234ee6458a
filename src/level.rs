//! Pre-decoded level description handed to `SimWorld::new`.

use crate::config::MAX_RELEASE_RATE;
use crate::error::{SimError, SimResult};
use crate::spatial::TriggerRegion;
use crate::terrain::Terrain;
use serde::{Deserialize, Serialize};

/// Hatch lemmings drop out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrance {
    pub x: i32,
    pub y: i32,
}

/// Everything the simulation needs to start a level.
#[derive(Debug, Clone)]
pub struct LevelSetup {
    pub terrain: Terrain,
    pub entrances: Vec<Entrance>,
    /// Static trigger regions: exits, water, fire, traps.
    pub triggers: Vec<TriggerRegion>,
    pub release_rate: i32,
    pub release_count: i32,
    pub need_count: i32,
}

impl LevelSetup {
    /// A level with no entrances, triggers, or lemmings to release.
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            entrances: Vec::new(),
            triggers: Vec::new(),
            release_rate: 50,
            release_count: 0,
            need_count: 0,
        }
    }

    pub fn with_entrance(mut self, x: i32, y: i32) -> Self {
        self.entrances.push(Entrance { x, y });
        self
    }

    pub fn with_trigger(mut self, region: TriggerRegion) -> Self {
        self.triggers.push(region);
        self
    }

    pub fn with_release(mut self, release_rate: i32, release_count: i32) -> Self {
        self.release_rate = release_rate;
        self.release_count = release_count;
        self
    }

    pub fn with_need(mut self, need_count: i32) -> Self {
        self.need_count = need_count;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.terrain.width() == 0 || self.terrain.height() == 0 {
            return Err(SimError::InvalidLevel("terrain has no pixels".into()));
        }
        if !(0..=MAX_RELEASE_RATE).contains(&self.release_rate) {
            return Err(SimError::InvalidLevel(format!(
                "release rate {} outside 0..={}",
                self.release_rate, MAX_RELEASE_RATE
            )));
        }
        if self.release_count < 0 || self.need_count < 0 {
            return Err(SimError::InvalidLevel("negative lemming count".into()));
        }
        if self.release_count > 0 && self.entrances.is_empty() {
            return Err(SimError::InvalidLevel("lemmings to release but no entrance".into()));
        }
        Ok(())
    }
}
