//! Level progress counters.
//!
//! The orchestrator only bumps these counters; deciding whether a level is
//! won or lost is left to the caller.

use crate::config::MAX_RELEASE_RATE;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Release, rescue and loss counters for the running level.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub release_rate: i32,
    pub min_release_rate: i32,
    pub remaining_to_release: i32,
    pub released: i32,
    /// Lemmings currently in the level.
    pub out: i32,
    pub survivors: i32,
    pub lost: i32,
    /// Rescue target.
    pub need: i32,
    pub nuked: bool,
}

impl LevelProgress {
    pub fn new(release_rate: i32, release_count: i32, need: i32) -> Self {
        let release_rate = release_rate.clamp(0, MAX_RELEASE_RATE);
        Self {
            release_rate,
            min_release_rate: release_rate,
            remaining_to_release: release_count.max(0),
            need,
            ..Default::default()
        }
    }

    /// Account for one spawned lemming.
    pub fn release_one(&mut self) {
        if self.remaining_to_release > 0 {
            self.remaining_to_release -= 1;
        }
        self.released += 1;
        self.out += 1;
    }

    /// A lemming left the level, saved or not.
    pub fn lemming_removed(&mut self) {
        self.out = (self.out - 1).max(0);
    }

    pub fn add_survivor(&mut self) {
        self.survivors += 1;
    }

    pub fn add_lost(&mut self) {
        self.lost += 1;
    }

    /// Stop all further releases.
    pub fn do_nuke(&mut self) {
        self.nuked = true;
        self.remaining_to_release = 0;
    }

    /// Adjust the release rate, clamped to `[min_release_rate, 99]`.
    /// Returns the new rate.
    pub fn change_release_rate(&mut self, delta: i32) -> i32 {
        self.release_rate = (self.release_rate + delta).clamp(self.min_release_rate, MAX_RELEASE_RATE);
        self.release_rate
    }

    pub fn target_reached(&self) -> bool {
        self.survivors >= self.need
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_and_remove() {
        let mut progress = LevelProgress::new(50, 2, 1);
        progress.release_one();
        progress.release_one();
        progress.release_one();
        assert_eq!(progress.remaining_to_release, 0);
        assert_eq!(progress.released, 3);
        assert_eq!(progress.out, 3);

        progress.lemming_removed();
        progress.add_survivor();
        assert_eq!(progress.out, 2);
        assert!(progress.target_reached());
    }

    #[test]
    fn test_release_rate_clamped() {
        let mut progress = LevelProgress::new(40, 10, 5);
        assert_eq!(progress.change_release_rate(-10), 40);
        assert_eq!(progress.change_release_rate(30), 70);
        assert_eq!(progress.change_release_rate(100), 99);
    }

    #[test]
    fn test_nuke_stops_release() {
        let mut progress = LevelProgress::new(50, 20, 5);
        progress.do_nuke();
        assert!(progress.nuked);
        assert_eq!(progress.remaining_to_release, 0);
    }
}
