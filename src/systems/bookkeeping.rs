//! Colony statistics, recomputed at the end of every tick.

use crate::colony::Colony;
use crate::config::{SimConfig, SimTick};
use crate::progress::LevelProgress;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Counts derived from the colony for UIs and tests.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColonyStats {
    /// Slots ever used.
    pub total: usize,
    /// Not yet removed.
    pub live: usize,
    /// Live and still taking skills.
    pub active: usize,
    pub counting_down: usize,
    /// Nothing left to release and nobody left in the level.
    pub finished: bool,
}

impl ColonyStats {
    pub fn compute(colony: &Colony, progress: &LevelProgress, bench_mode: bool) -> Self {
        let mut stats = Self { total: colony.len(), ..Default::default() };
        for lem in colony.iter().filter(|l| l.is_live()) {
            stats.live += 1;
            if !lem.disabled {
                stats.active += 1;
            }
            if lem.has_countdown() {
                stats.counting_down += 1;
            }
        }
        stats.finished = !bench_mode && progress.remaining_to_release == 0 && stats.live == 0;
        stats
    }
}

/// System that refreshes `ColonyStats` and logs when the level runs out of lemmings.
pub fn bookkeeping_system(
    colony: Res<Colony>,
    progress: Res<LevelProgress>,
    config: Res<SimConfig>,
    tick: Res<SimTick>,
    mut stats: ResMut<ColonyStats>,
) {
    let next = ColonyStats::compute(&colony, &progress, config.bench_mode);
    if next.finished && !stats.finished {
        tracing::info!(
            target: "lemsim::level",
            tick = tick.0,
            saved = progress.survivors,
            lost = progress.lost,
            need = progress.need,
            target_reached = progress.target_reached(),
            "level finished"
        );
    }
    if *stats != next {
        *stats = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ActionTag, Facing, LemmingId};

    fn world_with(colony: Colony, progress: LevelProgress) -> World {
        let mut world = World::new();
        world.insert_resource(colony);
        world.insert_resource(progress);
        world.insert_resource(SimConfig::default());
        world.insert_resource(SimTick::default());
        world.insert_resource(ColonyStats::default());
        world
    }

    #[test]
    fn test_counts() {
        let mut colony = Colony::default();
        for i in 0..4 {
            colony.spawn(i * 10, 0, Facing::Right, ActionTag::Walking);
        }
        colony.get_mut(LemmingId(0)).unwrap().removed = true;
        colony.get_mut(LemmingId(1)).unwrap().disabled = true;
        colony.get_mut(LemmingId(2)).unwrap().arm_countdown(30);

        let mut world = world_with(colony, LevelProgress::new(50, 10, 2));
        let mut schedule = Schedule::default();
        schedule.add_systems(bookkeeping_system);
        schedule.run(&mut world);

        let stats = world.resource::<ColonyStats>();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.live, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.counting_down, 1);
        assert!(!stats.finished);
    }

    #[test]
    fn test_finished_once_everyone_is_gone() {
        let mut colony = Colony::default();
        let id = colony.spawn(0, 0, Facing::Right, ActionTag::Walking);
        let mut progress = LevelProgress::new(50, 1, 1);
        progress.release_one();

        let mut world = world_with(colony, progress);
        let mut schedule = Schedule::default();
        schedule.add_systems(bookkeeping_system);
        schedule.run(&mut world);
        assert!(!world.resource::<ColonyStats>().finished);

        world.resource_mut::<Colony>().get_mut(id).unwrap().removed = true;
        schedule.run(&mut world);
        assert!(world.resource::<ColonyStats>().finished);
    }
}
