//! Spawning system - releases lemmings from the entrances at the level's rate.

use crate::colony::Colony;
use crate::components::{ActionTag, Facing};
use crate::config::SimConfig;
use crate::events::{SimEvent, SimEvents};
use crate::level::Entrance;
use crate::progress::LevelProgress;
use bevy_ecs::prelude::*;

/// Entrances and the release cadence counter.
#[derive(Resource, Debug, Default, Clone)]
pub struct Spawner {
    pub entrances: Vec<Entrance>,
    cadence: i32,
}

impl Spawner {
    pub fn new(entrances: Vec<Entrance>) -> Self {
        Self { entrances, cadence: 0 }
    }

    /// Ticks since the last release wave.
    pub fn cadence(&self) -> i32 {
        self.cadence
    }
}

/// System that drops one lemming per entrance every
/// `release_cadence_base - release_rate` ticks.
///
/// Releases stop once the level has none left, unless bench mode is on.
pub fn spawn_system(
    mut spawner: ResMut<Spawner>,
    mut colony: ResMut<Colony>,
    mut progress: ResMut<LevelProgress>,
    mut events: ResMut<SimEvents>,
    config: Res<SimConfig>,
) {
    spawner.cadence += 1;
    if spawner.cadence < config.release_interval(progress.release_rate) {
        return;
    }
    spawner.cadence = 0;

    let (off_x, off_y) = config.spawn_offset;
    for entrance in spawner.entrances.iter() {
        if progress.remaining_to_release <= 0 && !config.bench_mode {
            break;
        }
        let (x, y) = (entrance.x + off_x, entrance.y + off_y);
        let id = colony.spawn(x, y, Facing::Right, ActionTag::Falling);
        progress.release_one();
        events.push(SimEvent::Spawned { id, x, y });
        tracing::debug!(
            target: "lemsim::spawn",
            id = id.0,
            x,
            y,
            remaining = progress.remaining_to_release,
            "lemming released"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelSetup;
    use crate::systems::init_world;
    use crate::terrain::Terrain;

    fn world_with(release_rate: i32, count: i32, entrances: usize, bench_mode: bool) -> World {
        let mut level = LevelSetup::new(Terrain::new(200, 100)).with_release(release_rate, count);
        for i in 0..entrances {
            level = level.with_entrance(40 * i as i32, 0);
        }
        let mut world = World::new();
        init_world(&mut world, level, SimConfig { bench_mode, ..Default::default() });
        world
    }

    /// Run the spawn system once per tick and record how many lemmings each tick added.
    fn spawns_per_tick(world: &mut World, ticks: usize) -> Vec<usize> {
        let mut schedule = Schedule::default();
        schedule.add_systems(spawn_system);
        let mut counts = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            let before = world.resource::<Colony>().len();
            schedule.run(world);
            counts.push(world.resource::<Colony>().len() - before);
        }
        counts
    }

    #[test]
    fn test_release_cadence() {
        let mut world = world_with(50, 100, 1, false);
        let counts = spawns_per_tick(&mut world, 54 * 3);
        for (i, count) in counts.iter().enumerate() {
            let tick = i + 1;
            let expected = if tick % 54 == 0 { 1 } else { 0 };
            assert_eq!(*count, expected, "tick {}", tick);
        }
    }

    #[test]
    fn test_one_per_entrance_until_exhausted() {
        let mut world = world_with(99, 3, 2, false);
        let counts = spawns_per_tick(&mut world, 5 * 4);
        let waves: Vec<_> = counts.into_iter().filter(|c| *c > 0).collect();
        assert_eq!(waves, vec![2, 1]);

        let progress = world.resource::<LevelProgress>();
        assert_eq!(progress.remaining_to_release, 0);
        assert_eq!(progress.released, 3);
        assert_eq!(progress.out, 3);
    }

    #[test]
    fn test_spawned_lemming_state() {
        let mut world = world_with(99, 1, 1, false);
        spawns_per_tick(&mut world, 5);
        let colony = world.resource::<Colony>();
        let lem = &colony.as_slice()[0];
        assert_eq!((lem.x, lem.y), (24, 14));
        assert_eq!(lem.action, ActionTag::Falling);
        assert_eq!(lem.facing, Facing::Right);
        assert!(matches!(
            world.resource::<SimEvents>().pending(),
            [SimEvent::Spawned { x: 24, y: 14, .. }]
        ));
    }

    #[test]
    fn test_bench_mode_ignores_release_count() {
        let mut world = world_with(99, 1, 1, true);
        let total: usize = spawns_per_tick(&mut world, 50).into_iter().sum();
        assert_eq!(total, 10);
    }
}
