//! ECS systems for the colony simulation.
//!
//! One tick runs these in a fixed order on a single thread:
//!
//! 1. `spawn_system` - releases lemmings at the entrances
//! 2. `nuke_system` - arms one fuse per tick after a nuke
//! 3. `lemming_step_system` - bounds, action program, triggers, fuse
//! 4. `bookkeeping_system` - refreshes `ColonyStats`
//!
//! The order is part of the simulation's determinism: a lemming spawned this
//! tick is stepped this tick, and one armed by the nuke burns its first fuse
//! tick immediately.

pub mod bookkeeping;
pub mod lemmings;
pub mod nuke;
pub mod serialization;
pub mod spawning;

pub use bookkeeping::*;
pub use lemmings::*;
pub use nuke::*;
pub use serialization::*;
pub use spawning::*;

use crate::actions::ActionRegistry;
use crate::colony::Colony;
use crate::config::{SimConfig, SimTick};
use crate::events::SimEvents;
use crate::level::LevelSetup;
use crate::masks::MaskSet;
use crate::progress::LevelProgress;
use crate::spatial::TriggerIndex;
use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;

/// Insert every resource the systems read, seeded from `level`.
pub fn init_world(world: &mut World, level: LevelSetup, config: SimConfig) {
    let mut triggers = TriggerIndex::new(config.trigger_cell_size);
    triggers.add_range(level.triggers);

    world.insert_resource(LevelProgress::new(
        level.release_rate,
        level.release_count,
        level.need_count,
    ));
    world.insert_resource(Spawner::new(level.entrances));
    world.insert_resource(level.terrain);
    world.insert_resource(triggers);
    world.insert_resource(MaskSet::standard());
    world.insert_resource(config);
    world.insert_resource(SimTick::default());
    world.insert_resource(Colony::default());
    world.insert_resource(NukeSequencer::default());
    world.insert_resource(SimEvents::default());
    world.insert_resource(ActionRegistry::default());
    world.insert_resource(ColonyStats::default());
}

/// The per-tick schedule, chained and single-threaded.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(
        (spawn_system, nuke_system, lemming_step_system, bookkeeping_system).chain(),
    );
    schedule
}
