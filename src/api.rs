//! Public API for the simulation.
//!
//! `SimWorld` owns the ECS world and the per-tick schedule. Renderers and
//! input layers talk to the colony only through it.
//!
//! ## Fixed Timestep
//!
//! The simulation advances in whole ticks. `step(dt)` accumulates wall time
//! and runs as many ticks as fit into it, so behavior does not depend on the
//! caller's frame rate. `tick()` runs exactly one.

use crate::actions::{ActionContext, ActionRegistry};
use crate::colony::Colony;
use crate::components::{Lemming, LemmingId, SkillKind};
use crate::config::{SimConfig, SimTick};
use crate::error::SimResult;
use crate::events::{SimEvent, SimEvents};
use crate::level::LevelSetup;
use crate::masks::MaskSet;
use crate::minimap::Minimap;
use crate::profiler::StressProfiler;
use crate::progress::LevelProgress;
use crate::render_bridge::{draw_colony, DisplaySink};
use crate::spatial::TriggerIndex;
use crate::systems::{assign_skill, build_schedule, init_world, ColonyStats, NukeSequencer};
use crate::terrain::{Terrain, TerrainSnapshot};
use crate::world::Snapshot;
use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;
use std::time::Instant;

/// Resources a skill assignment borrows outside the schedule.
type SkillParams<'w> = (
    ResMut<'w, Colony>,
    ResMut<'w, Terrain>,
    ResMut<'w, TriggerIndex>,
    ResMut<'w, SimEvents>,
    ResMut<'w, LevelProgress>,
    Res<'w, MaskSet>,
    Res<'w, SimConfig>,
    Res<'w, ActionRegistry>,
    Res<'w, SimTick>,
);

/// The main simulation world container.
pub struct SimWorld {
    world: World,
    schedule: Schedule,
    tick: u64,
    time: f32,
    /// Accumulated time for fixed timestep.
    time_accumulator: f32,
}

impl SimWorld {
    /// Start a level with the default configuration.
    pub fn new(level: LevelSetup) -> SimResult<Self> {
        Self::with_config(level, SimConfig::default())
    }

    /// Start a level with a custom configuration.
    pub fn with_config(level: LevelSetup, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        level.validate()?;

        tracing::info!(
            target: "lemsim::level",
            width = level.terrain.width(),
            height = level.terrain.height(),
            entrances = level.entrances.len(),
            triggers = level.triggers.len(),
            release_rate = level.release_rate,
            release_count = level.release_count,
            need = level.need_count,
            bench_mode = config.bench_mode,
            "level loaded"
        );

        let mut world = World::new();
        init_world(&mut world, level, config);

        Ok(Self {
            world,
            schedule: build_schedule(),
            tick: 0,
            time: 0.0,
            time_accumulator: 0.0,
        })
    }

    /// Step the simulation forward by `dt` seconds of wall time.
    /// Returns the number of ticks run.
    pub fn step(&mut self, dt: f32) -> u32 {
        let fixed_dt = self.config().fixed_timestep;
        self.time_accumulator += dt;

        let mut ticks = 0;
        while self.time_accumulator >= fixed_dt {
            self.tick();
            self.time_accumulator -= fixed_dt;
            ticks += 1;
        }
        ticks
    }

    /// Run exactly one tick.
    pub fn tick(&mut self) {
        let dt = self.config().fixed_timestep;
        self.world.resource_mut::<SimTick>().increment();
        self.schedule.run(&mut self.world);
        self.tick += 1;
        self.time += dt;
    }

    /// Run `ticks` ticks back to back.
    pub fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Run `ticks` ticks, recording each one's wall time and live count.
    pub fn run_profiled(&mut self, ticks: u32, profiler: &mut StressProfiler) {
        for _ in 0..ticks {
            let start = Instant::now();
            profiler.profiler.time_section("tick", || self.tick());
            profiler
                .profiler
                .time_section("drain_events", || self.world.resource_mut::<SimEvents>().clear());
            let live = self.world.resource::<Colony>().live_count();
            profiler.record_tick(start.elapsed(), live);
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Hand `skill` to a lemming. Returns whether the skill was used; the
    /// caller decides whether that spends a skill point.
    pub fn apply_skill(&mut self, id: LemmingId, skill: SkillKind) -> bool {
        let mut state: SystemState<SkillParams> = SystemState::new(&mut self.world);
        let (mut colony, mut terrain, mut triggers, mut events, mut progress, masks, config, registry, tick) =
            state.get_mut(&mut self.world);

        let Some(lem) = colony.get_mut(id) else {
            tracing::warn!(target: "lemsim::skills", id = id.0, skill = ?skill, "unknown lemming");
            return false;
        };
        let mut ctx = ActionContext {
            terrain: &mut *terrain,
            triggers: &mut *triggers,
            masks: &*masks,
            config: &*config,
            events: &mut *events,
            tick: tick.0,
        };
        let applied = assign_skill(lem, skill, &mut ctx, &mut progress, &registry);
        if !applied {
            tracing::debug!(target: "lemsim::skills", id = id.0, skill = ?skill, "skill rejected");
        }
        applied
    }

    /// Stop releases and start arming every lemming, one per tick.
    /// Returns `false` if the level was already nuked.
    pub fn nuke(&mut self) -> bool {
        if !self.world.resource_mut::<NukeSequencer>().trigger() {
            return false;
        }
        let mut progress = self.world.resource_mut::<LevelProgress>();
        progress.do_nuke();
        tracing::info!(target: "lemsim::nuke", tick = self.tick, out = progress.out, "nuke started");
        true
    }

    /// Adjust the release rate within `[min_release_rate, 99]`. Returns the new rate.
    pub fn change_release_rate(&mut self, delta: i32) -> i32 {
        self.world.resource_mut::<LevelProgress>().change_release_rate(delta)
    }

    /// Mutable access to the action program table.
    pub fn registry_mut(&mut self) -> Mut<'_, ActionRegistry> {
        self.world.resource_mut::<ActionRegistry>()
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// The live lemming under `(x, y)`, if any.
    pub fn lemming_at(&self, x: i32, y: i32) -> Option<LemmingId> {
        self.colony().lemming_at(x, y)
    }

    pub fn lemming(&self, id: LemmingId) -> Option<&Lemming> {
        self.colony().get(id)
    }

    /// Every slot, including removed lemmings.
    pub fn lemmings(&self) -> &[Lemming] {
        self.colony().as_slice()
    }

    pub fn colony(&self) -> &Colony {
        self.world.resource::<Colony>()
    }

    pub fn terrain(&self) -> &Terrain {
        self.world.resource::<Terrain>()
    }

    pub fn triggers(&self) -> &TriggerIndex {
        self.world.resource::<TriggerIndex>()
    }

    pub fn progress(&self) -> &LevelProgress {
        self.world.resource::<LevelProgress>()
    }

    pub fn stats(&self) -> &ColonyStats {
        self.world.resource::<ColonyStats>()
    }

    pub fn config(&self) -> &SimConfig {
        self.world.resource::<SimConfig>()
    }

    /// Nothing left to release and nobody left in the level.
    pub fn is_finished(&self) -> bool {
        self.stats().finished
    }

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.resource_mut::<SimEvents>().drain()
    }

    /// Send every live lemming to a renderer. Returns how many were drawn.
    pub fn draw(&self, sink: &mut dyn DisplaySink) -> usize {
        draw_colony(self.colony(), sink)
    }

    /// A minimap of the current terrain with `scale x scale` pixel cells.
    pub fn minimap(&self, scale: usize) -> Minimap {
        Minimap::new(self.terrain(), scale)
    }

    /// Get a snapshot of the current simulation state.
    /// Reports and clears the terrain dirty flag.
    pub fn snapshot(&mut self) -> Snapshot {
        let snapshot = Snapshot::from_world(&self.world, self.tick, self.time);
        self.world.resource_mut::<SimEvents>().take_terrain_dirty();
        snapshot
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&mut self) -> String {
        self.snapshot().to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Full terrain snapshot, for the initial load or after `terrain_dirty`.
    pub fn terrain_snapshot(&self) -> TerrainSnapshot {
        TerrainSnapshot::from_terrain(self.terrain())
    }

    pub fn terrain_snapshot_json(&self) -> String {
        serde_json::to_string(&self.terrain_snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Elapsed simulation time in seconds.
    pub fn current_time(&self) -> f32 {
        self.time
    }

    /// Get direct access to the ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world (for advanced usage).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
