//! Action programs: one per action tag, dispatched by a single `match`.
//!
//! Each program advances a lemming by one tick and returns the tag to switch
//! to, or `None` to stay. Programs never change the tag themselves; the
//! orchestrator applies the returned transition (see
//! `systems::lemmings::apply_transition`).
//!
//! Shared state a program may touch (terrain, trigger index, event buffer)
//! is handed in through `ActionContext` for the duration of one step.

mod blocking;
mod countdown;
mod movement;
mod skills;
mod terminal;
mod terrain_work;

pub use blocking::{blocker_walls, BLOCKER_WALL_HEIGHT};
pub use countdown::step_countdown;
pub use skills::{try_apply_skill, SkillOutcome};

use crate::components::{ActionTag, Lemming};
use crate::config::SimConfig;
use crate::events::{SimEvent, SimEvents};
use crate::masks::{Mask, MaskSet};
use crate::spatial::TriggerIndex;
use crate::terrain::Terrain;
use bevy_ecs::prelude::*;

/// Borrowed simulation state for one action step.
pub struct ActionContext<'a> {
    pub terrain: &'a mut Terrain,
    pub triggers: &'a mut TriggerIndex,
    pub masks: &'a MaskSet,
    pub config: &'a SimConfig,
    pub events: &'a mut SimEvents,
    pub tick: u64,
}

impl ActionContext<'_> {
    /// Carve terrain and report the touched rectangle if anything changed.
    pub fn carve(&mut self, mask: &Mask, x: i32, y: i32) -> bool {
        let changed = self.terrain.carve(mask, x, y);
        if changed {
            self.report_change(mask, x, y);
        }
        changed
    }

    /// Fill terrain and report the touched rectangle if anything changed.
    pub fn restore(&mut self, mask: &Mask, x: i32, y: i32) -> bool {
        let changed = self.terrain.restore(mask, x, y);
        if changed {
            self.report_change(mask, x, y);
        }
        changed
    }

    fn report_change(&mut self, mask: &Mask, x: i32, y: i32) {
        let (x, y, width, height) = mask.bounds_at(x, y);
        self.events.push(SimEvent::TerrainChanged { x, y, width, height });
    }
}

/// Table of action tags that have a program.
///
/// Every tag is registered by default; unregistering one exercises the
/// fallback that removes a lemming whose action has no program.
#[derive(Resource, Debug, Clone)]
pub struct ActionRegistry {
    registered: [bool; ActionTag::COUNT],
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self { registered: [true; ActionTag::COUNT] }
    }
}

impl ActionRegistry {
    #[inline]
    pub fn is_registered(&self, tag: ActionTag) -> bool {
        self.registered[tag.index()]
    }

    pub fn unregister(&mut self, tag: ActionTag) {
        self.registered[tag.index()] = false;
    }

    pub fn register(&mut self, tag: ActionTag) {
        self.registered[tag.index()] = true;
    }
}

/// Run the lemming's current action program for one tick.
pub fn step(lem: &mut Lemming, ctx: &mut ActionContext) -> Option<ActionTag> {
    match lem.action {
        ActionTag::Walking => movement::walking(lem, ctx),
        ActionTag::Falling => movement::falling(lem, ctx),
        ActionTag::Jumping => movement::jumping(lem, ctx),
        ActionTag::Climbing => movement::climbing(lem, ctx),
        ActionTag::Hoisting => movement::hoisting(lem),
        ActionTag::Floating => movement::floating(lem, ctx),
        ActionTag::Digging => terrain_work::digging(lem, ctx),
        ActionTag::Bashing => terrain_work::bashing(lem, ctx),
        ActionTag::Mining => terrain_work::mining(lem, ctx),
        ActionTag::Building => terrain_work::building(lem, ctx),
        ActionTag::Blocking => blocking::blocking(lem, ctx),
        ActionTag::Drowning => terminal::dying(lem, terminal::DROWNING_FRAMES),
        ActionTag::Frying => terminal::dying(lem, terminal::FRYING_FRAMES),
        ActionTag::Splatting => terminal::dying(lem, terminal::SPLATTING_FRAMES),
        ActionTag::Exiting => terminal::dying(lem, terminal::EXITING_FRAMES),
        ActionTag::OhNo => terminal::oh_no(lem, ctx),
        ActionTag::Exploding => terminal::exploding(lem, ctx),
        ActionTag::Shrug => terminal::shrug(lem),
        // Removed on entry; never stepped.
        ActionTag::OutOfLevel => None,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::components::{Facing, LemmingId};

    /// Owned state backing an `ActionContext` in unit tests.
    pub struct Harness {
        pub terrain: Terrain,
        pub triggers: TriggerIndex,
        pub masks: MaskSet,
        pub config: SimConfig,
        pub events: SimEvents,
        pub tick: u64,
    }

    impl Harness {
        pub fn new(rows: &[&str]) -> Self {
            Self::with_terrain(Terrain::from_ascii(rows))
        }

        pub fn with_terrain(terrain: Terrain) -> Self {
            Self {
                terrain,
                triggers: TriggerIndex::new(16),
                masks: MaskSet::standard(),
                config: SimConfig::default(),
                events: SimEvents::default(),
                tick: 0,
            }
        }

        pub fn ctx(&mut self) -> ActionContext<'_> {
            ActionContext {
                terrain: &mut self.terrain,
                triggers: &mut self.triggers,
                masks: &self.masks,
                config: &self.config,
                events: &mut self.events,
                tick: self.tick,
            }
        }

        /// Step until the program asks for a transition, up to `limit` ticks.
        pub fn run_until_transition(&mut self, lem: &mut Lemming, limit: usize) -> Option<ActionTag> {
            for _ in 0..limit {
                self.tick += 1;
                if let Some(next) = step(lem, &mut self.ctx()) {
                    return Some(next);
                }
            }
            None
        }
    }

    pub fn lemming(x: i32, y: i32, facing: Facing, action: ActionTag) -> Lemming {
        Lemming::new(LemmingId(0), x, y, facing, action)
    }
}
