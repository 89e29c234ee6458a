//! Nuke system - arms every lemming's fuse, one lemming per tick.

use crate::actions::{try_apply_skill, SkillOutcome};
use crate::colony::Colony;
use crate::components::{LemmingId, SkillKind};
use crate::config::SimConfig;
use bevy_ecs::prelude::*;

/// Walks the colony once after a nuke, arming one fuse per tick.
#[derive(Resource, Debug, Default, Clone)]
pub struct NukeSequencer {
    /// Next slot to visit; `None` when idle or finished.
    next: Option<usize>,
    triggered: bool,
}

impl NukeSequencer {
    /// Start the sequence. Triggering twice has no further effect.
    pub fn trigger(&mut self) -> bool {
        if self.triggered {
            return false;
        }
        self.triggered = true;
        self.next = Some(0);
        true
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Whether lemmings are still waiting to be armed.
    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }
}

/// System that arms the next armable lemming after a nuke.
///
/// Removed, disabled, and already counting lemmings are skipped without
/// using up the tick.
pub fn nuke_system(mut nuke: ResMut<NukeSequencer>, mut colony: ResMut<Colony>, config: Res<SimConfig>) {
    let Some(mut index) = nuke.next else {
        return;
    };

    while let Some(lem) = colony.get_mut(LemmingId(index as u32)) {
        index += 1;
        if lem.removed || lem.disabled {
            continue;
        }
        if try_apply_skill(SkillKind::Bomber, lem, &config) == SkillOutcome::Applied {
            tracing::debug!(target: "lemsim::nuke", id = lem.id.0, "fuse lit");
            break;
        }
    }

    nuke.next = if index < colony.len() { Some(index) } else { None };
    if nuke.next.is_none() {
        tracing::debug!(target: "lemsim::nuke", "every lemming visited");
    }
}
