//! Per-lemming update: bounds, action program, triggers, and the fuse.
//!
//! Lemmings are visited in slot order once per tick. Every action change,
//! whether it comes from a program, a trigger, the fuse, or a skill, goes
//! through `apply_transition` so the side effects live in one place.

use crate::actions::{self, step_countdown, try_apply_skill, ActionContext, ActionRegistry, SkillOutcome};
use crate::colony::Colony;
use crate::components::{ActionTag, Facing, Lemming, SkillKind};
use crate::config::{SimConfig, SimTick};
use crate::events::{SimEvent, SimEvents};
use crate::masks::MaskSet;
use crate::progress::LevelProgress;
use crate::spatial::{TriggerIndex, TriggerKind};
use crate::terrain::Terrain;
use bevy_ecs::prelude::*;

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Switch a lemming to `next`, running the entry side effects.
///
/// `OutOfLevel`, and any tag without a registered program, removes the
/// lemming instead.
pub fn apply_transition(
    lem: &mut Lemming,
    next: ActionTag,
    ctx: &mut ActionContext,
    progress: &mut LevelProgress,
    registry: &ActionRegistry,
) {
    if lem.removed {
        return;
    }
    if next == ActionTag::OutOfLevel {
        remove_lemming(lem, ctx, progress);
        return;
    }
    if !registry.is_registered(next) {
        tracing::warn!(
            target: "lemsim::actions",
            id = lem.id.0,
            from = lem.action.name(),
            to = next.name(),
            "no program for action, removing lemming"
        );
        remove_lemming(lem, ctx, progress);
        return;
    }

    // Blocker walls survive into OhNo and go with the explosion.
    if lem.action == ActionTag::Blocking && !matches!(next, ActionTag::Blocking | ActionTag::OhNo) {
        ctx.triggers.remove_by_owner(lem.id);
    }
    if next.is_lethal() {
        lem.cancel_countdown();
    }
    if next.disables() {
        lem.disabled = true;
    }

    tracing::trace!(
        target: "lemsim::actions",
        id = lem.id.0,
        from = lem.action.name(),
        to = next.name(),
        "transition"
    );
    lem.set_action(next);
}

/// Take a lemming out of the level and settle its score.
fn remove_lemming(lem: &mut Lemming, ctx: &mut ActionContext, progress: &mut LevelProgress) {
    ctx.triggers.remove_by_owner(lem.id);

    if lem.action == ActionTag::Exiting {
        progress.add_survivor();
        ctx.events.push(SimEvent::Saved { id: lem.id });
        tracing::debug!(target: "lemsim::lemmings", id = lem.id.0, "saved");
    } else {
        progress.add_lost();
        if !lem.has_exploded {
            ctx.events.push(SimEvent::Died { id: lem.id, x: lem.x, y: lem.y });
        }
        tracing::debug!(
            target: "lemsim::lemmings",
            id = lem.id.0,
            action = lem.action.name(),
            "lost"
        );
    }
    progress.lemming_removed();
    ctx.events.push(SimEvent::Removed { id: lem.id });

    lem.cancel_countdown();
    lem.removed = true;
    lem.disabled = true;
    lem.set_action(ActionTag::OutOfLevel);
}

// ============================================================================
// PER-TICK UPDATE
// ============================================================================

/// Whether the lemming has left the playable area: off either side, or
/// more than the configured margin below the bottom edge.
pub fn is_out_of_level(lem: &Lemming, terrain: &Terrain, config: &SimConfig) -> bool {
    lem.x < 0 || lem.x >= terrain.width() || lem.y >= terrain.height() + config.out_of_level_margin
}

/// How a lemming reacts to standing in a trigger region.
///
/// Blocker walls only turn the lemming around; they never change its action,
/// and another blocker is never turned.
pub fn trigger_response(lem: &mut Lemming, kind: TriggerKind) -> Option<ActionTag> {
    match kind {
        TriggerKind::Exit => Some(ActionTag::Exiting),
        TriggerKind::Drown => Some(ActionTag::Drowning),
        TriggerKind::Fry => Some(ActionTag::Frying),
        TriggerKind::Trap => Some(ActionTag::OutOfLevel),
        TriggerKind::BlockerLeft => {
            if lem.facing == Facing::Right && lem.action != ActionTag::Blocking {
                lem.turn_around();
            }
            None
        }
        TriggerKind::BlockerRight => {
            if lem.facing == Facing::Left && lem.action != ActionTag::Blocking {
                lem.turn_around();
            }
            None
        }
    }
}

/// Advance one lemming by one tick.
pub fn update_lemming(
    lem: &mut Lemming,
    ctx: &mut ActionContext,
    progress: &mut LevelProgress,
    registry: &ActionRegistry,
) {
    if lem.removed {
        return;
    }
    if is_out_of_level(lem, ctx.terrain, ctx.config) {
        apply_transition(lem, ActionTag::OutOfLevel, ctx, progress, registry);
        return;
    }
    if !registry.is_registered(lem.action) {
        tracing::warn!(
            target: "lemsim::actions",
            id = lem.id.0,
            action = lem.action.name(),
            "current action has no program, removing lemming"
        );
        remove_lemming(lem, ctx, progress);
        return;
    }

    if let Some(next) = actions::step(lem, ctx) {
        apply_transition(lem, next, ctx, progress, registry);
    }
    if lem.removed || lem.disabled {
        return;
    }

    if let Some(kind) = ctx.triggers.query(lem.x, lem.y, ctx.tick) {
        if let Some(next) = trigger_response(lem, kind) {
            apply_transition(lem, next, ctx, progress, registry);
        }
    }
    if lem.removed || lem.disabled {
        return;
    }

    if let Some(next) = step_countdown(lem) {
        apply_transition(lem, next, ctx, progress, registry);
    }
}

/// System that runs every live lemming through one tick, in slot order.
#[allow(clippy::too_many_arguments)]
pub fn lemming_step_system(
    mut colony: ResMut<Colony>,
    mut terrain: ResMut<Terrain>,
    mut triggers: ResMut<TriggerIndex>,
    mut events: ResMut<SimEvents>,
    mut progress: ResMut<LevelProgress>,
    masks: Res<MaskSet>,
    config: Res<SimConfig>,
    registry: Res<ActionRegistry>,
    tick: Res<SimTick>,
) {
    let mut ctx = ActionContext {
        terrain: &mut *terrain,
        triggers: &mut *triggers,
        masks: &*masks,
        config: &*config,
        events: &mut *events,
        tick: tick.0,
    };
    for lem in colony.iter_mut() {
        update_lemming(lem, &mut ctx, &mut progress, &registry);
    }
}

// ============================================================================
// SKILL ASSIGNMENT
// ============================================================================

/// Hand `skill` to a lemming. Returns `true` if the skill was used.
///
/// Rejected for removed or disabled lemmings, for ground skills while
/// falling, for repeating the skill the lemming is already doing, and for
/// skills whose action has no program.
pub fn assign_skill(
    lem: &mut Lemming,
    skill: SkillKind,
    ctx: &mut ActionContext,
    progress: &mut LevelProgress,
    registry: &ActionRegistry,
) -> bool {
    if lem.removed || lem.disabled {
        return false;
    }
    if lem.action == ActionTag::Falling && !skill.allowed_while_falling() {
        return false;
    }
    if let Some(target) = skill.action() {
        let redundant = target == lem.action
            && matches!(
                skill,
                SkillKind::Basher | SkillKind::Blocker | SkillKind::Digger | SkillKind::Miner
            );
        if redundant || !registry.is_registered(target) {
            return false;
        }
    }

    let applied = match try_apply_skill(skill, lem, ctx.config) {
        SkillOutcome::Rejected => false,
        SkillOutcome::Applied => true,
        SkillOutcome::Transition(next) => {
            apply_transition(lem, next, ctx, progress, registry);
            true
        }
    };
    if applied {
        tracing::debug!(target: "lemsim::skills", id = lem.id.0, skill = ?skill, "skill assigned");
    }
    applied
}
