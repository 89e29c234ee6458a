//! Per-program skill acceptance.

use crate::components::{ActionTag, Lemming, SkillKind};
use crate::config::SimConfig;

/// Result of offering a skill to a lemming's program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillOutcome {
    /// Not applicable; the skill point is kept.
    Rejected,
    /// Took effect on the lemming's flags.
    Applied,
    /// Accepted; the primary action must switch to this tag.
    Transition(ActionTag),
}

/// Offer `skill` to the lemming. Flag skills take effect here; action skills
/// are returned as a transition for the orchestrator to apply.
pub fn try_apply_skill(skill: SkillKind, lem: &mut Lemming, config: &SimConfig) -> SkillOutcome {
    match skill {
        SkillKind::Climber => {
            if lem.can_climb {
                return SkillOutcome::Rejected;
            }
            lem.can_climb = true;
            SkillOutcome::Applied
        }
        SkillKind::Floater => {
            if lem.has_parachute {
                return SkillOutcome::Rejected;
            }
            lem.has_parachute = true;
            SkillOutcome::Applied
        }
        SkillKind::Bomber => {
            if lem.has_countdown() {
                return SkillOutcome::Rejected;
            }
            lem.arm_countdown(config.countdown_ticks);
            SkillOutcome::Applied
        }
        SkillKind::Blocker
        | SkillKind::Builder
        | SkillKind::Basher
        | SkillKind::Miner
        | SkillKind::Digger => match skill.action() {
            Some(tag) => SkillOutcome::Transition(tag),
            None => SkillOutcome::Rejected,
        },
    }
}
