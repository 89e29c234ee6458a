//! Actions that end a lemming's run, plus the harmless shrug.

use super::ActionContext;
use crate::components::{ActionTag, Lemming};
use crate::events::SimEvent;

pub(super) const DROWNING_FRAMES: i32 = 16;
pub(super) const FRYING_FRAMES: i32 = 14;
pub(super) const SPLATTING_FRAMES: i32 = 16;
pub(super) const EXITING_FRAMES: i32 = 8;
const OHNO_FRAMES: i32 = 16;
const OHNO_FALL_SPEED: i32 = 3;
/// Frame the explosion carves the terrain.
const EXPLODE_FRAME: i32 = 1;
const EXPLODING_FRAMES: i32 = 52;
const SHRUG_FRAMES: i32 = 8;

/// Play out a fixed-length animation, then leave the level.
pub(super) fn dying(lem: &mut Lemming, frames: i32) -> Option<ActionTag> {
    lem.frame += 1;
    if lem.frame >= frames {
        Some(ActionTag::OutOfLevel)
    } else {
        None
    }
}

pub(super) fn oh_no(lem: &mut Lemming, ctx: &mut ActionContext) -> Option<ActionTag> {
    lem.frame += 1;
    if lem.frame >= OHNO_FRAMES {
        return Some(ActionTag::Exploding);
    }
    for _ in 0..OHNO_FALL_SPEED {
        if ctx.terrain.has_ground(lem.x, lem.y) {
            break;
        }
        lem.y += 1;
    }
    None
}

pub(super) fn exploding(lem: &mut Lemming, ctx: &mut ActionContext) -> Option<ActionTag> {
    lem.frame += 1;
    if lem.frame == EXPLODE_FRAME {
        ctx.triggers.remove_by_owner(lem.id);
        ctx.events.push(SimEvent::Died { id: lem.id, x: lem.x, y: lem.y });
        lem.has_exploded = true;
        let masks = ctx.masks;
        ctx.carve(&masks.explode, lem.x, lem.y);
    }
    if lem.frame >= EXPLODING_FRAMES {
        Some(ActionTag::OutOfLevel)
    } else {
        None
    }
}

pub(super) fn shrug(lem: &mut Lemming) -> Option<ActionTag> {
    lem.frame += 1;
    if lem.frame >= SHRUG_FRAMES {
        Some(ActionTag::Walking)
    } else {
        None
    }
}
