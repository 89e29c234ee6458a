//! Blocker: stands still and turns other walkers around.

use super::ActionContext;
use crate::components::{ActionTag, Lemming};
use crate::spatial::{TriggerKind, TriggerRegion};

/// Vertical extent of a blocker wall, from `y - 10` to `y + 4`.
pub const BLOCKER_WALL_HEIGHT: i32 = 14;

/// The two owned regions flanking a blocker standing at `(x, y)`.
pub fn blocker_walls(lem: &Lemming) -> [TriggerRegion; 2] {
    let (x, y) = (lem.x, lem.y);
    let top = y - 10;
    let bottom = top + BLOCKER_WALL_HEIGHT;
    [
        TriggerRegion::new(x - 6, top, x - 3, bottom, TriggerKind::BlockerLeft).owned_by(lem.id),
        TriggerRegion::new(x + 4, top, x + 7, bottom, TriggerKind::BlockerRight).owned_by(lem.id),
    ]
}

pub(super) fn blocking(lem: &mut Lemming, ctx: &mut ActionContext) -> Option<ActionTag> {
    lem.frame = (lem.frame + 1) % 16;
    if lem.state == 0 {
        ctx.triggers.add_range(blocker_walls(lem));
        lem.state = 1;
    }

    if !ctx.terrain.has_ground(lem.x, lem.y) {
        ctx.triggers.remove_by_owner(lem.id);
        return Some(ActionTag::Falling);
    }
    None
}
