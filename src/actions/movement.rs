//! Walking, falling, and the climbing family.

use super::ActionContext;
use crate::components::{ActionTag, Lemming};

/// Wall height that stops a walker.
const WALL_HEIGHT: i32 = 8;
/// Highest step a walker takes without jumping.
const MAX_STEP_UP: i32 = 3;
/// Drop at which a walker starts falling.
const MAX_STEP_DOWN: i32 = 4;
const FALL_SPEED: i32 = 3;
const JUMP_SPEED: i32 = 2;
/// Pixels from the foot to the top of the head.
pub(super) const BODY_HEIGHT: i32 = 10;
const CLIMB_CYCLE: i32 = 8;
/// Wall probe height while climbing.
const CLIMB_REACH: i32 = 7;
const HOIST_FRAMES: i32 = 8;
/// Parachute descent per frame; the last entry repeats.
const FLOAT_SPEED: [i32; 16] = [3, 3, 3, 3, -1, 0, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2];

pub(super) fn walking(lem: &mut Lemming, ctx: &mut ActionContext) -> Option<ActionTag> {
    lem.frame = (lem.frame + 1) % 8;
    let terrain = &*ctx.terrain;
    let old_x = lem.x;
    lem.x += lem.facing.dx();
    let (x, y) = (lem.x, lem.y);

    let up = (0..WALL_HEIGHT)
        .find(|&i| !terrain.has_ground(x, y - i))
        .unwrap_or(WALL_HEIGHT);

    if up == WALL_HEIGHT {
        lem.x = old_x;
        if lem.can_climb {
            return Some(ActionTag::Climbing);
        }
        lem.turn_around();
        return None;
    }
    if up > MAX_STEP_UP {
        return Some(ActionTag::Jumping);
    }
    if up > 0 {
        lem.y -= up - 1;
        return None;
    }

    let down = (1..MAX_STEP_DOWN)
        .find(|&i| terrain.has_ground(x, y + i))
        .unwrap_or(MAX_STEP_DOWN);
    lem.y += down;
    if down == MAX_STEP_DOWN {
        Some(ActionTag::Falling)
    } else {
        None
    }
}

pub(super) fn falling(lem: &mut Lemming, ctx: &mut ActionContext) -> Option<ActionTag> {
    lem.frame = (lem.frame + 1) % 4;
    if lem.has_parachute && lem.state > ctx.config.parachute_open_height {
        return Some(ActionTag::Floating);
    }

    let terrain = &*ctx.terrain;
    let (x, y) = (lem.x, lem.y);
    match (0..FALL_SPEED).find(|&i| terrain.has_ground(x, y + i)) {
        None => {
            lem.y += FALL_SPEED;
            lem.state += FALL_SPEED;
            None
        }
        Some(gap) => {
            lem.y += gap;
            if lem.state > ctx.config.max_safe_fall {
                Some(ActionTag::Splatting)
            } else {
                Some(ActionTag::Walking)
            }
        }
    }
}

pub(super) fn jumping(lem: &mut Lemming, ctx: &mut ActionContext) -> Option<ActionTag> {
    let terrain = &*ctx.terrain;
    for _ in 0..JUMP_SPEED {
        if !terrain.has_ground(lem.x, lem.y - 1) {
            break;
        }
        lem.y -= 1;
    }
    if terrain.has_ground(lem.x, lem.y - 1) {
        None
    } else {
        Some(ActionTag::Walking)
    }
}

pub(super) fn climbing(lem: &mut Lemming, ctx: &mut ActionContext) -> Option<ActionTag> {
    lem.frame = (lem.frame + 1) % CLIMB_CYCLE;
    let terrain = &*ctx.terrain;

    // Ceiling: let go and drop away from the wall.
    if terrain.has_ground(lem.x, lem.y - BODY_HEIGHT) {
        lem.turn_around();
        lem.x += lem.facing.dx();
        return Some(ActionTag::Falling);
    }

    if lem.frame >= CLIMB_CYCLE / 2 {
        lem.y -= 1;
    }

    if !terrain.has_ground(lem.x + lem.facing.dx(), lem.y - CLIMB_REACH) {
        Some(ActionTag::Hoisting)
    } else {
        None
    }
}

pub(super) fn hoisting(lem: &mut Lemming) -> Option<ActionTag> {
    lem.frame += 1;
    if lem.frame <= HOIST_FRAMES / 2 {
        lem.y -= 2;
    }
    if lem.frame >= HOIST_FRAMES {
        Some(ActionTag::Walking)
    } else {
        None
    }
}

pub(super) fn floating(lem: &mut Lemming, ctx: &mut ActionContext) -> Option<ActionTag> {
    let last = FLOAT_SPEED.len() - 1;
    let speed = FLOAT_SPEED[(lem.frame.max(0) as usize).min(last)];
    lem.frame = (lem.frame + 1).min(last as i32);

    let terrain = &*ctx.terrain;
    if speed < 0 {
        lem.y += speed;
        return None;
    }
    for _ in 0..speed {
        if terrain.has_ground(lem.x, lem.y) {
            return Some(ActionTag::Walking);
        }
        lem.y += 1;
    }
    if terrain.has_ground(lem.x, lem.y) {
        Some(ActionTag::Walking)
    } else {
        None
    }
}
