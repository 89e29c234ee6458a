//! Skills that reshape the terrain: digger, basher, miner, builder.

use super::ActionContext;
use crate::components::{ActionTag, Lemming};

const DIG_CYCLE: i32 = 16;
/// Frames between two dug rows.
const DIG_ROW_FRAMES: i32 = 8;

const BASH_CYCLE: i32 = 16;
/// First cycle frame that swings (mask frame 0).
const BASH_FIRST_SWING: i32 = 2;
const BASH_LAST_SWING: i32 = 5;
/// Frames after this one walk forward.
const BASH_WALK_AFTER: i32 = 10;
/// Distance ahead where the basher looks for remaining wall.
const BASH_LOOKAHEAD: i32 = 8;
const BASH_SPACE_NEEDED: i32 = 4;
const BASH_PROBE_HEIGHT: i32 = 6;
const BASH_MAX_DROP: i32 = 3;

const MINE_CYCLE: i32 = 24;

const BUILD_CYCLE: i32 = 16;
const BRICK_FRAME: i32 = 9;
/// Clearance the builder needs ahead of its head.
const BUILD_HEAD_PROBE: i32 = 9;

pub(super) fn digging(lem: &mut Lemming, ctx: &mut ActionContext) -> Option<ActionTag> {
    if lem.frame % DIG_ROW_FRAMES == 0 {
        let masks = ctx.masks;
        if ctx.terrain.steel_under(&masks.dig, lem.x, lem.y) {
            return Some(ActionTag::Shrug);
        }
        if !ctx.carve(&masks.dig, lem.x, lem.y) {
            return Some(ActionTag::Falling);
        }
        lem.y += 1;
    }
    lem.frame = (lem.frame + 1) % DIG_CYCLE;
    None
}

pub(super) fn bashing(lem: &mut Lemming, ctx: &mut ActionContext) -> Option<ActionTag> {
    lem.frame = (lem.frame + 1) % BASH_CYCLE;
    let dx = lem.facing.dx();

    if lem.frame > BASH_WALK_AFTER {
        lem.x += dx;
        let (x, y) = (lem.x, lem.y);
        let terrain = &*ctx.terrain;
        let drop = (0..BASH_MAX_DROP)
            .find(|&i| terrain.has_ground(x, y + i))
            .unwrap_or(BASH_MAX_DROP);
        lem.y += drop;
        if drop == BASH_MAX_DROP {
            return Some(ActionTag::Falling);
        }
    }

    if (BASH_FIRST_SWING..=BASH_LAST_SWING).contains(&lem.frame) {
        let masks = ctx.masks;
        let mask = masks.bash[(lem.frame - BASH_FIRST_SWING) as usize].get(lem.facing);
        if ctx.terrain.protected_under(mask, lem.x, lem.y, lem.facing) {
            return Some(ActionTag::Shrug);
        }
        ctx.carve(mask, lem.x, lem.y);

        if lem.frame == BASH_LAST_SWING {
            let terrain = &*ctx.terrain;
            let probe_y = lem.y - BASH_PROBE_HEIGHT;
            let space = (0..BASH_SPACE_NEEDED)
                .take_while(|i| !terrain.has_ground(lem.x + dx * (BASH_LOOKAHEAD + i), probe_y))
                .count() as i32;
            if space == BASH_SPACE_NEEDED {
                return Some(ActionTag::Walking);
            }
        }
    }
    None
}

pub(super) fn mining(lem: &mut Lemming, ctx: &mut ActionContext) -> Option<ActionTag> {
    lem.frame = (lem.frame + 1) % MINE_CYCLE;
    let dx = lem.facing.dx();

    match lem.frame {
        1 | 2 => {
            let masks = ctx.masks;
            let mask = masks.mine[(lem.frame - 1) as usize].get(lem.facing);
            if ctx.terrain.protected_under(mask, lem.x, lem.y, lem.facing) {
                return Some(ActionTag::Shrug);
            }
            ctx.carve(mask, lem.x, lem.y);
        }
        3 => {
            lem.y += 1;
            lem.x += dx;
            if !ctx.terrain.has_ground(lem.x, lem.y) {
                return Some(ActionTag::Falling);
            }
        }
        15 => {
            lem.x += dx;
            if !ctx.terrain.has_ground(lem.x, lem.y) {
                return Some(ActionTag::Falling);
            }
        }
        _ => {}
    }
    None
}

pub(super) fn building(lem: &mut Lemming, ctx: &mut ActionContext) -> Option<ActionTag> {
    lem.frame = (lem.frame + 1) % BUILD_CYCLE;

    if lem.frame == BRICK_FRAME {
        let masks = ctx.masks;
        ctx.restore(masks.brick.get(lem.facing), lem.x, lem.y);
    }

    if lem.frame == 0 {
        lem.y -= 1;
        for _ in 0..2 {
            lem.x += lem.facing.dx();
            if ctx.terrain.has_ground(lem.x, lem.y - 1) {
                lem.turn_around();
                return Some(ActionTag::Walking);
            }
        }

        lem.state += 1;
        if lem.state >= ctx.config.builder_max_steps {
            return Some(ActionTag::Shrug);
        }

        let dx = lem.facing.dx();
        if ctx.terrain.has_ground(lem.x + 2 * dx, lem.y - BUILD_HEAD_PROBE) {
            lem.turn_around();
            return Some(ActionTag::Walking);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::super::step;
    use super::super::test_support::{lemming, Harness};
    use super::*;
    use crate::components::Facing;
    use crate::events::SimEvent;
    use crate::terrain::{ArrowZone, Terrain};

    fn block(width: i32, height: i32, top: i32) -> Terrain {
        let mut terrain = Terrain::new(width as usize, height as usize);
        terrain.fill_rect(0, top, width, height - top);
        terrain
    }

    #[test]
    fn test_digger_carves_nine_pixel_rows() {
        let mut h = Harness::with_terrain(block(40, 40, 20));
        let mut lem = lemming(20, 20, Facing::Right, ActionTag::Digging);
        let before = h.terrain.ground_count();

        // Frame 0 digs the foot row straight away.
        assert_eq!(step(&mut lem, &mut h.ctx()), None);
        assert_eq!(lem.y, 21);
        assert_eq!(h.terrain.ground_count(), before - 9);
        for x in 16..=24 {
            assert!(!h.terrain.has_ground(x, 20), "x = {}", x);
        }
        assert!(h.terrain.has_ground(15, 20));
        assert!(h.terrain.has_ground(25, 20));

        // Next row only after eight more frames.
        for _ in 0..7 {
            assert_eq!(step(&mut lem, &mut h.ctx()), None);
            assert_eq!(lem.y, 21);
        }
        assert_eq!(step(&mut lem, &mut h.ctx()), None);
        assert_eq!(lem.y, 22);
        assert_eq!(h.terrain.ground_count(), before - 18);
        assert!(h
            .events
            .pending()
            .iter()
            .all(|e| matches!(e, SimEvent::TerrainChanged { width: 9, height: 1, .. })));
    }

    #[test]
    fn test_digger_falls_through_empty_row() {
        let mut terrain = Terrain::new(40, 40);
        terrain.fill_rect(0, 20, 40, 2);
        let mut h = Harness::with_terrain(terrain);
        let mut lem = lemming(20, 20, Facing::Right, ActionTag::Digging);

        assert_eq!(h.run_until_transition(&mut lem, 40), Some(ActionTag::Falling));
        assert_eq!(lem.y, 22);
        assert!(!h.terrain.has_ground(20, 21));
    }

    #[test]
    fn test_digger_shrugs_on_steel() {
        let mut terrain = block(40, 40, 20);
        terrain.set_steel_rect(24, 21, 1, 1);
        let mut h = Harness::with_terrain(terrain);
        let mut lem = lemming(20, 20, Facing::Right, ActionTag::Digging);

        assert_eq!(h.run_until_transition(&mut lem, 40), Some(ActionTag::Shrug));
        assert_eq!(lem.y, 21);
        assert!(h.terrain.has_ground(20, 21));
    }

    #[test]
    fn test_basher_tunnels_and_walks_out() {
        let mut terrain = block(60, 40, 20);
        // Wall 12 pixels thick in front of the basher.
        terrain.fill_rect(12, 0, 12, 20);
        let mut h = Harness::with_terrain(terrain);
        let mut lem = lemming(10, 20, Facing::Right, ActionTag::Bashing);

        assert_eq!(h.run_until_transition(&mut lem, 200), Some(ActionTag::Walking));
        assert_eq!(lem.y, 20);
        // Tunnel through body height, floor intact.
        for x in 12..24 {
            assert!(!h.terrain.has_ground(x, 15), "x = {}", x);
            assert!(h.terrain.has_ground(x, 20));
        }
        assert!(h.terrain.has_ground(18, 9));
    }

    #[test]
    fn test_basher_stops_at_steel() {
        let mut terrain = block(60, 40, 20);
        terrain.fill_rect(12, 0, 12, 20);
        terrain.set_steel_rect(16, 0, 4, 20);
        let mut h = Harness::with_terrain(terrain);
        let mut lem = lemming(10, 20, Facing::Right, ActionTag::Bashing);

        assert_eq!(h.run_until_transition(&mut lem, 200), Some(ActionTag::Shrug));
        assert!(h.terrain.has_ground(16, 15));
    }

    #[test]
    fn test_basher_blocked_by_opposing_arrows() {
        let mut terrain = block(60, 40, 20);
        terrain.fill_rect(12, 0, 12, 20);
        terrain.add_arrow_zone(ArrowZone { x: 12, y: 0, width: 12, height: 20, direction: Facing::Left });
        let mut h = Harness::with_terrain(terrain);
        let mut lem = lemming(10, 20, Facing::Right, ActionTag::Bashing);

        assert_eq!(h.run_until_transition(&mut lem, 10), Some(ActionTag::Shrug));
        assert!(h.terrain.has_ground(12, 15));
    }

    #[test]
    fn test_miner_descends_diagonally() {
        let mut h = Harness::with_terrain(block(80, 60, 20));
        let mut lem = lemming(20, 20, Facing::Right, ActionTag::Mining);

        for _ in 0..3 * MINE_CYCLE {
            assert_eq!(step(&mut lem, &mut h.ctx()), None);
        }
        assert_eq!((lem.x, lem.y), (26, 23));
        assert!(!h.terrain.has_ground(22, 20));
    }

    #[test]
    fn test_miner_falls_off_thin_floor() {
        let mut terrain = Terrain::new(40, 40);
        terrain.fill_rect(0, 20, 40, 1);
        let mut h = Harness::with_terrain(terrain);
        let mut lem = lemming(10, 20, Facing::Right, ActionTag::Mining);
        assert_eq!(h.run_until_transition(&mut lem, 30), Some(ActionTag::Falling));
        assert_eq!((lem.x, lem.y), (11, 21));
    }

    #[test]
    fn test_basher_falls_off_ledge() {
        let mut terrain = Terrain::new(60, 40);
        terrain.fill_rect(0, 20, 14, 20);
        // Wall ahead with nothing underneath it.
        terrain.fill_rect(20, 0, 10, 20);
        let mut h = Harness::with_terrain(terrain);
        let mut lem = lemming(12, 20, Facing::Right, ActionTag::Bashing);

        assert_eq!(h.run_until_transition(&mut lem, 40), Some(ActionTag::Falling));
        assert_eq!((lem.x, lem.y), (14, 23));
        assert_eq!(lem.frame, 12);
    }

    #[test]
    fn test_miner_shrugs_on_steel() {
        let mut terrain = block(80, 60, 20);
        terrain.set_steel_rect(22, 20, 3, 3);
        let mut h = Harness::with_terrain(terrain);
        let mut lem = lemming(20, 20, Facing::Right, ActionTag::Mining);
        let before = h.terrain.ground_count();

        assert_eq!(step(&mut lem, &mut h.ctx()), Some(ActionTag::Shrug));
        assert_eq!(h.terrain.ground_count(), before);
        assert!(h.terrain.has_ground(21, 20));
    }

    #[test]
    fn test_miner_blocked_by_opposing_arrows() {
        let mut terrain = block(80, 60, 20);
        terrain.add_arrow_zone(ArrowZone { x: 20, y: 0, width: 20, height: 40, direction: Facing::Left });
        let mut h = Harness::with_terrain(terrain);
        let mut lem = lemming(20, 20, Facing::Right, ActionTag::Mining);

        assert_eq!(step(&mut lem, &mut h.ctx()), Some(ActionTag::Shrug));
        assert!(h.terrain.has_ground(22, 20));

        // Mining with the arrows is allowed.
        let mut lem = lemming(40, 20, Facing::Left, ActionTag::Mining);
        assert_eq!(step(&mut lem, &mut h.ctx()), None);
        assert!(!h.terrain.has_ground(38, 20));
    }

    #[test]
    fn test_builder_lays_staircase_then_shrugs() {
        let mut h = Harness::with_terrain(block(100, 60, 50));
        let mut lem = lemming(10, 50, Facing::Right, ActionTag::Building);
        let before = h.terrain.ground_count();

        assert_eq!(h.run_until_transition(&mut lem, 400), Some(ActionTag::Shrug));
        let steps = h.config.builder_max_steps;
        assert_eq!(lem.state, steps);
        assert_eq!(lem.y, 50 - steps);
        assert_eq!(lem.x, 10 + 2 * steps);
        assert!(h.terrain.ground_count() > before);
        // First brick sits on top of the floor.
        assert!(h.terrain.has_ground(10, 49));
        assert!(h.terrain.has_ground(15, 49));
        // The lemming stands on its last brick.
        assert!(h.terrain.has_ground(lem.x, lem.y));
    }

    #[test]
    fn test_builder_turns_at_wall() {
        let mut terrain = block(60, 60, 50);
        terrain.fill_rect(16, 0, 4, 50);
        let mut h = Harness::with_terrain(terrain);
        let mut lem = lemming(10, 50, Facing::Right, ActionTag::Building);

        assert_eq!(h.run_until_transition(&mut lem, 100), Some(ActionTag::Walking));
        assert_eq!(lem.facing, Facing::Left);
    }
}
