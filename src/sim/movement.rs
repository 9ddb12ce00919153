use glam::Vec2;
use log::debug;

use super::input::Actions;
use crate::config::Config;
use crate::world::{Level, Player, TileKind};

/// Peak walk-bob index either side of rest.
pub const BOB_APEX: i32 = 10;

/// Triangle-wave bob driven by whether the player moved this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkBob {
    index: i32,
    falling: bool,
}

impl WalkBob {
    #[inline]
    pub fn index(&self) -> i32 {
        self.index
    }

    pub fn advance(&mut self, moved: bool) {
        if !moved {
            *self = Self::default();
            return;
        }
        if self.index >= BOB_APEX {
            self.falling = true;
        } else if self.index <= -BOB_APEX {
            self.falling = false;
        }
        self.index += if self.falling { -1 } else { 1 };
    }
}

/// True if a point-sized player may not stand at `p`.
///
/// Leaving the grid counts as blocked.  Doors use the same coverage test the
/// ray caster uses, so what you see is what stops you.
pub fn blocked(level: &Level, p: Vec2) -> bool {
    let Some(tile) = level.grid.tile_at(p) else {
        return true;
    };
    match tile.kind {
        TileKind::Wall | TileKind::WorldObject => true,
        TileKind::WallDiagonal => tile.diagonal.is_solid(p.x - p.x.floor(), p.y - p.y.floor()),
        TileKind::VerticalDoor | TileKind::HorizontalDoor => level
            .doors
            .get(p.x.floor() as i32, p.y.floor() as i32)
            .is_none_or(|d| d.blocks_point(p)),
        TileKind::Free | TileKind::Teleporter => false,
    }
}

/// Axis-separated sliding: X is tried first, then Y from wherever X left
/// the player.  A blocked axis is dropped for this tick.
pub fn slide(level: &Level, from: Vec2, delta: Vec2) -> Vec2 {
    let mut at = from;
    let x = Vec2::new(from.x + delta.x, at.y);
    if delta.x != 0.0 && !blocked(level, x) {
        at = x;
    }
    let y = Vec2::new(at.x, from.y + delta.y);
    if delta.y != 0.0 && !blocked(level, y) {
        at = y;
    }
    at
}

/// Turn, look, raise and translate the player for one tick.
/// Returns whether the position changed.
pub fn apply(player: &mut Player, actions: Actions, cfg: &Config, level: &Level) -> bool {
    player.turn(actions.axis(Actions::TURN_RIGHT, Actions::TURN_LEFT) * cfg.turn_rate);
    player.look(
        actions.axis(Actions::LOOK_UP, Actions::LOOK_DOWN) * cfg.tilt_step,
        cfg.max_head_tilt,
    );
    let lift = actions.axis(Actions::RAISE, Actions::LOWER);
    if lift != 0.0 {
        player.raise(lift * cfg.eye_step);
    }

    let forward = actions.axis(Actions::FORWARD, Actions::BACK) * cfg.step_size;
    let side = actions.axis(Actions::STRAFE_RIGHT, Actions::STRAFE_LEFT) * cfg.step_size;
    if forward == 0.0 && side == 0.0 {
        return false;
    }
    let target = slide(level, player.pos, player.step_vector(forward, side));
    let moved = target != player.pos;
    player.pos = target;
    moved
}

/// Relocate the player if they stand on a linked teleporter.
pub fn teleport(player: &mut Player, level: &Level) -> bool {
    let (x, y) = player.tile();
    if level.grid.kind(x, y) != Some(TileKind::Teleporter) {
        return false;
    }
    let Some(link) = level.teleports.get(x, y) else {
        return false;
    };
    debug!("teleport ({x}, {y}) -> {}", link.to);
    player.pos = link.to;
    player.set_angle(link.angle);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::ascii::{self, TileTextures};
    use crate::world::{CLOSED, OPEN};

    const ROOM: &str = "\
#######
#@....#
#..V..#
#1...P#
#######

teleport 5 3 1.5 1.5 90
";

    fn level() -> Level {
        ascii::parse(ROOM, &TileTextures::default()).unwrap()
    }

    #[test]
    fn walls_and_outside_block() {
        let l = level();
        assert!(blocked(&l, Vec2::new(0.5, 0.5)));
        assert!(blocked(&l, Vec2::new(-0.1, 1.5)));
        assert!(blocked(&l, Vec2::new(1.5, 9.0)));
        assert!(!blocked(&l, Vec2::new(2.5, 1.5)));
    }

    #[test]
    fn diagonal_blocks_only_its_solid_half() {
        let l = level();
        // tile (1,3) is solid north-east
        assert!(blocked(&l, Vec2::new(1.8, 3.2)));
        assert!(!blocked(&l, Vec2::new(1.2, 3.8)));
    }

    #[test]
    fn door_blocking_follows_openness() {
        let mut l = level();
        let p = Vec2::new(3.5, 2.5);
        assert!(blocked(&l, p));
        l.doors.get_mut(3, 2).unwrap().set_openness(OPEN);
        assert!(!blocked(&l, p));
        l.doors.get_mut(3, 2).unwrap().set_openness(CLOSED / 2);
        assert!(blocked(&l, Vec2::new(3.5, 2.2)));
        assert!(!blocked(&l, Vec2::new(3.5, 2.7)));
    }

    #[test]
    fn slides_along_a_wall() {
        let l = level();
        // pushing north-east into the top wall keeps the eastward part
        let to = slide(&l, Vec2::new(2.5, 1.1), Vec2::new(0.3, -0.3));
        assert!((to - Vec2::new(2.8, 1.1)).length() < 1e-5);
    }

    #[test]
    fn out_of_grid_cancels_only_that_axis() {
        let tiles = "...\n.@.\n...\n";
        let l = ascii::parse(tiles, &TileTextures::default()).unwrap();
        let to = slide(&l, Vec2::new(1.5, 0.2), Vec2::new(0.4, -0.5));
        assert!((to - Vec2::new(1.9, 0.2)).length() < 1e-5);
    }

    #[test]
    fn forward_moves_along_heading() {
        let l = level();
        let cfg = Config::default();
        let mut p = l.spawn;
        assert!(apply(&mut p, Actions::FORWARD, &cfg, &l));
        assert!((p.pos - Vec2::new(1.5 + cfg.step_size, 1.5)).length() < 1e-5);

        // facing east, right is south
        assert!(apply(&mut p, Actions::STRAFE_RIGHT, &cfg, &l));
        assert!((p.pos.y - (1.5 + cfg.step_size)).abs() < 1e-5);

        // into the north-west corner: both axes blocked
        let mut stuck = Player::new(Vec2::new(1.1, 1.1), 1.25 * std::f32::consts::PI);
        assert!(!apply(&mut stuck, Actions::FORWARD, &cfg, &l));
    }

    #[test]
    fn teleporter_relocates() {
        let l = level();
        let mut p = Player::new(Vec2::new(5.5, 3.5), 0.0);
        assert!(teleport(&mut p, &l));
        assert_eq!(p.pos, Vec2::new(1.5, 1.5));
        assert!((p.angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!(!teleport(&mut p, &l));
    }

    #[test]
    fn bob_oscillates_within_apex() {
        let mut b = WalkBob::default();
        let mut peak = 0;
        let mut trough = 0;
        for _ in 0..200 {
            b.advance(true);
            peak = peak.max(b.index());
            trough = trough.min(b.index());
        }
        assert_eq!((peak, trough), (BOB_APEX, -BOB_APEX));
        b.advance(false);
        assert_eq!(b.index(), 0);
    }
}
