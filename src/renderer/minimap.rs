//! Heading-up radar in the bottom-right corner of the display.
//!
//! The grid around the player is rendered into a small square buffer with a
//! plain affine tile → pixel mapping, masked to a circle, and then stamped
//! onto the display rotated by `-(π/2 + angle)` so the facing direction
//! always points up.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;

use crate::config::MinimapConfig;
use crate::renderer::Rgba;
use crate::world::{Level, Player, TileKind, alpha};

const WALL: Rgba = 0xFFFF_FFFF;
const TELEPORTER: Rgba = 0xFFFF_0000;
const DOOR: Rgba = 0xFF00_00FF;
const FREE: Rgba = 0xFFA9_A9A9;
const OUTSIDE: Rgba = 0xFFFF_FFFF;
const CARET: Rgba = 0xFF00_FFFF;
const BORDER: Rgba = 0xFF00_0000;
const MASKED: Rgba = 0x0000_0000;

/// Headings are snapped to this many steps per turn, so `a` and `a + 2π`
/// produce the same pixels.
const HEADING_STEPS: f32 = 1024.0;

#[inline]
fn heading(angle: f32) -> f32 {
    let step = ((angle / TAU).rem_euclid(1.0) * HEADING_STEPS).round() % HEADING_STEPS;
    step / HEADING_STEPS * TAU
}

fn tile_colour(kind: Option<TileKind>) -> Rgba {
    match kind {
        None => OUTSIDE,
        Some(TileKind::Wall | TileKind::WallDiagonal | TileKind::WorldObject) => WALL,
        Some(TileKind::Teleporter) => TELEPORTER,
        Some(TileKind::VerticalDoor | TileKind::HorizontalDoor) => DOOR,
        Some(TileKind::Free) => FREE,
    }
}

/// Signed double area of `(a, b, p)`.
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}

pub struct Minimap {
    cfg: MinimapConfig,
    /// Side of the square buffer, `2 · R · tile_size`.
    size: usize,
    buf: Vec<Rgba>,
}

impl Minimap {
    pub fn new(cfg: MinimapConfig) -> Self {
        let size = 2 * cfg.radius as usize * cfg.tile_size as usize;
        Self {
            cfg,
            size,
            buf: vec![MASKED; size * size],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.buf
    }

    /// Radius of the visible disc in display pixels.
    #[inline]
    fn disc(&self) -> f32 {
        (self.cfg.radius * self.cfg.tile_size) as f32
    }

    /// Redraw the buffer around `player`, heading not yet applied.
    pub fn render(&mut self, level: &Level, player: &Player) {
        if self.size == 0 {
            return;
        }
        let ts = self.cfg.tile_size as usize;
        let r = self.cfg.radius as i32;
        let (px, py) = player.tile();
        let centre = Vec2::splat(self.disc());
        let disc2 = self.disc() * self.disc();

        for y in 0..self.size {
            let row = py - r + (y / ts) as i32;
            for x in 0..self.size {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                self.buf[y * self.size + x] = if p.distance_squared(centre) > disc2 {
                    MASKED
                } else {
                    let col = px - r + (x / ts) as i32;
                    tile_colour(level.grid.kind(col, row))
                };
            }
        }

        self.draw_caret(heading(player.angle()));
    }

    /// Arrowhead on the player's tile pointing along `angle`.
    fn draw_caret(&mut self, angle: f32) {
        let ts = self.cfg.tile_size as f32;
        let c = Vec2::splat((self.cfg.radius as f32 + 0.5) * ts);
        let at = |a: f32| c + Vec2::from_angle(a) * 2.0 * ts;
        let tip = at(angle);
        let left = at(angle + TAU * 2.0 / 3.0);
        let right = at(angle + TAU * 2.0 / 3.0 * 2.0);
        // notch at the centroid
        let notch = (tip + left + right) / 3.0;

        self.fill_triangle(right, tip, notch);
        self.fill_triangle(tip, left, notch);
    }

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2) {
        let lo = a.min(b).min(c).floor().max(Vec2::ZERO);
        let hi = a.max(b).max(c).ceil().min(Vec2::splat(self.size as f32));
        let area = edge(a, b, c);
        if area == 0.0 {
            return;
        }
        for y in lo.y as usize..hi.y as usize {
            for x in lo.x as usize..hi.x as usize {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w = [edge(b, c, p), edge(c, a, p), edge(a, b, p)];
                if w.iter().all(|&e| e * area >= 0.0) {
                    self.buf[y * self.size + x] = CARET;
                }
            }
        }
    }

    /// Composite onto a `dw × dh` display: black ring first, then the
    /// buffer rotated so `angle` points up.  Masked texels are skipped.
    pub fn stamp(&self, display: &mut [Rgba], dw: usize, dh: usize, angle: f32) {
        if self.size == 0 || display.len() < dw * dh {
            return;
        }
        let disc = self.disc();
        let ring = disc + self.cfg.tile_size as f32;
        let reach = disc as i32 + self.cfg.margin as i32;
        let cx = dw as i32 - reach;
        let cy = dh as i32 - reach;

        let phi = -(FRAC_PI_2 + heading(angle));
        let (sin, cos) = phi.sin_cos();
        let r = ring.ceil() as i32;

        for y in (cy - r).max(0)..(cy + r).min(dh as i32) {
            for x in (cx - r).max(0)..(cx + r).min(dw as i32) {
                let d = Vec2::new((x - cx) as f32 + 0.5, (y - cy) as f32 + 0.5);
                let d2 = d.length_squared();
                if d2 > ring * ring {
                    continue;
                }
                let out = &mut display[y as usize * dw + x as usize];
                *out = BORDER;

                // inverse rotation back into buffer space
                let b = Vec2::new(d.x * cos + d.y * sin, -d.x * sin + d.y * cos) + disc;
                if b.x < 0.0 || b.y < 0.0 {
                    continue;
                }
                let (sx, sy) = (b.x as usize, b.y as usize);
                if sx >= self.size || sy >= self.size {
                    continue;
                }
                let texel = self.buf[sy * self.size + sx];
                if alpha(texel) != 0 {
                    *out = texel;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::ascii::{self, TileTextures};

    const ROOM: &str = "\
#######
#.....#
#.....#
#..@..#
#.....#
#.....#
#######
";

    const CFG: MinimapConfig = MinimapConfig {
        radius: 4,
        tile_size: 2,
        margin: 2,
    };
    const BG: Rgba = 0x1234_5678;

    fn level() -> Level {
        ascii::parse(ROOM, &TileTextures::default()).unwrap()
    }

    fn stamped(angle: f32) -> Vec<Rgba> {
        let level = level();
        let mut player = level.spawn;
        player.set_angle(angle);
        let mut map = Minimap::new(CFG);
        map.render(&level, &player);
        let mut display = vec![BG; 40 * 40];
        map.stamp(&mut display, 40, 40, angle);
        display
    }

    #[test]
    fn full_turn_is_pixel_identical() {
        assert_eq!(stamped(0.0), stamped(TAU));
        assert_eq!(stamped(1.0), stamped(1.0 + TAU));
    }

    #[test]
    fn buffer_is_masked_to_a_circle() {
        let level = level();
        let mut map = Minimap::new(CFG);
        map.render(&level, &level.spawn);
        assert_eq!(map.size(), 16);
        assert_eq!(map.pixels()[0], MASKED);
        assert_eq!(map.pixels()[15], MASKED);
        // straight left of the player: x = 0 wall, two tiles further out of bounds
        assert_eq!(map.pixels()[8 * 16 + 2], WALL);
        assert_eq!(map.pixels()[8 * 16 + 4], FREE);
    }

    #[test]
    fn caret_sits_on_the_player() {
        let level = level();
        let mut map = Minimap::new(CFG);
        map.render(&level, &level.spawn);
        assert_eq!(map.pixels()[9 * 16 + 9], CARET);
    }

    #[test]
    fn heading_points_up() {
        // display centre at (30, 30)
        let at = |fb: &[Rgba], x: usize, y: usize| fb[y * 40 + x];

        // facing east: the east wall is 2.5 tiles ahead
        let east = stamped(0.0);
        assert_eq!(at(&east, 30, 23), WALL);
        assert_eq!(at(&east, 30, 33), FREE);

        // facing west: the floor behind is still free
        let west = stamped(std::f32::consts::PI);
        assert_eq!(at(&west, 30, 33), FREE);
    }

    #[test]
    fn outside_the_ring_is_untouched() {
        let fb = stamped(0.3);
        assert_eq!(fb[0], BG);
        assert_eq!(fb[39], BG);
        // between the disc and the ring
        assert_eq!(fb[30 * 40 + 39], BORDER);
    }
}
