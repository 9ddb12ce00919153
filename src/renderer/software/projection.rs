use crate::world::{Player, WALL_HEIGHT};

/// Horizon shift in render pixels per walk-bob step at 600 rows.
const BOB_PX: f32 = 0.6;

/// Per-frame camera constants shared by every column.
///
/// ```text
/// view    = (cols / 2) / tan(fov / 2)
/// horizon = rows / 2 + tan(tilt) · view + bob
/// top     = horizon - (H - z) · view / d⊥
/// bottom  = horizon +      z  · view / d⊥
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub cols: usize,
    pub rows: usize,
    /// Eye to projection plane, pixels.
    pub view: f32,
    pub horizon: f32,
    pub eye_z: f32,
    pub angle: f32,
}

/// Screen rows covered by one wall column, before clipping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSpan {
    pub top: f32,
    pub bottom: f32,
}

impl WallSpan {
    /// Screen rows above the wall (`hCeil`).
    #[inline]
    pub fn ceiling_rows(&self, rows: usize) -> usize {
        self.top.ceil().clamp(0.0, rows as f32) as usize
    }

    /// First screen row below the wall.
    #[inline]
    pub fn floor_start(&self, rows: usize) -> usize {
        self.bottom.ceil().clamp(0.0, rows as f32) as usize
    }
}

impl Projection {
    pub fn new(fov: f32, cols: usize, rows: usize, player: &Player) -> Self {
        let view = cols as f32 * 0.5 / (fov * 0.5).tan();
        let bob = player.bob as f32 * BOB_PX * rows as f32 / 600.0;
        Self {
            cols,
            rows,
            view,
            horizon: rows as f32 * 0.5 + player.tilt.tan() * view + bob,
            eye_z: player.z,
            angle: player.angle(),
        }
    }

    /// World angle of the ray through screen column `col`.  Columns are
    /// spaced evenly on the projection plane, not in angle.
    #[inline]
    pub fn column_angle(&self, col: usize) -> f32 {
        let offset = col as f32 - self.cols as f32 * 0.5;
        self.angle + (offset / self.view).atan()
    }

    /// Fisheye-corrected distance.
    #[inline]
    pub fn perpendicular(&self, dist: f32, ray_angle: f32) -> f32 {
        dist * (ray_angle - self.angle).cos()
    }

    pub fn wall_span(&self, perp: f32) -> WallSpan {
        let perp = perp.max(1e-4);
        let scale = self.view / perp;
        WallSpan {
            top: self.horizon - (WALL_HEIGHT - self.eye_z) * scale,
            bottom: self.horizon + self.eye_z * scale,
        }
    }

    /// Perpendicular distance of the floor seen through row `y`, or `None`
    /// at or above the horizon.
    #[inline]
    pub fn floor_perp(&self, y: usize) -> Option<f32> {
        let dy = y as f32 + 0.5 - self.horizon;
        (dy > 0.0).then(|| self.eye_z * self.view / dy)
    }

    /// Ceiling counterpart of [`floor_perp`](Self::floor_perp).
    #[inline]
    pub fn ceiling_perp(&self, y: usize) -> Option<f32> {
        let dy = self.horizon - y as f32 - 0.5;
        (dy > 0.0).then(|| (WALL_HEIGHT - self.eye_z) * self.view / dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::f32::consts::FRAC_PI_2;

    fn proj(player: &Player) -> Projection {
        Projection::new(FRAC_PI_2, 640, 480, player)
    }

    #[test]
    fn centre_column_looks_ahead() {
        let p = Player::new(Vec2::ZERO, 0.7);
        let pr = proj(&p);
        assert!((pr.view - 320.0).abs() < 1e-3);
        assert!((pr.column_angle(320) - 0.7).abs() < 1e-6);
        // edge column sits at half the field of view
        assert!((pr.column_angle(0) - (0.7 - FRAC_PI_2 * 0.5)).abs() < 1e-5);
    }

    #[test]
    fn fisheye_correction() {
        let pr = proj(&Player::new(Vec2::ZERO, 0.0));
        assert!((pr.perpendicular(2.0, 0.0) - 2.0).abs() < 1e-6);
        assert!((pr.perpendicular(2.0, FRAC_PI_2 * 0.5) - 2f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn wall_fills_view_at_half_plane_distance() {
        // eye at mid-height: a wall at d⊥ = view / rows spans the full screen
        let pr = proj(&Player::new(Vec2::ZERO, 0.0));
        let span = pr.wall_span(320.0 / 480.0);
        assert!(span.top.abs() < 1e-3);
        assert!((span.bottom - 480.0).abs() < 1e-3);
        let close = pr.wall_span(0.5);
        assert_eq!(close.ceiling_rows(480), 0);
        assert_eq!(close.floor_start(480), 480);
    }

    #[test]
    fn floor_rows_invert_wall_bottom() {
        let pr = proj(&Player::new(Vec2::ZERO, 0.0));
        let span = pr.wall_span(3.0);
        let y = span.bottom.floor() as usize;
        let back = pr.floor_perp(y).unwrap();
        assert!((back - 3.0).abs() < 0.1, "back = {back}");
        assert!(pr.floor_perp(100).is_none());
        assert!(pr.ceiling_perp(300).is_none());
    }

    #[test]
    fn looking_up_moves_horizon_down() {
        let mut p = Player::new(Vec2::ZERO, 0.0);
        let level = proj(&p).horizon;
        p.look(0.2, 0.35);
        assert!(proj(&p).horizon > level);
    }
}
