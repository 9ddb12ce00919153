//! Floor, ceiling and sky, one screen column at a time.
//!
//! Each row outside the wall strip is inverse-projected to a distance along
//! the ray and from there to a world point; the tile under that point picks
//! the texture.

use std::f32::consts::TAU;

use crate::renderer::framebuffer::shade_for;
use crate::renderer::software::{Software, projection::Projection, projection::WallSpan, raycast::Ray};
use crate::renderer::{RenderContext, Rgba};
use crate::world::{Ceiling, Texture};

/// Sky texture resampled once to the sky band height.
#[derive(Clone, Debug)]
pub struct SkyBox {
    tex: Texture,
    repetitions: u32,
}

impl SkyBox {
    /// `band_height` rows tall, aspect kept; wraps `repetitions` times around
    /// a full turn.
    pub fn new(src: &Texture, band_height: usize, repetitions: u32) -> Self {
        let h = band_height.max(1);
        let w = (src.w * h / src.h.max(1)).max(1);
        Self {
            tex: src.resample(w, h),
            repetitions: repetitions.max(1),
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.tex.h
    }

    /// Column from the world angle, row from the horizon (and so from head
    /// tilt): the bottom of the sky sits on the horizon.
    #[inline]
    pub fn sample(&self, angle: f32, y: usize, horizon: f32) -> Rgba {
        let turn = angle.rem_euclid(TAU) / TAU * self.repetitions as f32;
        let x = ((turn - turn.floor()) * self.tex.w as f32) as usize;
        let v = y as f32 - (horizon - self.tex.h as f32);
        let ty = (v.max(0.0) as usize).min(self.tex.h - 1);
        self.tex.texel(x.min(self.tex.w - 1), ty)
    }
}

impl Software {
    pub(super) fn draw_planes(
        &mut self,
        ctx: &RenderContext,
        proj: &Projection,
        x: usize,
        ray: &Ray,
        span: WallSpan,
        opacity: u8,
    ) {
        let rows = self.fb.height();
        let draw = ctx.draw_distance;
        let cos_rel = (ray.angle - proj.angle).cos().max(1e-4);
        let grid = &ctx.level.grid;
        let pos = ctx.player.pos;
        let px = x as i32;

        /* floor ----------------------------------------------------------*/
        for y in span.floor_start(rows)..rows {
            let Some(perp) = proj.floor_perp(y) else {
                continue;
            };
            let dist = perp / cos_rel;
            if dist > draw {
                continue;
            }
            let p = pos + ray.dir * dist;
            let Some(tile) = grid.tile_at(p) else {
                continue;
            };
            let tex = ctx.textures.get_or_missing(tile.floor);
            let texel = tex.sample(p.x - p.x.floor(), p.y - p.y.floor());
            self.fb
                .blend_px(px, y as i32, texel, shade_for(dist, draw), opacity);
        }

        /* ceiling / sky, nearest row first --------------------------------*/
        // past the draw distance an open sky keeps going
        let mut open_sky = false;
        for y in 0..span.ceiling_rows(rows) {
            let seen = proj
                .ceiling_perp(y)
                .map(|perp| perp / cos_rel)
                .filter(|&d| d <= draw)
                .and_then(|d| {
                    let p = pos + ray.dir * d;
                    grid.tile_at(p).map(|t| (t.ceiling, p, d))
                });
            match seen {
                Some((Ceiling::Indoor(id), p, d)) => {
                    open_sky = false;
                    let tex = ctx.textures.get_or_missing(id);
                    let texel = tex.sample(p.x - p.x.floor(), p.y - p.y.floor());
                    self.fb
                        .blend_px(px, y as i32, texel, shade_for(d, draw), opacity);
                }
                Some((Ceiling::Sky, ..)) => {
                    open_sky = true;
                    self.draw_sky(ctx, px, y, ray.angle, proj.horizon, opacity);
                }
                None if open_sky => self.draw_sky(ctx, px, y, ray.angle, proj.horizon, opacity),
                None => {}
            }
        }
    }

    #[inline]
    fn draw_sky(&mut self, ctx: &RenderContext, x: i32, y: usize, angle: f32, horizon: f32, opacity: u8) {
        if let Some(sky) = ctx.sky {
            // sky is never fogged
            self.fb
                .blend_px(x, y as i32, sky.sample(angle, y, horizon), 0, opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped() -> Texture {
        // four columns, row index in the red channel
        let mut px = Vec::new();
        for y in 0..4u32 {
            for x in 0..4u32 {
                px.push(0xFF00_0000 | y << 16 | x);
            }
        }
        Texture::new("SKY", 4, 4, px).unwrap()
    }

    #[test]
    fn sky_wraps_with_angle() {
        let sky = SkyBox::new(&striped(), 4, 2);
        assert_eq!(sky.sample(0.0, 3, 4.0), sky.sample(TAU, 3, 4.0));
        // two repetitions: half a turn is back at the start
        assert_eq!(sky.sample(0.0, 3, 4.0), sky.sample(TAU * 0.5, 3, 4.0));
        assert_eq!(sky.sample(TAU * 0.15, 3, 4.0) & 0xFF, 1);
    }

    #[test]
    fn sky_bottom_sits_on_horizon() {
        let sky = SkyBox::new(&striped(), 4, 1);
        // horizon at row 4: row 3 shows the last sky row
        assert_eq!((sky.sample(0.0, 3, 4.0) >> 16) & 0xFF, 3);
        // looking up pushes the horizon down and reveals higher rows
        assert_eq!((sky.sample(0.0, 3, 6.0) >> 16) & 0xFF, 1);
    }

    #[test]
    fn sky_is_resampled_to_band() {
        let sky = SkyBox::new(&striped(), 8, 1);
        assert_eq!(sky.height(), 8);
        assert_eq!(sky.tex.w, 8);
    }
}
