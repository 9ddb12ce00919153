//! ---------------------------------------------------------------------------
//! Classic software (CPU) ray-casting renderer
//!
//! * Fills a [`Framebuffer`] in **0xAARRGGBB** format, one column per ray.
//! * Per column: cast → project → floor / ceiling → wall strip.  Wall columns
//!   and plane rows never overlap, so no depth buffer is needed.
//! * The weapon overlay goes on last.
//! ---------------------------------------------------------------------------

mod planes;
mod projection;
mod raycast;
mod sprites;
mod walls;

pub use planes::SkyBox;
pub use projection::{Projection, WallSpan};
pub use raycast::{Hit, Ray, RayCaster, Side, Surface};

use crate::renderer::framebuffer::{Framebuffer, shade_for};
use crate::renderer::{RenderContext, Renderer, Rgba};

/// Cleared to opaque black: fully fogged space is black too.
const CLEAR: Rgba = 0xFF00_0000;

/// Wolfenstein-style column renderer.
#[derive(Default)]
pub struct Software {
    fb: Framebuffer,
    caster: RayCaster,
}

impl Software {
    #[inline]
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        self.fb.resize(w, h);
        self.fb.clear(CLEAR);
        self.caster.reset();
    }

    fn draw_scene(&mut self, ctx: &RenderContext) {
        let (cols, rows) = (self.fb.width(), self.fb.height());
        if cols == 0 || rows == 0 {
            return;
        }
        let proj = Projection::new(ctx.cfg.fov, cols, rows, ctx.player);
        let opacity = (ctx.opacity.clamp(0.0, 1.0) * 255.0) as u8;

        for col in 0..cols {
            let ray = Ray::from_angle(proj.column_angle(col));
            let hit = self
                .caster
                .cast(ctx.level, ctx.player.pos, &ray, ctx.draw_distance);
            let span = proj.wall_span(proj.perpendicular(hit.dist, ray.angle));

            self.draw_planes(ctx, &proj, col, &ray, span, opacity);
            if let Some(s) = hit.surface {
                let tex = ctx.textures.get_or_missing(s.texture);
                let shade = shade_for(hit.dist, ctx.draw_distance);
                self.draw_wall_column(col, span, tex, s.offset, shade, opacity);
            }
        }

        if let Some(weapon) = ctx.weapon {
            self.draw_weapon(weapon, ctx.player.bob, opacity);
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(self.fb.pixels(), self.fb.width(), self.fb.height());
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
