//! Off-screen pixel buffer and the blend / blit primitives every raster
//! stage writes through.
//!
//! All writes clip against the buffer.  Colours compose as
//!
//! ```text
//! a   = src.a · opacity
//! lit = src.rgb · (1 - shade)
//! out = lit · a + dst · (1 - a)        alpha written back as 0xFF
//! ```
//!
//! with every factor in `0..=255` integer steps.

use crate::renderer::Rgba;
use crate::world::{Texture, alpha};

pub const OPAQUE: u8 = 0xFF;

/// Linear distance fog: `0` at the eye, `255` at (and past) `draw_distance`.
#[inline]
pub fn shade_for(dist: f32, draw_distance: f32) -> u8 {
    if draw_distance <= 0.0 {
        return 255;
    }
    ((dist / draw_distance).clamp(0.0, 1.0) * 255.0) as u8
}

/// Composite `src` over `dst`.  `shade = 0, opacity = 255` returns `src`
/// (opaque) untouched; `opacity = 0` returns `dst`.
#[inline(always)]
pub fn blend(src: Rgba, dst: Rgba, shade: u8, opacity: u8) -> Rgba {
    let a = alpha(src) as u32 * opacity as u32 / 255;
    if a == 0 {
        return dst;
    }
    let light = 255 - shade as u32;
    let inv = 255 - a;
    let channel = |shift: u32| {
        let s = (src >> shift) & 0xFF;
        let d = (dst >> shift) & 0xFF;
        let lit = s * light / 255;
        ((lit * a + d * inv) / 255) << shift
    };
    0xFF00_0000 | channel(16) | channel(8) | channel(0)
}

/// Mutable RGBA buffer at the internal render resolution.
#[derive(Clone, Debug, Default)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0xFF00_0000; width * height],
        }
    }

    /// Reallocate only if the size changed.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels.resize(width * height, 0xFF00_0000);
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Clipped, blended single-pixel write.
    #[inline(always)]
    pub fn blend_px(&mut self, x: i32, y: i32, src: Rgba, shade: u8, opacity: u8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = blend(src, self.pixels[i], shade, opacity);
        }
    }

    /// Clipped raw write, no blending.
    #[inline(always)]
    pub fn put(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color | 0xFF00_0000;
        }
    }

    /// Nearest-neighbour scaled blit of `tex` into the `dw × dh` rectangle at
    /// `(dx, dy)`.  Source coordinates advance by 16.16 fixed-point steps.
    #[allow(clippy::too_many_arguments)]
    pub fn blit_scaled(
        &mut self,
        tex: &Texture,
        dx: i32,
        dy: i32,
        dw: usize,
        dh: usize,
        shade: u8,
        opacity: u8,
    ) {
        if dw == 0 || dh == 0 || tex.w == 0 || tex.h == 0 {
            return;
        }
        let step_x = ((tex.w as u64) << 16) / dw as u64;
        let step_y = ((tex.h as u64) << 16) / dh as u64;

        /* clip the destination rectangle, skipping the source ahead */
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (dx + dw as i32).min(self.width as i32);
        let y1 = (dy + dh as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let sx0 = (x0 - dx) as u64 * step_x;
        let mut sy = (y0 - dy) as u64 * step_y;

        for y in y0..y1 {
            let row = ((sy >> 16) as usize).min(tex.h - 1) * tex.w;
            let base = y as usize * self.width;
            let mut sx = sx0;
            for x in x0..x1 {
                let src = tex.pixels[row + ((sx >> 16) as usize).min(tex.w - 1)];
                let i = base + x as usize;
                self.pixels[i] = blend(src, self.pixels[i], shade, opacity);
                sx += step_x;
            }
            sy += step_y;
        }
    }

    /// Upscale the whole buffer onto a `dw × dh` display surface.
    pub fn scale_into(&self, dst: &mut [Rgba], dw: usize, dh: usize) {
        if self.width == 0 || self.height == 0 || dst.len() < dw * dh {
            return;
        }
        let step_x = ((self.width as u64) << 16) / dw.max(1) as u64;
        let step_y = ((self.height as u64) << 16) / dh.max(1) as u64;
        let mut sy = 0u64;
        for row in dst.chunks_exact_mut(dw.max(1)).take(dh) {
            let src = ((sy >> 16) as usize).min(self.height - 1) * self.width;
            let mut sx = 0u64;
            for px in row {
                *px = self.pixels[src + ((sx >> 16) as usize).min(self.width - 1)];
                sx += step_x;
            }
            sy += step_y;
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
