use crate::renderer::software::{Software, projection::WallSpan};
use crate::world::Texture;

impl Software {
    /// Draw one textured wall column.
    ///
    /// Texel rows are stepped with a 16.16 accumulator; no per-pixel divide.
    pub(super) fn draw_wall_column(
        &mut self,
        x: usize,
        span: WallSpan,
        tex: &Texture,
        u: f32,
        shade: u8,
        opacity: u8,
    ) {
        let rows = self.fb.height();
        let height = span.bottom - span.top;
        if height <= 0.0 || tex.h == 0 || tex.w == 0 {
            return;
        }
        let y0 = span.ceiling_rows(rows);
        let y1 = span.floor_start(rows);
        if y0 >= y1 {
            return;
        }

        let tx = ((u.clamp(0.0, 1.0) * tex.w as f32) as usize).min(tex.w - 1);
        let step = ((tex.h as f32 * 65536.0) / height) as u64;
        let mut v = ((y0 as f32 + 0.5 - span.top) * tex.h as f32 * 65536.0 / height) as u64;

        for y in y0..y1 {
            let ty = ((v >> 16) as usize).min(tex.h - 1);
            self.fb
                .blend_px(x as i32, y as i32, tex.pixels[ty * tex.w + tx], shade, opacity);
            v += step;
        }
    }
}
