use crate::renderer::software::Software;
use crate::world::Texture;

/// Weapon height as a share of the render height.
const WEAPON_SCREEN_SHARE: f32 = 0.5;

impl Software {
    /// Blit the current weapon frame bottom-centred, swaying with the walk bob.
    pub(super) fn draw_weapon(&mut self, tex: &Texture, bob: i32, opacity: u8) {
        if tex.w == 0 || tex.h == 0 {
            return;
        }
        let (fw, fh) = (self.fb.width(), self.fb.height());
        let h = ((fh as f32 * WEAPON_SCREEN_SHARE) as usize).max(1);
        let w = (tex.w * h / tex.h).max(1);

        // sideways with the bob, dipping at both extremes
        let unit = fh as f32 / 600.0;
        let sway = (bob as f32 * 1.5 * unit) as i32;
        let dip = (bob.abs() as f32 * 0.75 * unit) as i32;

        let x = (fw as i32 - w as i32) / 2 + sway;
        let y = fh as i32 - h as i32 + dip;
        self.fb.blit_scaled(tex, x, y, w, h, 0, opacity);
    }
}
