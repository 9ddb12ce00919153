// Format-agnostic repository of textures built by the caller.
// The renderer and world logic interact through `TextureId` only.

use std::collections::HashMap;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// Packed 32-bit **ARGB** (0xAARRGGBB).
pub type Rgba = u32;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// Pack channels into an opaque-or-not [`Rgba`].
#[inline(always)]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Rgba {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

#[inline(always)]
pub const fn alpha(c: Rgba) -> u8 {
    (c >> 24) as u8
}

/// CPU-side storage in row-major order, `pixels.len() == w * h`.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
}

/// Convenience checkerboard 8×8 (light grey / magenta).
impl Default for Texture {
    fn default() -> Self {
        Texture::checker("CHECKER", 8, 1, 0xFFC0_C0C0, 0xFFFF_00FF)
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    #[error("texture `{name}` is {w}×{h} but holds {found} pixels")]
    BadSize {
        name: String,
        w: usize,
        h: usize,
        found: usize,
    },
}

impl Texture {
    pub fn new<S: Into<String>>(
        name: S,
        w: usize,
        h: usize,
        pixels: Vec<Rgba>,
    ) -> Result<Self, TextureError> {
        let name = name.into();
        if w == 0 || h == 0 || pixels.len() != w * h {
            return Err(TextureError::BadSize {
                name,
                w,
                h,
                found: pixels.len(),
            });
        }
        Ok(Self { name, w, h, pixels })
    }

    /*──────────────────────── generators ───────────────────────*/

    /// Square `size × size` checkerboard with `cell`-pixel squares.
    pub fn checker(name: &str, size: usize, cell: usize, a: Rgba, b: Rgba) -> Self {
        let size = size.max(1);
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                pixels.push(if ((x / cell) ^ (y / cell)) & 1 == 0 { a } else { b });
            }
        }
        Self {
            name: name.to_string(),
            w: size,
            h: size,
            pixels,
        }
    }

    pub fn solid(name: &str, w: usize, h: usize, color: Rgba) -> Self {
        let (w, h) = (w.max(1), h.max(1));
        Self {
            name: name.to_string(),
            w,
            h,
            pixels: vec![color; w * h],
        }
    }

    /// Running-bond brick courses separated by one-pixel mortar lines.
    pub fn bricks(name: &str, size: usize, brick: Rgba, mortar: Rgba) -> Self {
        let size = size.max(8);
        let course = size / 4;
        let length = size / 2;
        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size {
            let row = y / course;
            let shift = if row & 1 == 0 { 0 } else { length / 2 };
            for x in 0..size {
                let joint = (x + shift) % length == 0;
                let bed = y % course == 0;
                // slight per-brick tint keeps large walls from looking flat
                let tint = ((row * 7 + (x + shift) / length * 3) % 4) as u32 * 0x0004_0202;
                pixels.push(if joint || bed {
                    mortar
                } else {
                    brick.saturating_sub(tint) | 0xFF00_0000
                });
            }
        }
        Self {
            name: name.to_string(),
            w: size,
            h: size,
            pixels,
        }
    }

    /// Nearest-neighbour rescale to `w × h`.
    ///
    /// Source coordinates advance by a 16.16 fixed-point step so the
    /// inner loop stays integer-only.
    pub fn resample(&self, w: usize, h: usize) -> Self {
        let (w, h) = (w.max(1), h.max(1));
        let step_x = ((self.w as u64) << 16) / w as u64;
        let step_y = ((self.h as u64) << 16) / h as u64;
        let mut pixels = Vec::with_capacity(w * h);
        let mut sy = 0u64;
        for _ in 0..h {
            let row = ((sy >> 16) as usize).min(self.h - 1) * self.w;
            let mut sx = 0u64;
            for _ in 0..w {
                let col = ((sx >> 16) as usize).min(self.w - 1);
                pixels.push(self.pixels[row + col]);
                sx += step_x;
            }
            sy += step_y;
        }
        Self {
            name: self.name.clone(),
            w,
            h,
            pixels,
        }
    }

    /*──────────────────────── sampling ───────────────────────*/

    #[inline(always)]
    pub fn texel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[(y % self.h) * self.w + (x % self.w)]
    }

    /// Sample at normalised `(u, v)`; both wrap.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> Rgba {
        let x = (u.rem_euclid(1.0) * self.w as f32) as usize;
        let y = (v.rem_euclid(1.0) * self.h as f32) as usize;
        self.texel(x.min(self.w - 1), y.min(self.h - 1))
    }
}

/// A format-agnostic cache of textures.
///
/// * Stores exactly one copy of every name.
/// * ID **0** is always the “missing” checkerboard.
///
/// **Thread-safety:** access `TextureBank` from a single thread or wrap it
/// in `RwLock`; the struct itself is not `Sync`.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl Default for TextureBank {
    fn default() -> Self {
        Self::default_with_checker()
    }
}

impl TextureBank {
    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback.  The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    /// Number of textures stored (including the “missing” one).
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    } // only checker

    #[inline]
    pub fn contains(&self, id: TextureId) -> bool {
        (id as usize) < self.data.len()
    }

    /// Obtain the id for a *loaded* texture by name.
    /// Returns `None` if the name is unknown.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Fallback-safe query: unknown names resolve to the checkerboard id.
    pub fn id_or_missing(&self, name: &str) -> TextureId {
        self.id(name).unwrap_or(NO_TEXTURE)
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Hot-path lookup: ids are validated at level load, anything else
    /// draws the checkerboard.
    #[inline]
    pub fn get_or_missing(&self, id: TextureId) -> &Texture {
        self.data.get(id as usize).unwrap_or(&self.data[0])
    }

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tex(color: Rgba) -> Texture {
        Texture {
            name: "Dummy".to_string(),
            w: 2,
            h: 2,
            pixels: vec![color; 4],
        }
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert("RED", dummy_tex(0xFFFF_0000)).unwrap();
        let blue = bank.insert("BLUE", dummy_tex(0xFF00_00FF)).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("BLUE"), Some(blue));
        assert_eq!(bank.id("NOPE"), None);
        assert_eq!(bank.id_or_missing("NOPE"), NO_TEXTURE);

        assert_eq!(bank.texture(red).unwrap().pixels[0], 0xFFFF_0000);
        assert_eq!(bank.texture(blue).unwrap().pixels[0], 0xFF00_00FF);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("WOOD", dummy_tex(1)).unwrap();
        let err = bank.insert("WOOD", dummy_tex(2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        // texture count still 2 (checker + first WOOD)
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn bad_id_guard() {
        let bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert!(!bank.contains(bad));
        assert_eq!(bank.get_or_missing(bad).name, "CHECKER");
    }

    #[test]
    fn pixel_count_must_match_size() {
        let err = Texture::new("X", 2, 2, vec![0; 3]).unwrap_err();
        assert!(matches!(err, TextureError::BadSize { found: 3, .. }));
        assert!(Texture::new("X", 2, 2, vec![0; 4]).is_ok());
    }

    #[test]
    fn resample_doubles_each_texel() {
        let src = Texture::new("S", 2, 1, vec![1, 2]).unwrap();
        let big = src.resample(4, 2);
        assert_eq!(big.pixels, vec![1, 1, 2, 2, 1, 1, 2, 2]);
        let small = big.resample(2, 1);
        assert_eq!(small.pixels, vec![1, 2]);
    }

    #[test]
    fn sample_wraps() {
        let t = Texture::checker("C", 2, 1, 10, 20);
        assert_eq!(t.sample(0.0, 0.0), 10);
        assert_eq!(t.sample(0.75, 0.0), 20);
        assert_eq!(t.sample(1.25, 0.0), 10);
        assert_eq!(t.sample(-0.25, 0.0), 20);
    }

    #[test]
    fn generators_are_opaque() {
        let b = Texture::bricks("B", 32, 0xFF99_3322, 0xFF80_8080);
        assert_eq!(b.pixels.len(), 32 * 32);
        assert!(b.pixels.iter().all(|&p| alpha(p) == 0xFF));
        assert_eq!(argb(0x80, 1, 2, 3), 0x8001_0203);
    }
}
