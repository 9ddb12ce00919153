//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! Each frame it borrows the current world state into a [`RenderContext`]
//! and hands it to a type that implements [`Renderer`].
//!
//! * The context is passed by reference into every stage; no stage reaches
//!   for global state.
//! * The minimap is not a render stage: it is stamped onto the *display*
//!   surface after the frame is scaled up, see [`minimap`].

use crate::config::Config;
use crate::world::{Level, Player, Texture, TextureBank};

pub use crate::world::Rgba;

pub mod framebuffer;
pub mod minimap;
pub mod software;

pub use framebuffer::{Framebuffer, blend, shade_for};
pub use minimap::Minimap;
pub use software::{Hit, Projection, Ray, RayCaster, Side, SkyBox, Software, Surface};

/// Borrowed, read-only view of everything one frame needs.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub level: &'a Level,
    pub player: &'a Player,
    pub textures: &'a TextureBank,
    pub cfg: &'a Config,
    /// Effective for this frame; the muzzle flash lengthens it.
    pub draw_distance: f32,
    /// Global scene opacity in `[0, 1]`.
    pub opacity: f32,
    pub sky: Option<&'a SkyBox>,
    /// Weapon frame drawn over the scene, bottom-centred.
    pub weapon: Option<&'a Texture>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        level: &'a Level,
        player: &'a Player,
        textures: &'a TextureBank,
        cfg: &'a Config,
    ) -> Self {
        Self {
            level,
            player,
            textures,
            cfg,
            draw_distance: cfg.draw_distance,
            opacity: 1.0,
            sky: None,
            weapon: None,
        }
    }
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Cast, project and rasterise the whole scene into the internal buffer.
    fn draw_scene(&mut self, ctx: &RenderContext);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(&mut self, width: usize, height: usize, ctx: &RenderContext, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        self.draw_scene(ctx);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}
