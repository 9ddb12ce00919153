//! Wolfenstein-style ray casting on a CPU frame-buffer.
//!
//! * [`world`]    – tile grid, doors, textures, player, text maps.
//! * [`sim`]      – fixed-rate tick: input, movement, doors, animation.
//! * [`renderer`] – ray caster, column rasterisers, compositor, minimap.

pub mod config;
pub mod renderer;
pub mod sim;
pub mod world;

pub use config::{Config, ConfigError};
