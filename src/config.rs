//! Engine options recognised by the core.
//!
//! Everything the renderer or the simulation needs to know about the
//! viewer lives here, so both halves agree on view distance, draw distance
//! and tick rate.

use std::f32::consts::{FRAC_PI_2, PI};
use std::time::Duration;

use thiserror::Error;

/// Rejected configuration values.  Raised once at setup, never per frame.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("field of view {0} rad must lie in (0, π)")]
    FieldOfView(f32),

    #[error("render resolution {cols}×{rows} must be non-zero")]
    Resolution { cols: usize, rows: usize },

    #[error("draw distance {0} must be positive")]
    DrawDistance(f32),

    #[error("flash draw distance {flash} is shorter than draw distance {normal}")]
    FlashDistance { normal: f32, flash: f32 },

    #[error("max head tilt {0} rad must lie in [0, π/2)")]
    HeadTilt(f32),

    #[error("tick rate must be at least 1 Hz")]
    TickRate,

    #[error("sky must repeat at least once around the horizon")]
    SkyRepetitions,
}

/// Circular overlay in the display's bottom-right corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapConfig {
    /// Radius in tiles around the player.
    pub radius: u32,
    /// Display pixels per tile.
    pub tile_size: u32,
    /// Gap between the map circle and the display edges.
    pub margin: u32,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            radius: 25,
            tile_size: 2,
            margin: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Horizontal field of view in radians.
    pub fov: f32,
    pub render_cols: usize,
    pub render_rows: usize,
    /// Rays are clamped here and fog saturates to black.
    pub draw_distance: f32,
    /// Effective draw distance while the muzzle flash lights the scene.
    pub flash_draw_distance: f32,
    /// World units per tick.
    pub step_size: f32,
    /// Radians per tick.
    pub turn_rate: f32,
    pub tilt_step: f32,
    pub max_head_tilt: f32,
    /// Eye-height change per tick for raise / lower viewpoint.
    pub eye_step: f32,
    pub door_tick: Duration,
    pub door_close_delay: Duration,
    pub tick_rate_hz: u32,
    pub sky_repetitions: u32,
    pub minimap: MinimapConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fov: PI / 3.0,
            render_cols: 800,
            render_rows: 600,
            draw_distance: 90.0,
            flash_draw_distance: 150.0,
            step_size: 0.2,
            turn_rate: 0.05,
            tilt_step: 0.03,
            max_head_tilt: 0.35,
            eye_step: 0.02,
            door_tick: Duration::from_millis(50),
            door_close_delay: Duration::from_secs(3),
            tick_rate_hz: 30,
            sky_repetitions: 4,
            minimap: MinimapConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov > 0.0 && self.fov < PI) {
            return Err(ConfigError::FieldOfView(self.fov));
        }
        if self.render_cols == 0 || self.render_rows == 0 {
            return Err(ConfigError::Resolution {
                cols: self.render_cols,
                rows: self.render_rows,
            });
        }
        if !(self.draw_distance > 0.0) {
            return Err(ConfigError::DrawDistance(self.draw_distance));
        }
        if !(self.flash_draw_distance >= self.draw_distance) {
            return Err(ConfigError::FlashDistance {
                normal: self.draw_distance,
                flash: self.flash_draw_distance,
            });
        }
        if !(self.max_head_tilt >= 0.0 && self.max_head_tilt < FRAC_PI_2) {
            return Err(ConfigError::HeadTilt(self.max_head_tilt));
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::TickRate);
        }
        if self.sky_repetitions == 0 {
            return Err(ConfigError::SkyRepetitions);
        }
        Ok(())
    }

    /// Wall-clock length of one scheduler tick.
    #[inline]
    pub fn tick(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.tick_rate_hz.max(1) as u64)
    }

    /// Door animation step expressed in scheduler ticks (at least 1).
    pub fn door_step_ticks(&self) -> u32 {
        self.to_ticks(self.door_tick)
    }

    /// Auto-close delay expressed in scheduler ticks (at least 1).
    pub fn door_close_ticks(&self) -> u32 {
        self.to_ticks(self.door_close_delay)
    }

    fn to_ticks(&self, d: Duration) -> u32 {
        let tick = self.tick().as_secs_f64();
        ((d.as_secs_f64() / tick).round() as u32).max(1)
    }

    /// Distance from the eye to the projection plane, in render pixels.
    ///
    /// ```text
    /// view = (cols / 2) / tan(fov / 2)
    /// ```
    #[inline]
    pub fn view_distance(&self) -> f32 {
        self.render_cols as f32 * 0.5 / (self.fov * 0.5).tan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn fov_must_stay_below_pi() {
        let cfg = Config {
            fov: PI,
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::FieldOfView(PI)));
    }

    #[test]
    fn zero_resolution_rejected() {
        let cfg = Config {
            render_rows: 0,
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Resolution { rows: 0, .. })
        ));
    }

    #[test]
    fn flash_cannot_shorten_view() {
        let cfg = Config {
            flash_draw_distance: 10.0,
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::FlashDistance { .. })
        ));
    }

    #[test]
    fn durations_convert_to_whole_ticks() {
        let cfg = Config::default(); // 30 Hz
        assert_eq!(cfg.door_close_ticks(), 90);
        assert_eq!(cfg.door_step_ticks(), 2);

        let fast = Config {
            door_tick: Duration::from_millis(1),
            ..Config::default()
        };
        assert_eq!(fast.door_step_ticks(), 1, "never rounds down to zero");
    }

    #[test]
    fn view_distance_at_90_deg() {
        let cfg = Config {
            fov: FRAC_PI_2,
            render_cols: 640,
            ..Config::default()
        };
        assert!((cfg.view_distance() - 320.0).abs() < 1e-3);
    }
}
