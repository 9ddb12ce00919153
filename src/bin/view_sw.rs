//! view_sw - walk a text map with the software ray caster.
//!
//! USAGE:
//! ```bash
//! RUST_LOG=info cargo run --release --bin view_sw -- [maps/demo.txt] --width 1280 --height 800
//! ```
//!
//! W/S or ↑/↓ move, A/D strafe, ←/→ turn, PgUp/PgDn look, R/F raise / lower
//! the eye, Space opens doors, Ctrl fires, Esc quits.

use std::path::PathBuf;
use std::time::{Duration, Instant};
use std::{f32::consts::PI, fs};

use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use minifb::{Key, Window, WindowOptions};

use yacast_rs::{
    Config,
    renderer::{Minimap, RenderContext, RendererExt, SkyBox, Software},
    sim::{Actions, AudioHooks, BOB_APEX, TicRunner, WeaponSequence},
    world::{
        Texture, TextureBank, TextureId, WallFaces, argb,
        ascii::{self, TileTextures},
    },
};

const DEMO_MAP: &str = include_str!("../../maps/demo.txt");

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Map file; the built-in demo map when omitted
    #[arg(value_name = "MAP")]
    map: Option<PathBuf>,

    /// Window width
    #[arg(long, default_value_t = 1280)]
    width: usize,

    /// Window height
    #[arg(long, default_value_t = 800)]
    height: usize,

    /// Internal render columns
    #[arg(long)]
    cols: Option<usize>,

    /// Internal render rows
    #[arg(long)]
    rows: Option<usize>,

    /// Horizontal field of view in degrees
    #[arg(long)]
    fov: Option<f32>,

    /// Fog horizon in tiles
    #[arg(long)]
    draw_distance: Option<f32>,

    /// Simulation rate
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Hide the radar
    #[arg(long)]
    no_minimap: bool,
}

impl Args {
    fn config(&self) -> anyhow::Result<Config> {
        let mut cfg = Config::default();
        if let Some(c) = self.cols {
            cfg.render_cols = c;
        }
        if let Some(r) = self.rows {
            cfg.render_rows = r;
        }
        if let Some(f) = self.fov {
            cfg.fov = f.to_radians();
        }
        if let Some(d) = self.draw_distance {
            cfg.draw_distance = d;
            cfg.flash_draw_distance = cfg.flash_draw_distance.max(d);
        }
        if let Some(hz) = self.tick_rate {
            cfg.tick_rate_hz = hz;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

/*──────────────────────── audio stand-in ────────────────────────*/
struct LogAudio;

impl AudioHooks for LogAudio {
    fn play_theme(&mut self) {
        info!("audio: theme");
    }
    fn trigger_shot(&mut self) {
        debug!("audio: shot");
    }
}

/*──────────────────────── procedural assets ─────────────────────*/
struct Assets {
    bank: TextureBank,
    palette: TileTextures,
    sky: Texture,
    weapon: Vec<Texture>,
}

fn sky_gradient(w: usize, h: usize) -> anyhow::Result<Texture> {
    let mut px = Vec::with_capacity(w * h);
    for y in 0..h {
        let t = y as f32 / h as f32;
        for x in 0..w {
            // a few soft bands of cloud along the width
            let cloud = ((x as f32 / w as f32 * PI * 6.0).sin() * 0.5 + 0.5) * (1.0 - t) * 40.0;
            let r = (40.0 + 120.0 * t + cloud) as u8;
            let g = (70.0 + 120.0 * t + cloud) as u8;
            let b = (160.0 + 80.0 * t) as u8;
            px.push(argb(0xFF, r, g, b));
        }
    }
    Ok(Texture::new("SKY", w, h, px)?)
}

/// Frame 0 is idle, frame 1 the flash, then the barrel recoils and returns.
fn weapon_frames(size: usize) -> anyhow::Result<Vec<Texture>> {
    let recoil = [0, 0, 6, 10, 6];
    let mut frames = Vec::with_capacity(recoil.len());
    for (i, &kick) in recoil.iter().enumerate() {
        let mut px = vec![0u32; size * size];
        let (bx0, bx1) = (size * 7 / 16, size * 9 / 16);
        let top = size / 3 + kick;
        for y in top..size {
            for x in bx0..bx1 {
                let edge = x == bx0 || x + 1 == bx1;
                px[y * size + x] = if edge { argb(0xFF, 40, 40, 48) } else { argb(0xFF, 96, 96, 110) };
            }
        }
        if i == 1 {
            let c = (size as f32 * 0.5, top as f32 - size as f32 * 0.08);
            let r = size as f32 * 0.12;
            for y in 0..size {
                for x in 0..size {
                    let d = ((x as f32 - c.0).powi(2) + (y as f32 - c.1).powi(2)).sqrt();
                    if d < r {
                        px[y * size + x] = argb(0xFF, 255, 230 - (d / r * 90.0) as u8, 60);
                    }
                }
            }
        }
        frames.push(Texture::new(format!("GUN{i}"), size, size, px)?);
    }
    Ok(frames)
}

fn assets() -> anyhow::Result<Assets> {
    let mut bank = TextureBank::default_with_checker();
    let mut add = |tex: Texture| -> anyhow::Result<TextureId> {
        let name = tex.name.clone();
        Ok(bank.insert(name, tex)?)
    };

    let brick_ew = add(Texture::bricks("BRICK_EW", 64, argb(0xFF, 150, 60, 40), argb(0xFF, 90, 90, 90)))?;
    let brick_ns = add(Texture::bricks("BRICK_NS", 64, argb(0xFF, 120, 48, 32), argb(0xFF, 70, 70, 70)))?;
    let stone = add(Texture::bricks("STONE", 64, argb(0xFF, 110, 110, 120), argb(0xFF, 60, 60, 66)))?;
    let door = add(Texture::checker("DOOR", 64, 8, argb(0xFF, 40, 70, 140), argb(0xFF, 30, 50, 110)))?;
    let dock = add(Texture::solid("DOCK", 8, 8, argb(0xFF, 80, 80, 90)))?;
    let floor = add(Texture::checker("FLOOR", 64, 16, argb(0xFF, 90, 80, 60), argb(0xFF, 70, 62, 48)))?;
    let ceiling = add(Texture::checker("CEIL", 64, 32, argb(0xFF, 60, 60, 60), argb(0xFF, 52, 52, 52)))?;
    let portal = add(Texture::checker("PORTAL", 64, 4, argb(0xFF, 200, 30, 30), argb(0xFF, 120, 10, 10)))?;
    let object = add(Texture::solid("PILLAR", 8, 8, argb(0xFF, 140, 120, 60)))?;
    let sky = sky_gradient(512, 128)?;
    let sky_id = add(sky.clone())?;

    let palette = TileTextures {
        wall: WallFaces {
            east: brick_ew,
            west: brick_ew,
            north: brick_ns,
            south: brick_ns,
        },
        diagonal: stone,
        door,
        door_dock: dock,
        floor,
        ceiling,
        teleporter: portal,
        object,
        sky: Some(sky_id),
    };
    Ok(Assets {
        bank,
        palette,
        sky,
        weapon: weapon_frames(64)?,
    })
}

fn read_actions(win: &Window) -> Actions {
    const BINDINGS: [(&[Key], Actions); 12] = [
        (&[Key::W, Key::Up], Actions::FORWARD),
        (&[Key::S, Key::Down], Actions::BACK),
        (&[Key::A], Actions::STRAFE_LEFT),
        (&[Key::D], Actions::STRAFE_RIGHT),
        (&[Key::Left], Actions::TURN_LEFT),
        (&[Key::Right], Actions::TURN_RIGHT),
        (&[Key::PageUp], Actions::LOOK_UP),
        (&[Key::PageDown], Actions::LOOK_DOWN),
        (&[Key::R], Actions::RAISE),
        (&[Key::F], Actions::LOWER),
        (&[Key::Space], Actions::INTERACT),
        (&[Key::LeftCtrl, Key::RightCtrl], Actions::FIRE),
    ];

    let mut actions = Actions::empty();
    for (keys, action) in BINDINGS {
        if keys.iter().any(|&k| win.is_key_down(k)) {
            actions |= action;
        }
    }
    actions
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cfg = args.config()?;

    let source = match &args.map {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
        None => DEMO_MAP.to_string(),
    };
    let assets = assets()?;
    let level = ascii::parse(&source, &assets.palette)?;
    level.validate(&assets.bank)?;

    // tall enough for the highest horizon: full tilt plus the bob apex
    let band = cfg.render_rows as f32 * 0.5
        + cfg.max_head_tilt.tan() * cfg.view_distance()
        + BOB_APEX as f32 * 0.6 * cfg.render_rows as f32 / 600.0;
    let sky = SkyBox::new(&assets.sky, band.ceil() as usize, cfg.sky_repetitions);

    let mut minimap = Minimap::new(cfg.minimap);
    let mut renderer = Software::default();
    let (cols, rows) = (cfg.render_cols, cfg.render_rows);
    let (w, h) = (args.width, args.height);
    let mut display = vec![0u32; w * h];

    let mut sim = TicRunner::new(level, cfg, WeaponSequence::default(), Box::new(LogAudio));

    let mut win = Window::new("yacast - software ray caster", w, h, WindowOptions::default())?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO; // cumulated frame time
    let mut acc_frames = 0usize; // frames in the current window
    let mut acc_tics = 0u32;
    let mut last_print = Instant::now(); // when we printed last

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now(); // ┌─ frame timer start

        acc_tics += sim.pump(read_actions(&win));

        /* draw -------------------------------------------------------------*/
        let state = sim.state();
        let mut ctx = RenderContext::new(&state.level, &state.player, &assets.bank, sim.config());
        ctx.draw_distance = sim.draw_distance();
        ctx.opacity = sim.scene_opacity();
        ctx.sky = Some(&sky);
        ctx.weapon = assets.weapon.get(state.weapon_frame() as usize);

        renderer.draw_frame(cols, rows, &ctx, |_, _, _| {});
        renderer.framebuffer().scale_into(&mut display, w, h);
        if !args.no_minimap {
            minimap.render(&state.level, &state.player);
            minimap.stamp(&mut display, w, h, state.player.angle());
        }

        acc_time += t0.elapsed();
        acc_frames += 1;
        win.update_with_buffer(&display, w, h)?;

        // ─────────── report every ~3 s ─────────────────────────────────────
        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            let tps = acc_tics as f64 / last_print.elapsed().as_secs_f64();
            info!(
                "avg frame: {:.2} ms ({:.1} FPS), {:.1} tics/s",
                avg_ms,
                1000.0 / avg_ms,
                tps
            );
            acc_time = Duration::ZERO;
            acc_frames = 0;
            acc_tics = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
