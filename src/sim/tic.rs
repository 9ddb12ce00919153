use std::time::{Duration, Instant};

use log::{debug, trace};

use super::anim::{Animation, Completion};
use super::audio::AudioHooks;
use super::input::Actions;
use super::movement::{self, WalkBob};
use crate::config::Config;
use crate::world::{Level, Player};

/// How to play the weapon when FIRE is pressed.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponSequence {
    /// Frame indices in play order; the first and last are usually the idle pose.
    pub frames: Vec<u16>,
    pub ticks_per_frame: u32,
    /// Frame that lights the scene.
    pub flash_frame: u16,
    /// Scene opacity while the flash frame shows; below 1 dims the scene.
    pub flash_opacity: f32,
}

impl Default for WeaponSequence {
    fn default() -> Self {
        Self {
            frames: vec![1, 2, 3, 4, 3, 2, 0],
            ticks_per_frame: 4,
            flash_frame: 1,
            flash_opacity: 1.0,
        }
    }
}

/// Everything one tick mutates.  The renderer only reads it.
#[derive(Clone, Debug)]
pub struct GameState {
    pub level: Level,
    pub player: Player,
    pub bob: WalkBob,
    pub weapon: Option<Animation>,
    interact_held: bool,
}

impl GameState {
    pub fn new(level: Level) -> Self {
        let player = level.spawn;
        Self {
            level,
            player,
            bob: WalkBob::default(),
            weapon: None,
            interact_held: false,
        }
    }

    /// Weapon frame to draw, `0` when idle.
    pub fn weapon_frame(&self) -> u16 {
        self.weapon.as_ref().map_or(0, Animation::frame)
    }

    /// Drop any running weapon animation.
    pub fn cancel_weapon(&mut self) {
        self.weapon = None;
    }
}

/// Fixed-rate pump that owns the game state and drives every system.
pub struct TicRunner {
    state: GameState,
    cfg: Config,
    weapon: WeaponSequence,
    audio: Box<dyn AudioHooks>,
    tic: Duration,
    last: Instant,
    tics: u64,
}

impl TicRunner {
    pub fn new(
        mut level: Level,
        cfg: Config,
        weapon: WeaponSequence,
        mut audio: Box<dyn AudioHooks>,
    ) -> Self {
        level
            .doors
            .set_timing(cfg.door_step_ticks(), cfg.door_close_ticks());
        audio.play_theme();
        Self {
            state: GameState::new(level),
            tic: cfg.tick(),
            cfg,
            weapon,
            audio,
            last: Instant::now(),
            tics: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Draw distance for the current frame; longer during the muzzle flash.
    pub fn draw_distance(&self) -> f32 {
        if self.flashing() {
            self.cfg.flash_draw_distance
        } else {
            self.cfg.draw_distance
        }
    }

    /// Global scene opacity for the current frame.
    pub fn scene_opacity(&self) -> f32 {
        if self.flashing() {
            self.weapon.flash_opacity.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    fn flashing(&self) -> bool {
        self.state
            .weapon
            .as_ref()
            .is_some_and(|a| a.frame() == self.weapon.flash_frame)
    }

    /// Advance enough tics to synchronise simulation with real time.
    /// Returns how many ran.
    pub fn pump(&mut self, actions: Actions) -> u32 {
        let mut ran = 0;
        while self.last.elapsed() >= self.tic {
            self.tick(actions);
            self.last += self.tic;
            ran += 1;
        }
        ran
    }

    /* ---------------------------------------------------------------- */
    /* one fixed-rate game tic                                          */
    /* ---------------------------------------------------------------- */
    pub fn tick(&mut self, actions: Actions) {
        self.tics += 1;
        trace!("tic {} {:?}", self.tics, actions);
        let s = &mut self.state;

        /* input ----------------------------------------------------------*/
        let interact = actions.contains(Actions::INTERACT);
        if interact && !s.interact_held {
            let reach = s.player.pos + s.player.forward();
            let (tx, ty) = (reach.x.floor() as i32, reach.y.floor() as i32);
            if s.level.doors.toggle(tx, ty, s.player.tile()) {
                debug!("interact: door ({tx}, {ty})");
            }
        }
        s.interact_held = interact;

        if actions.contains(Actions::FIRE) && s.weapon.is_none() {
            s.weapon = Animation::new(
                self.weapon.frames.clone(),
                self.weapon.ticks_per_frame,
                Completion::Stop,
            );
            if s.weapon.is_some() {
                self.audio.trigger_shot();
            }
        }

        /* movement -------------------------------------------------------*/
        let moved = movement::apply(&mut s.player, actions, &self.cfg, &s.level);
        s.bob.advance(moved);
        s.player.bob = s.bob.index();

        /* teleport -------------------------------------------------------*/
        movement::teleport(&mut s.player, &s.level);

        /* doors ----------------------------------------------------------*/
        s.level.doors.tick(s.player.tile());

        /* animations -----------------------------------------------------*/
        if s.weapon.as_mut().is_some_and(Animation::tick) {
            s.weapon = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::audio::NullAudio;
    use crate::world::ascii::{self, TileTextures};
    use crate::world::{CLOSED, OPEN};
    use std::cell::Cell;
    use std::rc::Rc;

    const HALL: &str = "\
#######
#.@V..#
#######
";

    fn runner() -> TicRunner {
        let level = ascii::parse(HALL, &TileTextures::default()).unwrap();
        TicRunner::new(
            level,
            Config::default(),
            WeaponSequence::default(),
            Box::new(NullAudio),
        )
    }

    fn door(r: &TicRunner) -> u8 {
        r.state().level.doors.get(3, 1).map_or(99, |d| d.openness())
    }

    #[test]
    fn interact_opens_the_door_ahead() {
        let mut r = runner();
        assert_eq!(door(&r), CLOSED);
        r.tick(Actions::INTERACT);
        for _ in 0..40 {
            r.tick(Actions::INTERACT); // held: no re-toggle
        }
        assert_eq!(door(&r), OPEN);
    }

    #[test]
    fn walk_through_open_door() {
        let mut r = runner();
        r.tick(Actions::INTERACT);
        for _ in 0..40 {
            r.tick(Actions::empty());
        }
        for _ in 0..10 {
            r.tick(Actions::FORWARD);
        }
        assert!(r.state().player.pos.x > 4.0);
        assert_ne!(r.state().player.bob, 0);
    }

    #[test]
    fn closed_door_stops_the_player() {
        let mut r = runner();
        for _ in 0..10 {
            r.tick(Actions::FORWARD);
        }
        assert!(r.state().player.pos.x < 3.0);
    }

    #[test]
    fn fire_plays_once_and_flashes() {
        struct Count(Rc<Cell<u32>>);
        impl AudioHooks for Count {
            fn play_theme(&mut self) {}
            fn trigger_shot(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }
        let shots = Rc::new(Cell::new(0));
        let level = ascii::parse(HALL, &TileTextures::default()).unwrap();
        let cfg = Config::default();
        let mut r = TicRunner::new(
            level,
            cfg.clone(),
            WeaponSequence::default(),
            Box::new(Count(shots.clone())),
        );

        assert_eq!(r.draw_distance(), cfg.draw_distance);
        r.tick(Actions::FIRE);
        assert_eq!(r.state().weapon_frame(), 1);
        assert_eq!(r.draw_distance(), cfg.flash_draw_distance);

        let mut ticks = 1;
        while r.state().weapon.is_some() {
            r.tick(Actions::FIRE);
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(r.state().weapon_frame(), 0);
        assert_eq!(r.draw_distance(), cfg.draw_distance);
        // held FIRE re-triggered only after the first shot finished
        assert_eq!(shots.get(), 1);
    }

    #[test]
    fn flash_frame_sets_scene_opacity() {
        let level = ascii::parse(HALL, &TileTextures::default()).unwrap();
        let weapon = WeaponSequence {
            flash_opacity: 0.6,
            ..WeaponSequence::default()
        };
        let mut r = TicRunner::new(level, Config::default(), weapon, Box::new(NullAudio));
        assert_eq!(r.scene_opacity(), 1.0);
        r.tick(Actions::FIRE);
        assert_eq!(r.state().weapon_frame(), 1);
        assert!((r.scene_opacity() - 0.6).abs() < 1e-6);
        // past the flash frame the scene is back to full
        for _ in 0..4 {
            r.tick(Actions::empty());
        }
        assert_ne!(r.state().weapon_frame(), 1);
        assert_eq!(r.scene_opacity(), 1.0);
    }

    #[test]
    fn cancel_leaves_nothing_running() {
        let mut r = runner();
        r.tick(Actions::FIRE);
        r.state_mut().cancel_weapon();
        r.tick(Actions::empty());
        assert!(r.state().weapon.is_none());
    }
}
