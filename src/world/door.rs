//! Sliding doors.
//!
//! `openness` is the single source of truth for both the ray caster and
//! collision: a door with openness `n` covers the first `n / 10` of its tile
//! edge, measured along the sliding axis.
//!
//! ```text
//! Closed(10) ─toggle─▶ Opening ─▶ Open(0) ─timer─▶ Closing ─▶ Closed(10)
//!                                   ▲  └── player inside: re-arm timer
//!                                   └───── player enters while closing
//! ```

use glam::{UVec2, Vec2};
use log::debug;

use crate::world::grid::{Grid, GridError, TileKind};

pub const OPEN: u8 = 0;
pub const CLOSED: u8 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorOrientation {
    Vertical,
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorMotion {
    Idle,
    Opening,
    Closing,
}

#[derive(Clone, Debug)]
pub struct Door {
    location: UVec2,
    orientation: DoorOrientation,
    openness: u8,
    motion: DoorMotion,
    /// Ticks until the next one-step openness change.
    step_in: u32,
    /// Armed on reaching fully open; fires the auto-close.
    close_timer: Option<u32>,
}

impl Door {
    pub fn new(location: UVec2, orientation: DoorOrientation) -> Self {
        Self {
            location,
            orientation,
            openness: CLOSED,
            motion: DoorMotion::Idle,
            step_in: 0,
            close_timer: None,
        }
    }

    #[inline]
    pub fn location(&self) -> UVec2 {
        self.location
    }

    #[inline]
    pub fn orientation(&self) -> DoorOrientation {
        self.orientation
    }

    #[inline]
    pub fn openness(&self) -> u8 {
        self.openness
    }

    #[inline]
    pub fn motion(&self) -> DoorMotion {
        self.motion
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.motion != DoorMotion::Idle
    }

    #[inline]
    pub fn close_timer(&self) -> Option<u32> {
        self.close_timer
    }

    /// Clamped to `[OPEN, CLOSED]`; stops any animation in flight.
    pub fn set_openness(&mut self, value: u8) {
        self.openness = value.min(CLOSED);
        self.motion = DoorMotion::Idle;
        self.close_timer = None;
    }

    /// Fraction of the tile edge covered by the panel.
    #[inline]
    pub fn covered(&self) -> f32 {
        self.openness as f32 / CLOSED as f32
    }

    /// `frac` is the position along the sliding axis, in `[0, 1)`.
    #[inline]
    pub fn blocks(&self, frac: f32) -> bool {
        frac < self.covered()
    }

    /// Same test as [`blocks`](Self::blocks) for a world point inside the tile.
    pub fn blocks_point(&self, p: Vec2) -> bool {
        let along = match self.orientation {
            DoorOrientation::Vertical => p.y,
            DoorOrientation::Horizontal => p.x,
        };
        self.blocks(along - along.floor())
    }

    fn begin(&mut self, motion: DoorMotion, step_ticks: u32) {
        self.motion = motion;
        self.step_in = step_ticks;
        self.close_timer = None;
    }

    /// Start opening a closed door or closing an open one.
    ///
    /// Ignored (returns `false`) while animating, or when closing would trap
    /// the player.  A door left half-open by [`set_openness`](Self::set_openness)
    /// opens.
    pub fn toggle(&mut self, occupied: bool, step_ticks: u32) -> bool {
        if self.is_animating() {
            return false;
        }
        let motion = if self.openness == OPEN {
            if occupied {
                return false;
            }
            DoorMotion::Closing
        } else {
            DoorMotion::Opening
        };
        debug!("door {:?}: {:?}", self.location, motion);
        self.begin(motion, step_ticks);
        true
    }

    /// Advance one scheduler tick.
    pub fn tick(&mut self, occupied: bool, step_ticks: u32, close_ticks: u32) {
        match self.motion {
            DoorMotion::Opening => {
                if self.step() {
                    self.openness = self.openness.saturating_sub(1);
                    if self.openness == OPEN {
                        debug!("door {:?}: open", self.location);
                        self.motion = DoorMotion::Idle;
                        self.close_timer = Some(close_ticks);
                    } else {
                        self.step_in = step_ticks;
                    }
                }
            }
            DoorMotion::Closing => {
                if occupied {
                    debug!("door {:?}: blocked, reopening", self.location);
                    self.begin(DoorMotion::Opening, step_ticks);
                    return;
                }
                if self.step() {
                    self.openness = (self.openness + 1).min(CLOSED);
                    if self.openness == CLOSED {
                        debug!("door {:?}: closed", self.location);
                        self.motion = DoorMotion::Idle;
                    } else {
                        self.step_in = step_ticks;
                    }
                }
            }
            DoorMotion::Idle => {
                let Some(left) = self.close_timer else {
                    return;
                };
                if left > 1 {
                    self.close_timer = Some(left - 1);
                } else if occupied {
                    self.close_timer = Some(close_ticks);
                } else {
                    debug!("door {:?}: auto-close", self.location);
                    self.begin(DoorMotion::Closing, step_ticks);
                }
            }
        }
    }

    /// Count down the step timer; true when a step is due.
    fn step(&mut self) -> bool {
        self.step_in = self.step_in.saturating_sub(1);
        self.step_in == 0
    }
}

/// Every door of a level, addressable in O(1) by grid offset.
#[derive(Clone, Debug, Default)]
pub struct DoorMap {
    cols: usize,
    rows: usize,
    slots: Vec<Option<u32>>,
    doors: Vec<Door>,
    step_ticks: u32,
    close_ticks: u32,
}

impl DoorMap {
    /// One closed door for every door-typed tile.
    pub fn scan(grid: &Grid, step_ticks: u32, close_ticks: u32) -> Self {
        let mut slots = vec![None; grid.cols() * grid.rows()];
        let mut doors = Vec::new();
        for (x, y, tile) in grid.iter() {
            let orientation = match tile.kind {
                TileKind::VerticalDoor => DoorOrientation::Vertical,
                TileKind::HorizontalDoor => DoorOrientation::Horizontal,
                _ => continue,
            };
            slots[y * grid.cols() + x] = Some(doors.len() as u32);
            doors.push(Door::new(UVec2::new(x as u32, y as u32), orientation));
        }
        Self {
            cols: grid.cols(),
            rows: grid.rows(),
            slots,
            doors,
            step_ticks: step_ticks.max(1),
            close_ticks: close_ticks.max(1),
        }
    }

    /// Setup check: every door tile of `grid` must resolve.
    pub fn validate(&self, grid: &Grid) -> Result<(), GridError> {
        for (x, y, tile) in grid.iter() {
            if tile.kind.is_door() && self.get(x as i32, y as i32).is_none() {
                return Err(GridError::MissingDoor { x, y });
            }
        }
        Ok(())
    }

    pub fn set_timing(&mut self, step_ticks: u32, close_ticks: u32) {
        self.step_ticks = step_ticks.max(1);
        self.close_ticks = close_ticks.max(1);
    }

    #[inline]
    fn slot(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return None;
        }
        self.slots[y as usize * self.cols + x as usize].map(|i| i as usize)
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Door> {
        self.slot(x, y).map(|i| &self.doors[i])
    }

    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Door> {
        self.slot(x, y).map(|i| &mut self.doors[i])
    }

    pub fn len(&self) -> usize {
        self.doors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Door> + '_ {
        self.doors.iter()
    }

    /// Interact with the door at `(x, y)`.  `player_tile` guards against
    /// closing onto the player.
    pub fn toggle(&mut self, x: i32, y: i32, player_tile: (i32, i32)) -> bool {
        let step = self.step_ticks;
        match self.get_mut(x, y) {
            Some(door) => door.toggle(player_tile == (x, y), step),
            None => false,
        }
    }

    /// Advance every door by one tick.
    pub fn tick(&mut self, player_tile: (i32, i32)) {
        for door in &mut self.doors {
            let at = door.location.as_ivec2();
            let occupied = (at.x, at.y) == player_tile;
            door.tick(occupied, self.step_ticks, self.close_ticks);
        }
    }
}
