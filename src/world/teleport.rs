use std::collections::HashMap;

use glam::Vec2;
use log::warn;

use crate::world::grid::{Grid, TileKind};

/// Stepping onto tile `from` moves the player to `to`, facing `angle`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeleportLink {
    pub from: (i32, i32),
    pub to: Vec2,
    pub angle: f32,
}

/// Teleport links keyed by source tile.
#[derive(Clone, Debug, Default)]
pub struct Teleports {
    links: HashMap<(i32, i32), TeleportLink>,
}

impl Teleports {
    /// Later links for the same tile replace earlier ones.
    pub fn insert(&mut self, link: TeleportLink) {
        self.links.insert(link.from, link);
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&TeleportLink> {
        self.links.get(&(x, y))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Warn about teleporter tiles nobody linked; they act as floor.
    /// Returns how many were found.
    pub fn report_unlinked(&self, grid: &Grid) -> usize {
        let mut unlinked = 0;
        for (x, y, tile) in grid.iter() {
            if tile.kind == TileKind::Teleporter && self.get(x as i32, y as i32).is_none() {
                warn!("teleporter at ({x}, {y}) has no destination");
                unlinked += 1;
            }
        }
        unlinked
    }
}
