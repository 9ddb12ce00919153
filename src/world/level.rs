use log::info;
use thiserror::Error;

use crate::world::door::DoorMap;
use crate::world::grid::{Ceiling, Grid, GridError};
use crate::world::player::Player;
use crate::world::teleport::Teleports;
use crate::world::texture::{TextureBank, TextureId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("tile ({x}, {y}) references texture {id} which is not loaded")]
    TileTexture { x: usize, y: usize, id: TextureId },

    #[error("{role} texture {id} is not loaded")]
    Texture { role: &'static str, id: TextureId },

    #[error("tile ({x}, {y}) is open to the sky but the level has no sky texture")]
    NoSky { x: usize, y: usize },
}

/// Everything the simulation and renderer need about one map.
#[derive(Clone, Debug)]
pub struct Level {
    pub grid: Grid,
    pub doors: DoorMap,
    pub teleports: Teleports,
    pub spawn: Player,
    /// Drawn on the jambs a sliding door retracts into.
    pub door_dock: TextureId,
    pub sky: Option<TextureId>,
}

impl Level {
    /// Registers one closed door per door tile.
    pub fn new(grid: Grid, spawn: Player, door_dock: TextureId, sky: Option<TextureId>) -> Self {
        let doors = DoorMap::scan(&grid, 1, 1);
        Self {
            grid,
            doors,
            teleports: Teleports::default(),
            spawn,
            door_dock,
            sky,
        }
    }

    /// One-time setup check.  Once this passes the renderer assumes every
    /// door and texture lookup resolves.
    pub fn validate(&self, bank: &TextureBank) -> Result<(), LevelError> {
        self.doors.validate(&self.grid)?;

        let check = |role, id| {
            if bank.contains(id) {
                Ok(())
            } else {
                Err(LevelError::Texture { role, id })
            }
        };
        check("door dock", self.door_dock)?;
        if let Some(sky) = self.sky {
            check("sky", sky)?;
        }

        for (x, y, tile) in self.grid.iter() {
            let f = tile.faces;
            let mut ids = vec![f.east, f.west, f.north, f.south, tile.floor];
            match tile.ceiling {
                Ceiling::Indoor(id) => ids.push(id),
                Ceiling::Sky if self.sky.is_none() => return Err(LevelError::NoSky { x, y }),
                Ceiling::Sky => {}
            }
            if let Some(&id) = ids.iter().find(|&&id| !bank.contains(id)) {
                return Err(LevelError::TileTexture { x, y, id });
            }
        }

        let unlinked = self.teleports.report_unlinked(&self.grid);
        info!(
            "level {}×{}: {} doors, {} teleports ({} unlinked)",
            self.grid.cols(),
            self.grid.rows(),
            self.doors.len(),
            self.teleports.len(),
            unlinked
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::grid::{Tile, TileKind};
    use crate::world::texture::Texture;
    use glam::Vec2;

    fn bank() -> TextureBank {
        let mut b = TextureBank::default_with_checker();
        b.insert("WALL", Texture::solid("WALL", 4, 4, 0xFFFF_FFFF))
            .unwrap();
        b
    }

    fn level(tiles: Vec<Tile>) -> Level {
        let grid = Grid::new(2, 1, tiles).unwrap();
        Level::new(grid, Player::new(Vec2::new(0.5, 0.5), 0.0), 0, None)
    }

    #[test]
    fn valid_level_passes() {
        let l = level(vec![Tile::free(1, Ceiling::Indoor(0)), Tile::wall(1)]);
        assert_eq!(l.validate(&bank()), Ok(()));
    }

    #[test]
    fn unknown_texture_fails_fast() {
        let l = level(vec![Tile::free(0, Ceiling::Indoor(0)), Tile::wall(9)]);
        assert_eq!(
            l.validate(&bank()),
            Err(LevelError::TileTexture { x: 1, y: 0, id: 9 })
        );
    }

    #[test]
    fn sky_ceiling_needs_sky_texture() {
        let l = level(vec![Tile::free(0, Ceiling::Sky), Tile::wall(1)]);
        assert_eq!(l.validate(&bank()), Err(LevelError::NoSky { x: 0, y: 0 }));
    }

    #[test]
    fn unregistered_door_is_fatal() {
        let mut door = Tile::wall(1);
        door.kind = TileKind::VerticalDoor;
        let mut l = level(vec![Tile::free(0, Ceiling::Indoor(0)), door]);
        l.doors = DoorMap::default();
        assert_eq!(
            l.validate(&bank()),
            Err(LevelError::Grid(GridError::MissingDoor { x: 1, y: 0 }))
        );
    }
}
