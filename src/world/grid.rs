use glam::Vec2;
use thiserror::Error;

use crate::world::texture::TextureId;

/// What occupies one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TileKind {
    #[default]
    Free,
    Wall,
    WallDiagonal,
    /// Panel lies on the tile's vertical (constant-x) edges and slides along y.
    VerticalDoor,
    /// Panel lies on the tile's horizontal (constant-y) edges and slides along x.
    HorizontalDoor,
    Teleporter,
    /// Sprite-bearing cell: blocks movement, transparent to rays.
    WorldObject,
}

impl TileKind {
    #[inline]
    pub fn is_door(self) -> bool {
        matches!(self, TileKind::VerticalDoor | TileKind::HorizontalDoor)
    }
}

/// Which quadrant of a diagonal tile is solid.  The diagonal runs between
/// the two corners not named by the variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Diagonal {
    #[default]
    NorthEast,
    NorthWest,
    SouthWest,
    SouthEast,
}

/// Implicit line through a diagonal tile in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DiagonalLine {
    /// `x - y = c`, top-left to bottom-right corner.
    Falling(f32),
    /// `x + y = c`, bottom-left to top-right corner.
    Rising(f32),
}

impl Diagonal {
    pub fn line(self, col: i32, row: i32) -> DiagonalLine {
        match self {
            Diagonal::NorthEast | Diagonal::SouthWest => DiagonalLine::Falling((col - row) as f32),
            Diagonal::NorthWest | Diagonal::SouthEast => {
                DiagonalLine::Rising((col + row + 1) as f32)
            }
        }
    }

    /// True if the in-tile fraction `(fx, fy)` lies in the solid half.
    /// North is `-y`, east is `+x`.
    pub fn is_solid(self, fx: f32, fy: f32) -> bool {
        match self {
            Diagonal::NorthEast => fx > fy,
            Diagonal::SouthWest => fx < fy,
            Diagonal::NorthWest => fx + fy < 1.0,
            Diagonal::SouthEast => fx + fy > 1.0,
        }
    }
}

/// A tile face, named by the compass direction its normal points to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    East,
    West,
    North,
    South,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct WallFaces {
    pub east: TextureId,
    pub west: TextureId,
    pub north: TextureId,
    pub south: TextureId,
}

impl WallFaces {
    pub fn uniform(tex: TextureId) -> Self {
        Self {
            east: tex,
            west: tex,
            north: tex,
            south: tex,
        }
    }

    #[inline]
    pub fn get(&self, face: Face) -> TextureId {
        match face {
            Face::East => self.east,
            Face::West => self.west,
            Face::North => self.north,
            Face::South => self.south,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ceiling {
    Indoor(TextureId),
    /// Open to the sky box.
    Sky,
}

impl Default for Ceiling {
    fn default() -> Self {
        Ceiling::Indoor(0)
    }
}

/// One immutable grid cell.  Door positions live in [`DoorMap`](super::DoorMap).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Tile {
    pub kind: TileKind,
    pub faces: WallFaces,
    pub floor: TextureId,
    pub ceiling: Ceiling,
    pub diagonal: Diagonal,
}

impl Tile {
    pub fn free(floor: TextureId, ceiling: Ceiling) -> Self {
        Self {
            floor,
            ceiling,
            ..Self::default()
        }
    }

    pub fn wall(tex: TextureId) -> Self {
        Self {
            kind: TileKind::Wall,
            faces: WallFaces::uniform(tex),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must have at least one row and one column")]
    Empty,

    #[error("grid is {cols}×{rows} but {found} tiles were supplied")]
    SizeMismatch { cols: usize, rows: usize, found: usize },

    #[error("door tile at ({x}, {y}) has no registered door")]
    MissingDoor { x: usize, y: usize },
}

/// Row-major `rows × cols` tile array.
#[derive(Clone, Debug)]
pub struct Grid {
    cols: usize,
    rows: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn new(cols: usize, rows: usize, tiles: Vec<Tile>) -> Result<Self, GridError> {
        if cols == 0 || rows == 0 {
            return Err(GridError::Empty);
        }
        if tiles.len() != cols * rows {
            return Err(GridError::SizeMismatch {
                cols,
                rows,
                found: tiles.len(),
            });
        }
        Ok(Self { cols, rows, tiles })
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Row-major index of `(x, y)`, or `None` outside the grid.
    #[inline]
    pub fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return None;
        }
        Some(y as usize * self.cols + x as usize)
    }

    #[inline]
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.offset(x, y).map(|i| &self.tiles[i])
    }

    /// Tile under a continuous world position.
    #[inline]
    pub fn tile_at(&self, p: Vec2) -> Option<&Tile> {
        self.tile(p.x.floor() as i32, p.y.floor() as i32)
    }

    #[inline]
    pub fn kind(&self, x: i32, y: i32) -> Option<TileKind> {
        self.tile(x, y).map(|t| t.kind)
    }

    /// `(x, y, tile)` for every cell, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, t)| (i % self.cols, i / self.cols, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(cols: usize, rows: usize) -> Grid {
        let mut tiles = vec![Tile::free(1, Ceiling::Indoor(2)); cols * rows];
        for y in 0..rows {
            for x in 0..cols {
                if x == 0 || y == 0 || x == cols - 1 || y == rows - 1 {
                    tiles[y * cols + x] = Tile::wall(3);
                }
            }
        }
        Grid::new(cols, rows, tiles).unwrap()
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let err = Grid::new(3, 3, vec![Tile::default(); 8]).unwrap_err();
        assert_eq!(
            err,
            GridError::SizeMismatch {
                cols: 3,
                rows: 3,
                found: 8
            }
        );
        assert_eq!(Grid::new(0, 3, vec![]).unwrap_err(), GridError::Empty);
    }

    #[test]
    fn lookups_respect_bounds() {
        let g = ring(4, 3);
        assert_eq!(g.kind(0, 0), Some(TileKind::Wall));
        assert_eq!(g.kind(1, 1), Some(TileKind::Free));
        assert_eq!(g.kind(4, 0), None);
        assert_eq!(g.kind(-1, 1), None);
        assert_eq!(g.offset(3, 2), Some(11));
        assert_eq!(g.tile_at(Vec2::new(1.9, 1.1)).map(|t| t.floor), Some(1));
    }

    #[test]
    fn iter_is_row_major() {
        let g = ring(3, 2);
        let coords: Vec<_> = g.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords[..4], [(0, 0), (1, 0), (2, 0), (0, 1)]);
    }

    #[test]
    fn diagonal_halves() {
        // NE: the upper-right triangle is solid
        assert!(Diagonal::NorthEast.is_solid(0.9, 0.1));
        assert!(!Diagonal::NorthEast.is_solid(0.1, 0.9));
        assert!(Diagonal::SouthWest.is_solid(0.1, 0.9));
        assert!(Diagonal::NorthWest.is_solid(0.1, 0.1));
        assert!(Diagonal::SouthEast.is_solid(0.9, 0.9));
    }

    #[test]
    fn diagonal_lines_pass_through_tile_corners() {
        match Diagonal::NorthEast.line(3, 2) {
            // (3,2) and (4,3) both satisfy x - y = 1
            DiagonalLine::Falling(c) => assert_eq!(c, 1.0),
            other => panic!("unexpected {other:?}"),
        }
        match Diagonal::SouthEast.line(3, 2) {
            // (3,3) and (4,2) both satisfy x + y = 6
            DiagonalLine::Rising(c) => assert_eq!(c, 6.0),
            other => panic!("unexpected {other:?}"),
        }
    }
}
