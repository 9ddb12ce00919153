//! Plain-text map format.
//!
//! ```text
//! #########
//! #@..V..~#
//! #1..#..P#
//! #########
//!
//! facing 90
//! teleport 7 2 1.5 2.5 0
//! ```
//!
//! Grid rows come first and end at the first blank line.  Legend:
//!
//! | glyph      | tile                                   |
//! |------------|----------------------------------------|
//! | `#`        | wall                                   |
//! | `.` / ` `  | free, indoor ceiling                   |
//! | `~`        | free, open to the sky                  |
//! | `V` / `H`  | vertical / horizontal sliding door     |
//! | `P`        | teleporter (needs a `teleport` line)   |
//! | `O`        | world object (blocks movement only)    |
//! | `1`..`4`   | diagonal wall, solid NE / NW / SW / SE |
//! | `@`        | player start                           |
//!
//! Directives use degrees, clockwise from east (`+y` is south).

use glam::Vec2;
use log::debug;
use thiserror::Error;

use crate::world::grid::{Ceiling, Diagonal, Grid, GridError, Tile, TileKind, WallFaces};
use crate::world::level::Level;
use crate::world::player::Player;
use crate::world::teleport::TeleportLink;
use crate::world::texture::{NO_TEXTURE, TextureId};

#[derive(Debug, Error, PartialEq)]
pub enum MapError {
    #[error("map has no grid rows")]
    Empty,

    #[error("row {row} is {found} tiles wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile glyph {glyph:?} at ({x}, {y})")]
    UnknownTile { glyph: char, x: usize, y: usize },

    #[error("map has no player start `@`")]
    NoStart,

    #[error("second player start at ({x}, {y})")]
    DuplicateStart { x: usize, y: usize },

    #[error("line {line}: cannot parse directive `{text}`")]
    BadDirective { line: usize, text: String },

    #[error("teleport source ({x}, {y}) is not a teleporter tile")]
    NotTeleporter { x: i32, y: i32 },

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Texture ids assigned to each glyph class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileTextures {
    pub wall: WallFaces,
    pub diagonal: TextureId,
    pub door: TextureId,
    pub door_dock: TextureId,
    pub floor: TextureId,
    pub ceiling: TextureId,
    pub teleporter: TextureId,
    pub object: TextureId,
    pub sky: Option<TextureId>,
}

impl Default for TileTextures {
    fn default() -> Self {
        Self {
            wall: WallFaces::uniform(NO_TEXTURE),
            diagonal: NO_TEXTURE,
            door: NO_TEXTURE,
            door_dock: NO_TEXTURE,
            floor: NO_TEXTURE,
            ceiling: NO_TEXTURE,
            teleporter: NO_TEXTURE,
            object: NO_TEXTURE,
            sky: None,
        }
    }
}

impl TileTextures {
    fn tile(&self, glyph: char) -> Option<Tile> {
        let indoor = Ceiling::Indoor(self.ceiling);
        let open = Tile::free(self.floor, indoor);
        let solid = |kind, faces| Tile {
            kind,
            faces,
            ..open
        };
        let diagonal = |d| Tile {
            diagonal: d,
            ..solid(TileKind::WallDiagonal, WallFaces::uniform(self.diagonal))
        };
        Some(match glyph {
            '.' | ' ' | '@' => open,
            '~' => Tile::free(self.floor, Ceiling::Sky),
            '#' => solid(TileKind::Wall, self.wall),
            'V' => solid(TileKind::VerticalDoor, WallFaces::uniform(self.door)),
            'H' => solid(TileKind::HorizontalDoor, WallFaces::uniform(self.door)),
            'P' => Tile {
                kind: TileKind::Teleporter,
                floor: self.teleporter,
                ..open
            },
            'O' => solid(TileKind::WorldObject, WallFaces::uniform(self.object)),
            '1' => diagonal(Diagonal::NorthEast),
            '2' => diagonal(Diagonal::NorthWest),
            '3' => diagonal(Diagonal::SouthWest),
            '4' => diagonal(Diagonal::SouthEast),
            _ => return None,
        })
    }
}

/// Parse a map and build its level.  Doors start closed.
pub fn parse(src: &str, textures: &TileTextures) -> Result<Level, MapError> {
    let mut lines = src
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .enumerate()
        .skip_while(|(_, l)| l.trim().is_empty())
        .peekable();

    let mut rows: Vec<&str> = Vec::new();
    while let Some((_, line)) = lines.next_if(|(_, l)| !l.trim().is_empty()) {
        rows.push(line);
    }
    let Some(first) = rows.first() else {
        return Err(MapError::Empty);
    };

    let cols = first.chars().count();
    let mut tiles = Vec::with_capacity(cols * rows.len());
    let mut start = None;
    for (y, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != cols {
            return Err(MapError::Ragged {
                row: y,
                expected: cols,
                found,
            });
        }
        for (x, glyph) in row.chars().enumerate() {
            let tile = textures
                .tile(glyph)
                .ok_or(MapError::UnknownTile { glyph, x, y })?;
            if glyph == '@' {
                if start.is_some() {
                    return Err(MapError::DuplicateStart { x, y });
                }
                start = Some(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
            }
            tiles.push(tile);
        }
    }
    let start = start.ok_or(MapError::NoStart)?;

    let grid = Grid::new(cols, rows.len(), tiles)?;
    let mut level = Level::new(grid, Player::new(start, 0.0), textures.door_dock, textures.sky);

    for (n, line) in lines {
        let text = line.trim();
        if text.is_empty() || text.starts_with("//") {
            continue;
        }
        let bad = || MapError::BadDirective {
            line: n + 1,
            text: text.to_string(),
        };
        let mut words = text.split_whitespace();
        match words.next() {
            Some("facing") => {
                let [deg] = parse_args(&mut words).ok_or_else(bad)?;
                level.spawn.set_angle(deg.to_radians());
            }
            Some("teleport") => {
                let [x, y, to_x, to_y, deg] = parse_args(&mut words).ok_or_else(bad)?;
                let from = (x as i32, y as i32);
                if x.fract() != 0.0 || y.fract() != 0.0 {
                    return Err(bad());
                }
                if level.grid.kind(from.0, from.1) != Some(TileKind::Teleporter) {
                    return Err(MapError::NotTeleporter {
                        x: from.0,
                        y: from.1,
                    });
                }
                let to = Vec2::new(to_x, to_y);
                if level.grid.tile_at(to).is_none() {
                    return Err(bad());
                }
                debug!("teleport {from:?} -> {to} facing {deg}°");
                level.teleports.insert(TeleportLink {
                    from,
                    to,
                    angle: deg.to_radians(),
                });
            }
            _ => return Err(bad()),
        }
    }

    Ok(level)
}

/// Exactly `N` numeric words, nothing after them.
fn parse_args<'a, const N: usize, I>(words: &mut I) -> Option<[f32; N]>
where
    I: Iterator<Item = &'a str>,
{
    let mut out = [0.0; N];
    for slot in &mut out {
        *slot = words.next()?.parse().ok()?;
    }
    words.next().is_none().then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::door::CLOSED;

    fn textures() -> TileTextures {
        TileTextures {
            wall: WallFaces::uniform(1),
            door: 2,
            door_dock: 3,
            sky: Some(4),
            ..TileTextures::default()
        }
    }

    const MAP: &str = "\
#######
#@.V.P#
#1~H.O#
#######

facing 90
teleport 5 1 1.5 2.5 180
";

    #[test]
    fn parses_tiles_and_directives() {
        let level = parse(MAP, &textures()).unwrap();
        let g = &level.grid;
        assert_eq!((g.cols(), g.rows()), (7, 4));
        assert_eq!(g.kind(0, 0), Some(TileKind::Wall));
        assert_eq!(g.kind(3, 1), Some(TileKind::VerticalDoor));
        assert_eq!(g.kind(3, 2), Some(TileKind::HorizontalDoor));
        assert_eq!(g.kind(5, 2), Some(TileKind::WorldObject));
        assert_eq!(g.tile(1, 2).map(|t| t.diagonal), Some(Diagonal::NorthEast));
        assert_eq!(g.tile(2, 2).map(|t| t.ceiling), Some(Ceiling::Sky));

        assert_eq!(level.spawn.pos, Vec2::new(1.5, 1.5));
        assert!((level.spawn.angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(level.doors.len(), 2);
        assert_eq!(level.doors.get(3, 1).map(|d| d.openness()), Some(CLOSED));
        assert_eq!(level.teleports.get(5, 1).map(|t| t.to), Some(Vec2::new(1.5, 2.5)));
        assert_eq!(level.door_dock, 3);
    }

    #[test]
    fn empty_and_ragged_maps_fail() {
        assert_eq!(parse("\n\n", &textures()).unwrap_err(), MapError::Empty);
        assert_eq!(
            parse("###\n#@\n###\n", &textures()).unwrap_err(),
            MapError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn glyph_and_start_errors() {
        assert_eq!(
            parse("#@X\n", &textures()).unwrap_err(),
            MapError::UnknownTile {
                glyph: 'X',
                x: 2,
                y: 0
            }
        );
        assert_eq!(parse("#..\n", &textures()).unwrap_err(), MapError::NoStart);
        assert_eq!(
            parse("@.@\n", &textures()).unwrap_err(),
            MapError::DuplicateStart { x: 2, y: 0 }
        );
    }

    #[test]
    fn directive_errors() {
        assert!(matches!(
            parse("#@#\n\nfacing north\n", &textures()).unwrap_err(),
            MapError::BadDirective { line: 3, .. }
        ));
        assert!(matches!(
            parse("#@#\n\nwarp 1 2\n", &textures()).unwrap_err(),
            MapError::BadDirective { .. }
        ));
        assert_eq!(
            parse("#@.\n\nteleport 2 0 1.5 0.5 0\n", &textures()).unwrap_err(),
            MapError::NotTeleporter { x: 2, y: 0 }
        );
        assert!(matches!(
            parse("#@P\n\nteleport 2 0 9.5 0.5 0\n", &textures()).unwrap_err(),
            MapError::BadDirective { .. }
        ));
    }

    #[test]
    fn bundled_demo_map_parses() {
        let level = parse(include_str!("../../maps/demo.txt"), &textures()).unwrap();
        assert_eq!((level.grid.cols(), level.grid.rows()), (24, 11));
        assert_eq!(level.doors.len(), 2);
        assert_eq!(level.teleports.len(), 2);
        assert_eq!(level.teleports.report_unlinked(&level.grid), 0);
        assert_eq!(level.spawn.pos, Vec2::new(1.5, 1.5));
    }
}
