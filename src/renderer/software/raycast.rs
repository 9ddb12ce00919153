//! Grid ray caster.
//!
//! Every ray runs two independent grid-line marches, one stepping across
//! integer-x lines and one across integer-y lines.  Distances stay squared
//! until the winner is picked; the square root is taken once per ray.
//!
//! ```text
//!          x=3   x=4   x=5           V: hits on x = const lines
//!     y=2 ──┼─────┼─────┼──          H: hits on y = const lines
//!           │  H  │     │
//!     y=3 ──┼──●──┼─────┼──
//!           │   ╲ V     │
//!     y=4 ──┼────●┼─────┼──
//! ```

use glam::Vec2;

use crate::world::{DiagonalLine, Door, Face, Level, TextureId, Tile, TileKind};

/// Ray components below this are treated as parallel to the grid lines.
const PARALLEL_EPS: f32 = 1e-6;

/// Which family of grid lines the winning hit lies on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    /// `x = const`; east / west faces.
    #[default]
    Vertical,
    /// `y = const`; north / south faces.
    Horizontal,
}

impl Side {
    /// `(col, row)` from march-local `(major, minor)`.
    #[inline(always)]
    fn tile(self, major: i32, minor: i32) -> (i32, i32) {
        match self {
            Side::Vertical => (major, minor),
            Side::Horizontal => (minor, major),
        }
    }

    /// Face seen when crossing this side's lines in the positive direction.
    #[inline(always)]
    fn face(self, forward: bool) -> Face {
        match (self, forward) {
            (Side::Vertical, true) => Face::West,
            (Side::Vertical, false) => Face::East,
            (Side::Horizontal, true) => Face::North,
            (Side::Horizontal, false) => Face::South,
        }
    }

    /// Door whose panel sits on this side's lines.
    #[inline(always)]
    fn door(self) -> TileKind {
        match self {
            Side::Vertical => TileKind::VerticalDoor,
            Side::Horizontal => TileKind::HorizontalDoor,
        }
    }

    /// Door whose jambs are this side's lines.
    #[inline(always)]
    fn docked_door(self) -> TileKind {
        match self {
            Side::Vertical => TileKind::HorizontalDoor,
            Side::Horizontal => TileKind::VerticalDoor,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// World angle, used for sky lookup and fisheye correction.
    pub angle: f32,
    /// Unit direction.
    pub dir: Vec2,
}

impl Ray {
    pub fn from_angle(angle: f32) -> Self {
        Self {
            angle,
            dir: Vec2::from_angle(angle),
        }
    }

    pub fn from_dir(dir: Vec2) -> Self {
        let dir = dir.normalize_or_zero();
        Self {
            angle: dir.y.atan2(dir.x),
            dir,
        }
    }
}

/// What a ray struck, when it struck something real.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub texture: TextureId,
    pub face: Face,
    /// Horizontal texture coordinate in `[0, 1)`.
    pub offset: f32,
    pub tile: (i32, i32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Euclidean distance, clamped to the draw distance.
    pub dist: f32,
    pub side: Side,
    /// `None` for the synthetic hit at draw distance.
    pub surface: Option<Surface>,
}

#[derive(Clone, Copy, Debug)]
struct March {
    dist2: f32,
    surface: Option<Surface>,
}

impl March {
    const PARALLEL: March = March {
        dist2: f32::INFINITY,
        surface: None,
    };

    #[inline]
    fn far(draw2: f32) -> Self {
        Self {
            dist2: draw2,
            surface: None,
        }
    }
}

/// Casts one ray per column, carrying the previous column's side so exact
/// corner ties resolve the same way as their neighbour.
#[derive(Clone, Copy, Debug, Default)]
pub struct RayCaster {
    prev_side: Side,
}

impl RayCaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous column; call at the start of each frame.
    pub fn reset(&mut self) {
        self.prev_side = Side::default();
    }

    #[inline]
    pub fn prev_side(&self) -> Side {
        self.prev_side
    }

    pub fn cast(&mut self, level: &Level, origin: Vec2, ray: &Ray, draw_distance: f32) -> Hit {
        let draw2 = draw_distance.max(0.0).powi(2);
        let v = march(level, origin, ray.dir, draw2, Side::Vertical);
        let h = march(level, origin, ray.dir, draw2, Side::Horizontal);

        let mut side = if v.dist2 < h.dist2 {
            Side::Vertical
        } else if h.dist2 < v.dist2 {
            Side::Horizontal
        } else {
            self.prev_side
        };

        let mut best = match side {
            Side::Vertical => v,
            Side::Horizontal => h,
        };
        // the marches start at the next grid line; a diagonal sharing the
        // viewer's tile is found here
        if let Some((inside_side, m)) = origin_diagonal(level, origin, ray.dir, draw2) {
            if m.dist2 < best.dist2 {
                side = inside_side;
                best = m;
            }
        }
        self.prev_side = side;

        Hit {
            dist: best.dist2.min(draw2).sqrt(),
            side,
            surface: best.surface,
        }
    }
}

/// Walk one family of grid lines until something qualifies, the ray leaves
/// the grid, or it passes the draw distance.
fn march(level: &Level, o: Vec2, dir: Vec2, draw2: f32, side: Side) -> March {
    // march-local axes: `a` is stepped, `b` follows the slope
    let (oa, ob, da, db) = match side {
        Side::Vertical => (o.x, o.y, dir.x, dir.y),
        Side::Horizontal => (o.y, o.x, dir.y, dir.x),
    };
    if da.abs() < PARALLEL_EPS {
        return March::PARALLEL;
    }
    let forward = da > 0.0;
    let step = if forward { 1 } else { -1 };
    let slope = db / da;
    let face = side.face(forward);

    let mut a = if forward { oa.floor() + 1.0 } else { oa.floor() };
    loop {
        let b = ob + (a - oa) * slope;
        let dist2 = (a - oa) * (a - oa) + (b - ob) * (b - ob);
        if dist2 > draw2 {
            return March::far(draw2);
        }

        let major = a as i32 - if forward { 0 } else { 1 };
        let minor = b.floor() as i32;
        let (col, row) = side.tile(major, minor);
        let Some(tile) = level.grid.tile(col, row) else {
            return March::far(draw2);
        };
        let frac = b - b.floor();
        let surface = |texture, offset| {
            Some(Surface {
                texture,
                face,
                offset,
                tile: (col, row),
            })
        };
        // keep textures reading left-to-right from the viewer's side
        let mirrored = (side == Side::Vertical) != forward;
        let u = if mirrored { 1.0 - frac } else { frac };

        match tile.kind {
            TileKind::Wall => {
                let (nc, nr) = side.tile(major - step, minor);
                let texture = if level.grid.kind(nc, nr) == Some(side.docked_door()) {
                    level.door_dock
                } else {
                    tile.faces.get(face)
                };
                return March {
                    dist2,
                    surface: surface(texture, u),
                };
            }
            TileKind::WallDiagonal => {
                // entry edge of the solid half behaves like a plain wall
                let edge = if forward { 0.0 } else { 1.0 };
                let (fx, fy) = match side {
                    Side::Vertical => (edge, frac),
                    Side::Horizontal => (frac, edge),
                };
                if tile.diagonal.is_solid(fx, fy) {
                    return March {
                        dist2,
                        surface: surface(tile.faces.get(face), u),
                    };
                }
                if let Some((q, offset)) = diagonal_hit(tile, col, row, o, dir, side) {
                    let d2 = (q - o).length_squared();
                    if d2 > draw2 {
                        return March::far(draw2);
                    }
                    return March {
                        dist2: d2,
                        surface: surface(tile.faces.get(face), offset),
                    };
                }
            }
            kind if kind == side.door() => {
                let door = level.doors.get(col, row);
                if door.is_none_or(|d| d.blocks(frac)) {
                    let covered = door.map_or(1.0, Door::covered);
                    // panel edge follows the opening; mirrored like walls
                    let offset = frac + 1.0 - covered;
                    let offset = if mirrored { 1.0 - offset } else { offset };
                    return March {
                        dist2,
                        surface: surface(tile.faces.get(face), offset),
                    };
                }
            }
            _ => {}
        }
        a += step as f32;
    }
}

/// Diagonal of the tile holding `o`, seen from its free half.
fn origin_diagonal(level: &Level, o: Vec2, dir: Vec2, draw2: f32) -> Option<(Side, March)> {
    let (col, row) = (o.x.floor() as i32, o.y.floor() as i32);
    let tile = level.grid.tile(col, row)?;
    if tile.kind != TileKind::WallDiagonal {
        return None;
    }
    // report it against the dominant axis, like a grid-line hit would be
    let side = if dir.x.abs() >= dir.y.abs() {
        Side::Vertical
    } else {
        Side::Horizontal
    };
    let (q, offset) = diagonal_hit(tile, col, row, o, dir, side)?;
    let (fx, fy) = (q.x - col as f32, q.y - row as f32);
    if !(0.0..=1.0).contains(&fx) || !(0.0..=1.0).contains(&fy) {
        return None;
    }
    let dist2 = (q - o).length_squared();
    if dist2 > draw2 {
        return None;
    }
    let forward = match side {
        Side::Vertical => dir.x > 0.0,
        Side::Horizontal => dir.y > 0.0,
    };
    let face = side.face(forward);
    Some((
        side,
        March {
            dist2,
            surface: Some(Surface {
                texture: tile.faces.get(face),
                face,
                offset,
                tile: (col, row),
            }),
        },
    ))
}

/// Intersection of the ray with the tile's diagonal, if it lands inside the
/// tile's band on the axis not being marched.  Returns the point and the
/// texture offset along the diagonal.
fn diagonal_hit(
    tile: &Tile,
    col: i32,
    row: i32,
    o: Vec2,
    dir: Vec2,
    side: Side,
) -> Option<(Vec2, f32)> {
    let (num, den) = match tile.diagonal.line(col, row) {
        DiagonalLine::Falling(c) => (c - o.x + o.y, dir.x - dir.y),
        DiagonalLine::Rising(c) => (c - o.x - o.y, dir.x + dir.y),
    };
    if den.abs() < PARALLEL_EPS {
        return None;
    }
    let t = num / den;
    if t <= 0.0 {
        return None;
    }
    let q = o + dir * t;
    let (across, lo) = match side {
        Side::Vertical => (q.y, row as f32),
        Side::Horizontal => (q.x, col as f32),
    };
    if across < lo || across > lo + 1.0 {
        return None;
    }
    let offset = (q.x - col as f32).clamp(0.0, 1.0 - f32::EPSILON);
    Some((q, offset))
}
