pub mod ascii;
mod door;
mod grid;
mod level;
mod player;
mod teleport;
mod texture;

pub use door::{CLOSED, Door, DoorMap, DoorMotion, DoorOrientation, OPEN};

pub use grid::{
    Ceiling, Diagonal, DiagonalLine, Face, Grid, GridError, Tile, TileKind, WallFaces,
};

pub use level::{Level, LevelError};

pub use player::{EYE_MARGIN, Player, WALL_HEIGHT};

pub use teleport::{TeleportLink, Teleports};

pub use texture::{NO_TEXTURE, Rgba, Texture, TextureBank, TextureError, TextureId, alpha, argb};
