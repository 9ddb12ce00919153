mod anim;
mod audio;
mod input;
pub mod movement;
mod tic;

pub use anim::{Animation, Completion};
pub use audio::{AudioHooks, NullAudio};
pub use input::{Actions, InputError};
pub use movement::{BOB_APEX, WalkBob};
pub use tic::{GameState, TicRunner, WeaponSequence};
