//! Player character module
//!
//! Third-person character state: position, facing, orientation mode and the
//! camera it looks through.

mod character;
mod movement;

pub use character::PlayerCharacter;
pub use movement::MovementConfig;
