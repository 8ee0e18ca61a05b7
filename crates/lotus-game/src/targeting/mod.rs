//! Target lock-on
//!
//! [`find_best_target`] filters and scores candidates around the player;
//! [`LockOnController`] keeps the chosen target and steers the character and
//! camera toward it every tick.

pub mod acquisition;
mod collaborators;
mod config;
mod controller;
mod lockable;
mod observer;

pub use acquisition::{compute_score, find_best_target, ScoringContext};
pub use collaborators::{LockOnOwner, OrientationFlags, TargetWorld};
pub use config::{ConfigError, LockOnConfig};
pub use controller::{LockOnController, LockState};
pub use lockable::LockableTarget;
pub use observer::{LockOnObserver, LockReleaseReason, TracingObserver};
