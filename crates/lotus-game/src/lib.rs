//! Lotus Game - Gameplay systems
//!
//! Provides the third-person player character and camera, target lock-on, and
//! a training ground scene that wires them to the entity world and physics.

pub mod camera;
pub mod player;
pub mod targeting;
pub mod training;

pub use camera::{CameraConfig, CameraController};
pub use player::{MovementConfig, PlayerCharacter};
pub use targeting::{
    compute_score, find_best_target, ConfigError, LockOnConfig, LockOnController, LockOnObserver,
    LockOnOwner, LockReleaseReason, LockState, LockableTarget, OrientationFlags, ScoringContext,
    TargetWorld, TracingObserver,
};
pub use training::{DummyEnemy, PracticeTarget, SceneView, TrainingGround};
