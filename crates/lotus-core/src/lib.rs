//! Lotus Core - Core types and utilities for Steel Lotus
//!
//! This crate provides the foundational types used throughout the game:
//! - Mathematical primitives (re-exported from glam)
//! - Transform and Rotator types for placing and orienting actors
//! - Rotation interpolation used by camera and facing convergence
//! - Fixed-step game clock

pub mod rotator;
pub mod time;
pub mod types;

pub use glam::{Quat, Vec2, Vec3};
pub use rotator::{normalize_angle, InterpTo, RotationInterpolator, Rotator};
pub use time::{GameTime, TimeConfig};
pub use types::Transform;
