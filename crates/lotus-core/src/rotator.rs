//! Euler rotation type and rotation interpolation
//!
//! Angles are stored in radians. Yaw 0 looks down -Z, positive yaw turns
//! toward +X, positive pitch looks up. This is the same convention the
//! camera uses for its forward vector.

use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Wrap an angle in radians into (-PI, PI]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut wrapped = angle % TAU;
    if wrapped > PI {
        wrapped -= TAU;
    } else if wrapped <= -PI {
        wrapped += TAU;
    }
    wrapped
}

/// Pitch/yaw/roll rotation in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub const ZERO: Rotator = Rotator::new(0.0, 0.0, 0.0);

    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Rotation that looks along `direction`. Roll is always zero.
    ///
    /// A zero-length direction yields [`Rotator::ZERO`].
    pub fn from_direction(direction: Vec3) -> Self {
        if direction.length_squared() <= f32::EPSILON {
            return Self::ZERO;
        }
        let horizontal = Vec3::new(direction.x, 0.0, direction.z).length();
        Self {
            pitch: direction.y.atan2(horizontal),
            yaw: direction.x.atan2(-direction.z),
            roll: 0.0,
        }
    }

    /// Unit forward vector for this rotation (roll does not affect it)
    pub fn forward(&self) -> Vec3 {
        let cos_pitch = self.pitch.cos();
        Vec3::new(
            self.yaw.sin() * cos_pitch,
            self.pitch.sin(),
            -self.yaw.cos() * cos_pitch,
        )
    }

    /// Same rotation with pitch and roll removed
    pub fn yaw_only(&self) -> Self {
        Self::new(0.0, self.yaw, 0.0)
    }

    /// Every component wrapped into (-PI, PI]
    pub fn normalized(&self) -> Self {
        Self {
            pitch: normalize_angle(self.pitch),
            yaw: normalize_angle(self.yaw),
            roll: normalize_angle(self.roll),
        }
    }

    /// Shortest signed per-axis difference from `self` to `target`
    pub fn delta_to(&self, target: Rotator) -> Rotator {
        Rotator {
            pitch: normalize_angle(target.pitch - self.pitch),
            yaw: normalize_angle(target.yaw - self.yaw),
            roll: normalize_angle(target.roll - self.roll),
        }
    }

    /// Check whether every component is within `tolerance` radians of zero
    pub fn is_nearly_zero(&self, tolerance: f32) -> bool {
        self.pitch.abs() <= tolerance && self.yaw.abs() <= tolerance && self.roll.abs() <= tolerance
    }

    /// Quaternion matching [`Rotator::forward`]
    pub fn to_quat(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, -self.yaw, self.pitch, self.roll)
    }
}

impl std::ops::Add for Rotator {
    type Output = Rotator;

    fn add(self, rhs: Rotator) -> Rotator {
        Rotator::new(self.pitch + rhs.pitch, self.yaw + rhs.yaw, self.roll + rhs.roll)
    }
}

impl std::ops::Mul<f32> for Rotator {
    type Output = Rotator;

    fn mul(self, rhs: f32) -> Rotator {
        Rotator::new(self.pitch * rhs, self.yaw * rhs, self.roll * rhs)
    }
}

/// Moves a rotation toward a target over time.
///
/// Implementations must return `target` exactly when `dt` is zero; the
/// lock-on controller relies on this for its first-frame snap.
pub trait RotationInterpolator {
    fn interpolate(&self, current: Rotator, target: Rotator, dt: f32, speed: f32) -> Rotator;
}

/// Constant-fraction interpolation along the shortest arc of each axis
#[derive(Debug, Clone, Copy, Default)]
pub struct InterpTo;

impl RotationInterpolator for InterpTo {
    fn interpolate(&self, current: Rotator, target: Rotator, dt: f32, speed: f32) -> Rotator {
        if dt == 0.0 || speed <= 0.0 {
            return target;
        }

        let delta = current.delta_to(target);
        if delta.is_nearly_zero(1e-6) {
            return target;
        }

        let alpha = (dt * speed).clamp(0.0, 1.0);
        (current + delta * alpha).normalized()
    }
}
