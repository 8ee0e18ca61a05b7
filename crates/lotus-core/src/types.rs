//! Core types used throughout Steel Lotus

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::rotator::Rotator;

/// Transform representing position, rotation, and scale of an actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform at `position` oriented by `rotator`
    pub fn from_position_rotator(position: Vec3, rotator: Rotator) -> Self {
        Self {
            position,
            rotation: rotator.to_quat(),
            scale: Vec3::ONE,
        }
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Point an offset expressed in local space into world space
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * (local * self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_matches_rotator_convention() {
        let rotator = Rotator::new(0.0, std::f32::consts::FRAC_PI_2, 0.0);
        let transform = Transform::from_position_rotator(Vec3::ZERO, rotator);
        let forward = transform.forward();
        assert!((forward - rotator.forward()).length() < 1e-5);
    }

    #[test]
    fn test_transform_point_applies_offset() {
        let transform = Transform::from_position(Vec3::new(100.0, 0.0, -50.0));
        let point = transform.transform_point(Vec3::new(0.0, 90.0, 0.0));
        assert_eq!(point, Vec3::new(100.0, 90.0, -50.0));
    }
}
