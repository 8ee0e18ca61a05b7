//! Camera configuration

use serde::{Deserialize, Serialize};

/// Third-person camera boom configuration.
///
/// Lengths are world units (centimetres), angles are degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Boom length from the pivot to the camera
    pub arm_length: f32,
    /// Shortest the boom may get when pulled in by geometry
    pub min_arm_length: f32,
    /// Mouse sensitivity (radians per look unit)
    pub sensitivity: f32,
    /// Minimum pitch angle in degrees
    pub pitch_min: f32,
    /// Maximum pitch angle in degrees
    pub pitch_max: f32,
    /// Clearance kept between the camera and geometry
    pub collision_radius: f32,
    /// Horizontal offset in third person (shoulder view)
    pub shoulder_offset: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            arm_length: 400.0,
            min_arm_length: 50.0,
            sensitivity: 0.003,
            pitch_min: -80.0,
            pitch_max: 80.0,
            collision_radius: 12.0,
            shoulder_offset: 0.0,
        }
    }
}
