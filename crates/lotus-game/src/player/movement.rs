//! Movement configuration and constants

use serde::{Deserialize, Serialize};

/// Movement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Walking speed in centimetres per second
    pub walk_speed: f32,
    /// Turn rate when orienting to movement, degrees per second
    pub rotation_rate: f32,
    /// Capsule half height (cylinder part only)
    pub capsule_half_height: f32,
    /// Capsule radius
    pub capsule_radius: f32,
    /// Height of the camera pivot above the feet
    pub eye_height: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 500.0,
            rotation_rate: 540.0,
            capsule_half_height: 60.0,
            capsule_radius: 35.0,
            eye_height: 160.0,
        }
    }
}

impl MovementConfig {
    /// Largest yaw change allowed in `dt` seconds, in radians
    pub fn max_turn(&self, dt: f32) -> f32 {
        self.rotation_rate.to_radians() * dt
    }
}
