//! Lock-on tuning

use serde::{Deserialize, Serialize};

/// Errors reported when validating a [`LockOnConfig`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("max_angle_degrees must be in (0, 180], got {0}")]
    AngleOutOfRange(f32),

    #[error("min_lock_pitch ({min}) is greater than max_lock_pitch ({max})")]
    PitchRangeInverted { min: f32, max: f32 },
}

/// Target acquisition and lock-on tracking configuration.
///
/// Distances are world units, angles are degrees, interpolation speeds are
/// per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockOnConfig {
    /// Radius of the spatial query around the owner, also the distance
    /// normaliser for scoring
    pub search_radius: f32,
    /// Candidates and locked targets farther than this are rejected
    pub max_lock_distance: f32,
    /// Half-angle of the forward cone candidates must sit in
    pub max_angle_degrees: f32,
    /// Reject candidates hidden behind geometry
    pub require_line_of_sight: bool,
    /// Score weight for how centred a candidate is
    pub angle_weight: f32,
    /// Score penalty weight for normalised distance
    pub distance_weight: f32,
    /// Character facing convergence speed while locked
    pub lock_face_interp_speed: f32,
    /// Camera convergence speed while locked
    pub lock_on_camera_interp_speed: f32,
    /// Lowest camera pitch allowed while locked
    pub min_lock_pitch: f32,
    /// Highest camera pitch allowed while locked
    pub max_lock_pitch: f32,
    /// Combined yaw + pitch error above which the camera snaps instead of easing
    pub snap_angle_threshold: f32,
    /// Run a zero-delta update right after acquiring so the first frame is already aligned
    pub snap_on_acquire: bool,
}

impl Default for LockOnConfig {
    fn default() -> Self {
        Self {
            search_radius: 2000.0,
            max_lock_distance: 2500.0,
            max_angle_degrees: 60.0,
            require_line_of_sight: true,
            angle_weight: 2.0,
            distance_weight: 1.0,
            lock_face_interp_speed: 12.0,
            lock_on_camera_interp_speed: 8.0,
            min_lock_pitch: -50.0,
            max_lock_pitch: 30.0,
            snap_angle_threshold: 120.0,
            snap_on_acquire: true,
        }
    }
}

impl LockOnConfig {
    /// Cosine of the cone half-angle; candidates need a dot product at least this large
    pub fn min_dot(&self) -> f32 {
        self.max_angle_degrees.to_radians().cos()
    }

    /// Check every tunable is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("search_radius", self.search_radius),
            ("max_lock_distance", self.max_lock_distance),
        ] {
            if value <= 0.0 || value.is_nan() {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if !(self.max_angle_degrees > 0.0 && self.max_angle_degrees <= 180.0) {
            return Err(ConfigError::AngleOutOfRange(self.max_angle_degrees));
        }

        for (field, value) in [
            ("angle_weight", self.angle_weight),
            ("distance_weight", self.distance_weight),
            ("lock_face_interp_speed", self.lock_face_interp_speed),
            ("lock_on_camera_interp_speed", self.lock_on_camera_interp_speed),
            ("snap_angle_threshold", self.snap_angle_threshold),
        ] {
            if value < 0.0 || value.is_nan() {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.min_lock_pitch > self.max_lock_pitch {
            return Err(ConfigError::PitchRangeInverted {
                min: self.min_lock_pitch,
                max: self.max_lock_pitch,
            });
        }

        Ok(())
    }
}
