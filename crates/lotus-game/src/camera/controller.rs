//! Camera controller with mouse look and a collision-aware boom

use glam::{Vec2, Vec3};
use lotus_core::{normalize_angle, Rotator};
use lotus_physics::{PhysicsWorld, WORLD_GROUP};
use rapier3d::prelude::{Group, InteractionGroups, QueryFilter};

use super::CameraConfig;

/// Camera controller
pub struct CameraController {
    /// Configuration
    pub config: CameraConfig,
    /// Control rotation (pitch and yaw; roll stays zero)
    rotation: Rotator,
    /// Camera world position (computed each update)
    position: Vec3,
    /// Boom length after collision
    arm_length: f32,
    /// Set once the boom has been placed at least once
    placed: bool,
}

impl CameraController {
    /// Create a new camera controller
    pub fn new() -> Self {
        Self::with_config(CameraConfig::default())
    }

    /// Create a camera controller with custom config
    pub fn with_config(config: CameraConfig) -> Self {
        let arm_length = config.arm_length;
        Self {
            config,
            rotation: Rotator::ZERO,
            position: Vec3::ZERO,
            arm_length,
            placed: false,
        }
    }

    /// Get the camera's current world position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current boom length, shorter than configured when geometry is in the way
    pub fn arm_length(&self) -> f32 {
        self.arm_length
    }

    /// Whether [`CameraController::update`] has placed the camera yet
    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub fn rotation(&self) -> Rotator {
        self.rotation
    }

    /// Set the control rotation. Pitch is clamped to the configured range.
    pub fn set_rotation(&mut self, rotation: Rotator) {
        self.rotation = Rotator::new(
            self.clamp_pitch(rotation.pitch),
            normalize_angle(rotation.yaw),
            0.0,
        );
    }

    /// Get the camera's forward direction
    pub fn forward(&self) -> Vec3 {
        self.rotation.forward()
    }

    /// Get the camera's right direction
    pub fn right(&self) -> Vec3 {
        let yaw = self.rotation.yaw;
        Vec3::new(yaw.cos(), 0.0, yaw.sin())
    }

    /// Handle mouse look input
    pub fn handle_mouse_look(&mut self, mouse_delta: Vec2) {
        let yaw = self.rotation.yaw + mouse_delta.x * self.config.sensitivity;
        let pitch = self.rotation.pitch - mouse_delta.y * self.config.sensitivity;
        self.set_rotation(Rotator::new(pitch, yaw, 0.0));
    }

    /// Place the camera behind `pivot` along the current rotation.
    ///
    /// With a physics world the boom is shortened so the camera stays in front
    /// of world geometry. Pawns never pull the camera in.
    pub fn update(&mut self, pivot: Vec3, physics: Option<&PhysicsWorld>) {
        let shoulder = self.right() * self.config.shoulder_offset;
        let ray_start = pivot + shoulder;
        let back = -self.forward();
        let mut length = self.config.arm_length;

        if let Some(physics) = physics {
            let filter =
                QueryFilter::default().groups(InteractionGroups::new(Group::ALL, WORLD_GROUP));
            let ray_length = length + self.config.collision_radius;

            if let Some((_handle, toi)) = physics.raycast(ray_start, back, ray_length, filter) {
                // Camera would clip - move it closer
                length = (toi - self.config.collision_radius)
                    .max(self.config.min_arm_length)
                    .min(length);
            }
        }

        self.arm_length = length;
        self.position = ray_start + back * length;
        self.placed = true;
    }

    fn clamp_pitch(&self, pitch: f32) -> f32 {
        pitch.clamp(
            self.config.pitch_min.to_radians(),
            self.config.pitch_max.to_radians(),
        )
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotus_ecs::Entity;

    #[test]
    fn test_camera_controller_creation() {
        let camera = CameraController::new();
        assert_eq!(camera.rotation(), Rotator::ZERO);
        assert!(!camera.is_placed());
    }

    #[test]
    fn test_camera_pitch_clamping() {
        let mut camera = CameraController::new();
        camera.set_rotation(Rotator::new(100.0_f32.to_radians(), 0.0, 0.0));
        assert!(camera.rotation().pitch <= camera.config.pitch_max.to_radians() + 0.01);

        camera.handle_mouse_look(Vec2::new(0.0, 100_000.0));
        assert!(camera.rotation().pitch >= camera.config.pitch_min.to_radians() - 0.01);
    }

    #[test]
    fn test_mouse_look_turns_right() {
        let mut camera = CameraController::new();
        camera.handle_mouse_look(Vec2::new(100.0, 0.0));
        assert!((camera.rotation().yaw - 0.3).abs() < 1e-5);
        assert!(camera.forward().x > 0.0);
    }

    #[test]
    fn test_boom_hangs_behind_pivot() {
        let mut camera = CameraController::new();
        camera.update(Vec3::new(0.0, 160.0, 0.0), None);

        assert!(camera.is_placed());
        assert!((camera.position() - Vec3::new(0.0, 160.0, 400.0)).length() < 1e-3);
    }

    #[test]
    fn test_boom_pulled_in_by_wall_but_not_pawns() {
        let mut physics = PhysicsWorld::new();
        physics.create_static_box(Vec3::new(500.0, 500.0, 10.0), Vec3::new(0.0, 0.0, 200.0));
        physics.add_pawn_capsule(Entity::from_raw(3, 0), Vec3::new(0.0, 100.0, 100.0), 60.0, 35.0);
        physics.sync_queries();

        let mut camera = CameraController::new();
        camera.update(Vec3::new(0.0, 160.0, 0.0), Some(&physics));

        // Wall face at z = 190, minus clearance
        assert!((camera.arm_length() - 178.0).abs() < 0.5);
        assert!(camera.position().z < 190.0);
    }
}
