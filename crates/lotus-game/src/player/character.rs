//! Player character: movement, facing and look input

use glam::{Vec2, Vec3};
use lotus_core::{normalize_angle, Rotator};
use lotus_ecs::Entity;
use lotus_physics::PhysicsWorld;

use crate::camera::CameraController;
use crate::targeting::{LockOnOwner, OrientationFlags};

use super::MovementConfig;

/// The player-controlled character
pub struct PlayerCharacter {
    /// Movement configuration
    pub config: MovementConfig,
    /// Third-person camera following the character
    pub camera: CameraController,
    entity: Entity,
    /// Feet position
    position: Vec3,
    /// Body yaw (pitch and roll stay zero)
    facing: Rotator,
    orientation: OrientationFlags,
    look_input_enabled: bool,
}

impl PlayerCharacter {
    /// Create a character for `entity` standing at `position`
    pub fn new(entity: Entity, position: Vec3) -> Self {
        Self::with_config(entity, position, MovementConfig::default(), CameraController::new())
    }

    pub fn with_config(
        entity: Entity,
        position: Vec3,
        config: MovementConfig,
        camera: CameraController,
    ) -> Self {
        Self {
            config,
            camera,
            entity,
            position,
            facing: Rotator::ZERO,
            orientation: OrientationFlags::default(),
            look_input_enabled: true,
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Get the character's feet position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Get the camera pivot position
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::Y * self.config.eye_height
    }

    pub fn facing_rotation(&self) -> Rotator {
        self.facing
    }

    pub fn orientation_flags(&self) -> OrientationFlags {
        self.orientation
    }

    pub fn is_look_input_enabled(&self) -> bool {
        self.look_input_enabled
    }

    /// Apply mouse look. Ignored while look input is disabled.
    ///
    /// Returns whether the camera moved.
    pub fn handle_look(&mut self, delta: Vec2) -> bool {
        if !self.look_input_enabled {
            return false;
        }
        self.camera.handle_mouse_look(delta);
        true
    }

    /// Walk relative to the camera yaw.
    ///
    /// `input.y` is forward, `input.x` is right; the vector is clamped to unit
    /// length. Returns the displacement applied.
    pub fn apply_movement(&mut self, input: Vec2, dt: f32) -> Vec3 {
        let yaw = self.camera.rotation().yaw;
        let forward = Vec3::new(yaw.sin(), 0.0, -yaw.cos());
        let right = Vec3::new(yaw.cos(), 0.0, yaw.sin());
        let direction = (forward * input.y + right * input.x).clamp_length_max(1.0);

        let displacement = direction * self.config.walk_speed * dt;
        self.position += displacement;

        if self.orientation.use_controller_yaw {
            self.facing = Rotator::new(0.0, yaw, 0.0);
        } else if self.orientation.orient_to_movement && direction.length_squared() > 1e-6 {
            let desired = Rotator::from_direction(direction);
            let max_turn = self.config.max_turn(dt);
            let turn = self.facing.delta_to(desired).yaw.clamp(-max_turn, max_turn);
            self.facing = Rotator::new(0.0, normalize_angle(self.facing.yaw + turn), 0.0);
        }

        displacement
    }

    /// Re-seat the camera boom on the character
    pub fn update_camera(&mut self, physics: Option<&PhysicsWorld>) {
        let pivot = self.eye_position();
        self.camera.update(pivot, physics);
    }
}

impl LockOnOwner for PlayerCharacter {
    fn actor(&self) -> Entity {
        self.entity
    }

    fn location(&self) -> Vec3 {
        self.position
    }

    fn facing(&self) -> Rotator {
        self.facing
    }

    fn set_facing(&mut self, facing: Rotator) {
        self.facing = facing.yaw_only().normalized();
    }

    fn orientation(&self) -> OrientationFlags {
        self.orientation
    }

    fn set_orientation(&mut self, flags: OrientationFlags) {
        self.orientation = flags;
    }

    fn set_look_input_enabled(&mut self, enabled: bool) {
        self.look_input_enabled = enabled;
    }

    fn view_point(&self) -> Option<(Vec3, Rotator)> {
        self.camera
            .is_placed()
            .then(|| (self.camera.position(), self.camera.rotation()))
    }

    fn set_view_rotation(&mut self, rotation: Rotator) {
        self.camera.set_rotation(rotation);
    }
}
