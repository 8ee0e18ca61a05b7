//! Contracts between the lock-on subsystem and the rest of the game
//!
//! The targeting code never touches the scene directly. It asks a
//! [`TargetWorld`] for candidates, capabilities and visibility, and drives the
//! character through [`LockOnOwner`].

use glam::Vec3;
use lotus_core::Rotator;
use lotus_ecs::Entity;
use serde::{Deserialize, Serialize};

use super::LockableTarget;

/// Scene queries used by target acquisition and lock tracking
pub trait TargetWorld {
    /// Actors of the pawn type overlapping a sphere, in a stable order
    fn overlap_candidates(&self, center: Vec3, radius: f32) -> Vec<Entity>;

    /// Resolve a handle to its lock-on capability.
    ///
    /// `None` when the actor is gone or does not opt in to being targeted.
    fn target(&self, entity: Entity) -> Option<&dyn LockableTarget>;

    /// Whether the segment `from -> to` is obstructed, ignoring the listed actors
    fn is_visibility_blocked(&self, from: Vec3, to: Vec3, ignore: &[Entity]) -> bool;
}

/// How the character decides which way to face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrientationFlags {
    /// Face along the controller (camera) yaw
    pub use_controller_yaw: bool,
    /// Turn to face the direction of travel
    pub orient_to_movement: bool,
}

impl OrientationFlags {
    /// Free third-person movement: the character turns toward where it walks
    pub const FREE_MOVEMENT: OrientationFlags = OrientationFlags {
        use_controller_yaw: false,
        orient_to_movement: true,
    };

    /// Strafing while locked: facing is driven by the controller
    pub const LOCKED_STRAFE: OrientationFlags = OrientationFlags {
        use_controller_yaw: true,
        orient_to_movement: false,
    };
}

impl Default for OrientationFlags {
    fn default() -> Self {
        Self::FREE_MOVEMENT
    }
}

/// The character that owns a lock-on controller
pub trait LockOnOwner {
    /// The owner's own actor, never a valid target
    fn actor(&self) -> Entity;

    /// Root location used as the spatial query centre and for range checks
    fn location(&self) -> Vec3;

    fn facing(&self) -> Rotator;
    fn set_facing(&mut self, facing: Rotator);

    fn orientation(&self) -> OrientationFlags;
    fn set_orientation(&mut self, flags: OrientationFlags);

    /// Enable or disable free look from player input
    fn set_look_input_enabled(&mut self, enabled: bool);

    /// Camera location and rotation, or `None` when no view is attached
    fn view_point(&self) -> Option<(Vec3, Rotator)>;
    fn set_view_rotation(&mut self, rotation: Rotator);
}
