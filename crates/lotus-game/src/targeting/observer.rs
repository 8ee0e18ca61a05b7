//! Hooks for presentation layers that want to follow lock-on activity

use std::fmt;

use glam::Vec3;
use lotus_ecs::Entity;
use tracing::debug;

/// Why a lock ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockReleaseReason {
    /// The player toggled or cleared the lock
    Manual,
    /// The target handle no longer resolves to a lockable actor
    TargetInvalid,
    /// The target still exists but stopped accepting a lock (died, hid)
    TargetUnlockable,
    /// The target moved beyond the maximum lock distance
    OutOfRange,
}

impl fmt::Display for LockReleaseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LockReleaseReason::Manual => "manual",
            LockReleaseReason::TargetInvalid => "target invalid",
            LockReleaseReason::TargetUnlockable => "target unlockable",
            LockReleaseReason::OutOfRange => "out of range",
        };
        f.write_str(label)
    }
}

/// Receives lock-on events from a controller.
///
/// Both methods default to doing nothing.
pub trait LockOnObserver {
    fn on_target_acquired(&mut self, _owner_location: Vec3, _target: Entity, _aim_point: Vec3) {}

    fn on_lock_released(&mut self, _target: Entity, _reason: LockReleaseReason) {}
}

/// Observer that writes the lock line and releases to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LockOnObserver for TracingObserver {
    fn on_target_acquired(&mut self, owner_location: Vec3, target: Entity, aim_point: Vec3) {
        debug!(
            %target,
            from = ?owner_location,
            to = ?aim_point,
            distance = owner_location.distance(aim_point),
            "lock line"
        );
    }

    fn on_lock_released(&mut self, target: Entity, reason: LockReleaseReason) {
        debug!(%target, %reason, "lock line removed");
    }
}
