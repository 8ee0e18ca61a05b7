use glam::Vec3;

/// Capability implemented by anything the player can lock on to.
///
/// The target decides its own eligibility: dead or hidden actors report
/// `false` from [`LockableTarget::is_lockable`] and drop out of acquisition,
/// and an existing lock on them is released on the next update.
pub trait LockableTarget: Send + Sync {
    /// Whether the target currently accepts a lock
    fn is_lockable(&self) -> bool;

    /// World-space point the camera and character aim at (usually chest or head)
    fn lock_on_location(&self) -> Vec3;
}
