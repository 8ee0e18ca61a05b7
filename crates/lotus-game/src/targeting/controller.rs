//! Lock-on state machine
//!
//! The controller is either unlocked or holds a single target handle. While
//! locked it turns the owner toward the target and steers the camera at the
//! target's aim point every tick, and drops the lock as soon as the target
//! vanishes, stops accepting locks, or leaves range.

use glam::Vec3;
use lotus_core::{InterpTo, RotationInterpolator, Rotator};
use lotus_ecs::Entity;
use tracing::{debug, info, warn};

use super::{
    find_best_target, LockOnConfig, LockOnObserver, LockOnOwner, LockReleaseReason,
    OrientationFlags, ScoringContext, TargetWorld,
};

/// Horizontal offsets shorter than this keep the current facing
const MIN_FACING_OFFSET: f32 = 1e-3;

/// What the controller remembers while locked
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LockState {
    /// Non-owning handle; resolve through the world before every use
    pub target: Option<Entity>,
    /// Owner orientation flags from before the lock, restored on release
    pub saved: Option<OrientationFlags>,
}

/// Acquires, tracks and releases a lock-on target for one character
pub struct LockOnController<I: RotationInterpolator = InterpTo> {
    config: LockOnConfig,
    state: LockState,
    interpolator: I,
    observer: Option<Box<dyn LockOnObserver>>,
}

impl LockOnController {
    pub fn new(config: LockOnConfig) -> Self {
        Self::with_interpolator(config, InterpTo)
    }
}

impl Default for LockOnController {
    fn default() -> Self {
        Self::new(LockOnConfig::default())
    }
}

impl<I: RotationInterpolator> LockOnController<I> {
    /// Create a controller that converges rotations with `interpolator`
    pub fn with_interpolator(config: LockOnConfig, interpolator: I) -> Self {
        Self {
            config,
            state: LockState::default(),
            interpolator,
            observer: None,
        }
    }

    /// Attach an observer for acquire/release events
    pub fn with_observer(mut self, observer: Box<dyn LockOnObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn set_observer(&mut self, observer: Option<Box<dyn LockOnObserver>>) {
        self.observer = observer;
    }

    pub fn config(&self) -> &LockOnConfig {
        &self.config
    }

    /// Replace the tuning. An active lock is kept and re-checked next update.
    pub fn set_config(&mut self, config: LockOnConfig) {
        self.config = config;
    }

    pub fn state(&self) -> &LockState {
        &self.state
    }

    pub fn is_locked_on(&self) -> bool {
        self.state.target.is_some()
    }

    pub fn current_target(&self) -> Option<Entity> {
        self.state.target
    }

    /// Aim point of the current target, or the zero vector when there is none
    pub fn current_target_location<W: TargetWorld + ?Sized>(&self, world: &W) -> Vec3 {
        self.state
            .target
            .and_then(|target| world.target(target))
            .map(|target| target.lock_on_location())
            .unwrap_or(Vec3::ZERO)
    }

    /// Release the current lock, or try to acquire one.
    ///
    /// Returns whether the controller is locked afterwards.
    pub fn toggle_lock_on<O, W>(&mut self, owner: &mut O, world: &W) -> bool
    where
        O: LockOnOwner + ?Sized,
        W: TargetWorld + ?Sized,
    {
        if self.is_locked_on() {
            self.release(owner, LockReleaseReason::Manual);
            return false;
        }

        let Some((view_origin, view_rotation)) = owner.view_point() else {
            warn!("lock-on requested without a view point");
            return false;
        };

        let ctx = ScoringContext::from_view(owner.location(), view_origin, view_rotation);
        let candidates = world.overlap_candidates(ctx.origin, self.config.search_radius);

        let Some(target) = find_best_target(&candidates, owner.actor(), &ctx, world, &self.config)
        else {
            debug!(candidates = candidates.len(), "no lock-on target found");
            return false;
        };

        self.engage(owner, world, target);

        if self.config.snap_on_acquire {
            self.update(0.0, owner, world);
        }
        self.is_locked_on()
    }

    /// Drop the current lock, if any
    pub fn clear_lock_on<O: LockOnOwner + ?Sized>(&mut self, owner: &mut O) {
        if self.is_locked_on() {
            self.release(owner, LockReleaseReason::Manual);
        }
    }

    /// Per-tick tracking. Does nothing while unlocked.
    ///
    /// A `dt` of zero snaps facing and camera straight to their desired values.
    pub fn update<O, W>(&mut self, dt: f32, owner: &mut O, world: &W)
    where
        O: LockOnOwner + ?Sized,
        W: TargetWorld + ?Sized,
    {
        let Some(target) = self.state.target else {
            return;
        };

        let aim_point = match world.target(target) {
            None => {
                self.release(owner, LockReleaseReason::TargetInvalid);
                return;
            }
            Some(t) if !t.is_lockable() => {
                self.release(owner, LockReleaseReason::TargetUnlockable);
                return;
            }
            Some(t) => t.lock_on_location(),
        };

        let distance = owner.location().distance(aim_point);
        if distance > self.config.max_lock_distance {
            debug!(%target, distance, "lock-on target out of range");
            self.release(owner, LockReleaseReason::OutOfRange);
            return;
        }

        self.turn_toward(owner, aim_point, dt);
        self.aim_camera(owner, aim_point, dt);
    }

    fn engage<O, W>(&mut self, owner: &mut O, world: &W, target: Entity)
    where
        O: LockOnOwner + ?Sized,
        W: TargetWorld + ?Sized,
    {
        self.state = LockState {
            target: Some(target),
            saved: Some(owner.orientation()),
        };
        owner.set_orientation(OrientationFlags::LOCKED_STRAFE);
        owner.set_look_input_enabled(false);

        let location = owner.location();
        let aim_point = self.current_target_location(world);
        info!(%target, distance = location.distance(aim_point), "locked on");

        if let Some(observer) = self.observer.as_mut() {
            observer.on_target_acquired(location, target, aim_point);
        }
    }

    fn release<O: LockOnOwner + ?Sized>(&mut self, owner: &mut O, reason: LockReleaseReason) {
        let LockState { target, saved } = std::mem::take(&mut self.state);

        if let Some(flags) = saved {
            owner.set_orientation(flags);
        }
        owner.set_look_input_enabled(true);

        if let Some(target) = target {
            info!(%target, %reason, "lock released");
            if let Some(observer) = self.observer.as_mut() {
                observer.on_lock_released(target, reason);
            }
        }
    }

    /// Yaw-only turn of the owner toward the aim point
    fn turn_toward<O: LockOnOwner + ?Sized>(&self, owner: &mut O, aim_point: Vec3, dt: f32) {
        let current = owner.facing();
        let mut offset = aim_point - owner.location();
        offset.y = 0.0;

        let desired = if offset.length() > MIN_FACING_OFFSET {
            Rotator::from_direction(offset)
        } else {
            current
        };

        let facing = self.interpolator.interpolate(
            current,
            desired,
            dt,
            self.config.lock_face_interp_speed,
        );
        owner.set_facing(facing);
    }

    fn aim_camera<O: LockOnOwner + ?Sized>(&self, owner: &mut O, aim_point: Vec3, dt: f32) {
        let Some((view_origin, current)) = owner.view_point() else {
            return;
        };

        let mut desired = Rotator::from_direction(aim_point - view_origin);
        desired.pitch = desired.pitch.clamp(
            self.config.min_lock_pitch.to_radians(),
            self.config.max_lock_pitch.to_radians(),
        );
        desired.roll = 0.0;

        let delta = current.delta_to(desired);
        let error_degrees = delta.yaw.abs().to_degrees() + delta.pitch.abs().to_degrees();

        let rotation = if error_degrees > self.config.snap_angle_threshold {
            debug!(error_degrees, "lock-on camera snap");
            desired
        } else {
            self.interpolator.interpolate(
                current,
                desired,
                dt,
                self.config.lock_on_camera_interp_speed,
            )
        };
        owner.set_view_rotation(rotation);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::targeting::acquisition::tests::FakeWorld;

    const EPS: f32 = 1e-5;

    struct FakeOwner {
        actor: Entity,
        location: Vec3,
        facing: Rotator,
        flags: OrientationFlags,
        look_enabled: bool,
        view: Option<(Vec3, Rotator)>,
    }

    impl FakeOwner {
        fn new() -> Self {
            Self {
                actor: Entity::from_raw(99, 0),
                location: Vec3::ZERO,
                facing: Rotator::ZERO,
                flags: OrientationFlags::FREE_MOVEMENT,
                look_enabled: true,
                view: Some((Vec3::new(0.0, 150.0, 300.0), Rotator::ZERO)),
            }
        }

        fn view_rotation(&self) -> Rotator {
            self.view.map(|(_, rot)| rot).unwrap_or_default()
        }
    }

    impl LockOnOwner for FakeOwner {
        fn actor(&self) -> Entity {
            self.actor
        }

        fn location(&self) -> Vec3 {
            self.location
        }

        fn facing(&self) -> Rotator {
            self.facing
        }

        fn set_facing(&mut self, facing: Rotator) {
            self.facing = facing;
        }

        fn orientation(&self) -> OrientationFlags {
            self.flags
        }

        fn set_orientation(&mut self, flags: OrientationFlags) {
            self.flags = flags;
        }

        fn set_look_input_enabled(&mut self, enabled: bool) {
            self.look_enabled = enabled;
        }

        fn view_point(&self) -> Option<(Vec3, Rotator)> {
            self.view
        }

        fn set_view_rotation(&mut self, rotation: Rotator) {
            if let Some((_, rot)) = self.view.as_mut() {
                *rot = rotation;
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Acquired(Entity),
        Released(Entity, LockReleaseReason),
    }

    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl LockOnObserver for Recorder {
        fn on_target_acquired(&mut self, _owner_location: Vec3, target: Entity, _aim_point: Vec3) {
            self.0.borrow_mut().push(Event::Acquired(target));
        }

        fn on_lock_released(&mut self, target: Entity, reason: LockReleaseReason) {
            self.0.borrow_mut().push(Event::Released(target, reason));
        }
    }

    fn recording_controller(config: LockOnConfig) -> (LockOnController, Rc<RefCell<Vec<Event>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let controller =
            LockOnController::new(config).with_observer(Box::new(Recorder(events.clone())));
        (controller, events)
    }

    fn no_snap() -> LockOnConfig {
        LockOnConfig {
            snap_on_acquire: false,
            ..Default::default()
        }
    }

    fn ahead_right() -> Vec3 {
        let yaw = 30f32.to_radians();
        Vec3::new(yaw.sin(), 0.0, -yaw.cos()) * 800.0 + Vec3::Y * 90.0
    }

    fn expected_camera(owner: &FakeOwner, aim_point: Vec3, config: &LockOnConfig) -> Rotator {
        let (origin, _) = owner.view.unwrap();
        let mut desired = Rotator::from_direction(aim_point - origin);
        desired.pitch = desired
            .pitch
            .clamp(config.min_lock_pitch.to_radians(), config.max_lock_pitch.to_radians());
        desired
    }

    #[test]
    fn test_update_before_toggle_is_noop() {
        let mut world = FakeWorld::default();
        world.add(0, ahead_right(), true);
        let mut owner = FakeOwner::new();
        let mut controller = LockOnController::new(LockOnConfig::default());

        controller.update(0.016, &mut owner, &world);

        assert!(!controller.is_locked_on());
        assert_eq!(owner.facing, Rotator::ZERO);
        assert_eq!(owner.view_rotation(), Rotator::ZERO);
        assert_eq!(owner.flags, OrientationFlags::FREE_MOVEMENT);
        assert!(owner.look_enabled);
    }

    #[test]
    fn test_toggle_without_candidates_stays_unlocked() {
        let world = FakeWorld::default();
        let mut owner = FakeOwner::new();
        let (mut controller, events) = recording_controller(LockOnConfig::default());

        assert!(!controller.toggle_lock_on(&mut owner, &world));
        assert!(!controller.is_locked_on());
        assert_eq!(controller.state(), &LockState::default());
        assert_eq!(owner.flags, OrientationFlags::FREE_MOVEMENT);
        assert!(owner.look_enabled);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_toggle_searches_around_owner_location() {
        let mut world = FakeWorld::default();
        world.add(0, ahead_right(), true);
        let mut owner = FakeOwner::new();
        owner.location = Vec3::new(40.0, 0.0, -25.0);
        let config = LockOnConfig::default();
        let mut controller = LockOnController::new(config.clone());

        assert!(controller.toggle_lock_on(&mut owner, &world));
        assert_eq!(*world.queries.borrow(), vec![(owner.location, config.search_radius)]);
    }

    #[test]
    fn test_toggle_without_view_point_stays_unlocked() {
        let mut world = FakeWorld::default();
        world.add(0, ahead_right(), true);
        let mut owner = FakeOwner::new();
        owner.view = None;
        let mut controller = LockOnController::new(LockOnConfig::default());

        assert!(!controller.toggle_lock_on(&mut owner, &world));
        assert!(!controller.is_locked_on());
    }

    #[test]
    fn test_toggle_locks_and_switches_orientation() {
        let mut world = FakeWorld::default();
        let target = world.add(0, ahead_right(), true);
        let mut owner = FakeOwner::new();
        let (mut controller, events) = recording_controller(LockOnConfig::default());

        assert!(controller.toggle_lock_on(&mut owner, &world));
        assert_eq!(controller.current_target(), Some(target));
        assert_eq!(owner.flags, OrientationFlags::LOCKED_STRAFE);
        assert!(!owner.look_enabled);
        assert_eq!(controller.state().saved, Some(OrientationFlags::FREE_MOVEMENT));
        assert_eq!(controller.current_target_location(&world), ahead_right());
        assert_eq!(*events.borrow(), vec![Event::Acquired(target)]);
    }

    #[test]
    fn test_toggle_twice_restores_flags() {
        let mut world = FakeWorld::default();
        let target = world.add(0, ahead_right(), true);
        let mut owner = FakeOwner::new();
        let custom = OrientationFlags {
            use_controller_yaw: false,
            orient_to_movement: false,
        };
        owner.flags = custom;
        let (mut controller, events) = recording_controller(LockOnConfig::default());

        assert!(controller.toggle_lock_on(&mut owner, &world));
        assert!(!controller.toggle_lock_on(&mut owner, &world));

        assert!(!controller.is_locked_on());
        assert_eq!(owner.flags, custom);
        assert!(owner.look_enabled);
        assert_eq!(controller.current_target_location(&world), Vec3::ZERO);
        assert_eq!(
            *events.borrow(),
            vec![
                Event::Acquired(target),
                Event::Released(target, LockReleaseReason::Manual)
            ]
        );
    }

    #[test]
    fn test_zero_dt_update_snaps_exactly() {
        let mut world = FakeWorld::default();
        world.add(0, ahead_right(), true);
        let mut owner = FakeOwner::new();
        let config = no_snap();
        let mut controller = LockOnController::new(config.clone());

        assert!(controller.toggle_lock_on(&mut owner, &world));
        // Nothing moves until the first update when the acquire snap is off
        assert_eq!(owner.facing, Rotator::ZERO);

        controller.update(0.0, &mut owner, &world);

        let mut flat = ahead_right();
        flat.y = 0.0;
        assert_eq!(owner.facing, Rotator::from_direction(flat));
        assert_eq!(owner.facing.pitch, 0.0);
        assert_eq!(owner.view_rotation(), expected_camera(&owner, ahead_right(), &config));
    }

    #[test]
    fn test_acquire_snap_aligns_immediately() {
        let mut world = FakeWorld::default();
        world.add(0, ahead_right(), true);
        let mut owner = FakeOwner::new();
        let config = LockOnConfig::default();
        let mut controller = LockOnController::new(config.clone());

        assert!(controller.toggle_lock_on(&mut owner, &world));

        assert!((owner.facing.yaw - 30f32.to_radians()).abs() < 1e-4);
        assert_eq!(owner.view_rotation(), expected_camera(&owner, ahead_right(), &config));
    }

    #[test]
    fn test_update_interpolates_partially() {
        let mut world = FakeWorld::default();
        world.add(0, ahead_right(), true);
        let mut owner = FakeOwner::new();
        let mut controller = LockOnController::new(no_snap());
        controller.toggle_lock_on(&mut owner, &world);

        controller.update(0.05, &mut owner, &world);

        // Facing speed 12 covers 60% of the turn, camera speed 8 covers 40%
        let target_yaw = 30f32.to_radians();
        assert!((owner.facing.yaw - target_yaw * 0.6).abs() < 1e-4);
        let camera = owner.view_rotation();
        assert!(camera.yaw > 0.0 && camera.yaw < target_yaw);
    }

    #[test]
    fn test_large_camera_error_snaps() {
        let mut world = FakeWorld::default();
        let target = world.add(0, ahead_right(), true);
        let mut owner = FakeOwner::new();
        let config = no_snap();
        let mut controller = LockOnController::new(config.clone());
        controller.toggle_lock_on(&mut owner, &world);

        // Target darts behind the camera
        let behind = Vec3::new(0.0, 90.0, 1200.0);
        world.targets.get_mut(&target).unwrap().location = behind;
        controller.update(0.016, &mut owner, &world);

        assert_eq!(owner.view_rotation(), expected_camera(&owner, behind, &config));
    }

    #[test]
    fn test_camera_pitch_is_clamped() {
        let mut world = FakeWorld::default();
        let target = world.add(0, Vec3::new(0.0, 0.0, -600.0), true);
        let mut owner = FakeOwner::new();
        let config = LockOnConfig::default();
        let mut controller = LockOnController::new(config.clone());
        controller.toggle_lock_on(&mut owner, &world);

        world.targets.get_mut(&target).unwrap().location = Vec3::new(0.0, 2000.0, -300.0);
        controller.update(0.0, &mut owner, &world);

        let camera = owner.view_rotation();
        assert!((camera.pitch - config.max_lock_pitch.to_radians()).abs() < EPS);
        assert_eq!(camera.roll, 0.0);
        assert_eq!(owner.facing.pitch, 0.0);
    }

    #[test]
    fn test_target_directly_overhead_keeps_facing() {
        let mut world = FakeWorld::default();
        let target = world.add(0, Vec3::new(0.0, 0.0, -600.0), true);
        let mut owner = FakeOwner::new();
        owner.facing = Rotator::new(0.0, 0.4, 0.0);
        let mut controller = LockOnController::new(no_snap());
        controller.toggle_lock_on(&mut owner, &world);

        world.targets.get_mut(&target).unwrap().location = Vec3::new(0.0, 500.0, 0.0);
        controller.update(0.0, &mut owner, &world);

        assert_eq!(owner.facing, Rotator::new(0.0, 0.4, 0.0));
    }

    #[test]
    fn test_vanished_target_releases_and_restores() {
        let mut world = FakeWorld::default();
        let target = world.add(0, ahead_right(), true);
        let mut owner = FakeOwner::new();
        let (mut controller, events) = recording_controller(LockOnConfig::default());
        controller.toggle_lock_on(&mut owner, &world);

        world.targets.remove(&target);
        controller.update(0.016, &mut owner, &world);

        assert!(!controller.is_locked_on());
        assert_eq!(owner.flags, OrientationFlags::FREE_MOVEMENT);
        assert!(owner.look_enabled);
        assert_eq!(
            events.borrow().last(),
            Some(&Event::Released(target, LockReleaseReason::TargetInvalid))
        );
    }

    #[test]
    fn test_unlockable_target_releases() {
        let mut world = FakeWorld::default();
        let target = world.add(0, ahead_right(), true);
        let mut owner = FakeOwner::new();
        let (mut controller, events) = recording_controller(LockOnConfig::default());
        controller.toggle_lock_on(&mut owner, &world);

        world.targets.get_mut(&target).unwrap().lockable = false;
        controller.update(0.016, &mut owner, &world);

        assert!(!controller.is_locked_on());
        assert!(owner.look_enabled);
        assert_eq!(
            events.borrow().last(),
            Some(&Event::Released(target, LockReleaseReason::TargetUnlockable))
        );
    }

    #[test]
    fn test_target_beyond_range_releases() {
        let mut world = FakeWorld::default();
        let target = world.add(0, ahead_right(), true);
        let mut owner = FakeOwner::new();
        let (mut controller, events) = recording_controller(LockOnConfig::default());
        controller.toggle_lock_on(&mut owner, &world);

        world.targets.get_mut(&target).unwrap().location = Vec3::new(0.0, 0.0, -2600.0);
        controller.update(0.016, &mut owner, &world);

        assert!(!controller.is_locked_on());
        assert_eq!(owner.flags, OrientationFlags::FREE_MOVEMENT);
        assert_eq!(
            events.borrow().last(),
            Some(&Event::Released(target, LockReleaseReason::OutOfRange))
        );
    }

    #[test]
    fn test_clear_when_unlocked_is_silent() {
        let mut owner = FakeOwner::new();
        let (mut controller, events) = recording_controller(LockOnConfig::default());

        controller.clear_lock_on(&mut owner);

        assert!(!controller.is_locked_on());
        assert!(events.borrow().is_empty());
    }
}
