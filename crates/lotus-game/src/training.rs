//! Training ground: a small scene wiring the player, lock-on and targets
//! onto the entity world and collision queries.

use glam::{Vec2, Vec3};
use lotus_core::Transform;
use lotus_ecs::{Entity, World};
use lotus_physics::{PhysicsWorld, PAWN_GROUP};
use rapier3d::prelude::ColliderHandle;
use tracing::{debug, info, warn};

use crate::camera::{CameraConfig, CameraController};
use crate::player::{MovementConfig, PlayerCharacter};
use crate::targeting::{
    LockOnConfig, LockOnController, LockOnObserver, LockableTarget, TargetWorld,
};

/// Aim point height above a dummy's feet
pub const DUMMY_AIM_HEIGHT: f32 = 90.0;

const DUMMY_HALF_HEIGHT: f32 = 60.0;
const DUMMY_RADIUS: f32 = 35.0;
const PRACTICE_HALF_HEIGHT: f32 = 10.0;
const PRACTICE_RADIUS: f32 = 30.0;

/// Humanoid training dummy. Lockable until it is knocked down.
#[derive(Debug, Clone)]
pub struct DummyEnemy {
    pub transform: Transform,
    pub alive: bool,
}

impl LockableTarget for DummyEnemy {
    fn is_lockable(&self) -> bool {
        self.alive
    }

    fn lock_on_location(&self) -> Vec3 {
        self.transform.transform_point(Vec3::Y * DUMMY_AIM_HEIGHT)
    }
}

/// Floating practice target, aimed at its centre. Opts out while hidden.
#[derive(Debug, Clone)]
pub struct PracticeTarget {
    pub transform: Transform,
    pub hidden: bool,
}

impl LockableTarget for PracticeTarget {
    fn is_lockable(&self) -> bool {
        !self.hidden
    }

    fn lock_on_location(&self) -> Vec3 {
        self.transform
            .transform_point(Vec3::Y * (PRACTICE_HALF_HEIGHT + PRACTICE_RADIUS))
    }
}

/// Collider owned by an actor
#[derive(Debug, Clone, Copy)]
struct Body(ColliderHandle);

/// Read-only view of the scene handed to the lock-on controller
pub struct SceneView<'a> {
    pub world: &'a World,
    pub physics: &'a PhysicsWorld,
}

impl TargetWorld for SceneView<'_> {
    fn overlap_candidates(&self, center: Vec3, radius: f32) -> Vec<Entity> {
        self.physics
            .overlap_sphere(center, radius, PAWN_GROUP)
            .into_iter()
            .filter(|&entity| self.world.is_alive(entity))
            .collect()
    }

    fn target(&self, entity: Entity) -> Option<&dyn LockableTarget> {
        if let Some(dummy) = self.world.get::<DummyEnemy>(entity) {
            return Some(dummy);
        }
        self.world
            .get::<PracticeTarget>(entity)
            .map(|target| target as &dyn LockableTarget)
    }

    fn is_visibility_blocked(&self, from: Vec3, to: Vec3, ignore: &[Entity]) -> bool {
        self.physics.line_of_sight_blocked(from, to, ignore)
    }
}

/// A flat arena with one player and any number of targets
pub struct TrainingGround {
    world: World,
    physics: PhysicsWorld,
    player: Option<PlayerCharacter>,
    lock_on: LockOnController,
    movement: MovementConfig,
    camera: CameraConfig,
}

impl TrainingGround {
    pub fn new(lock_on: LockOnConfig) -> Self {
        Self::with_configs(lock_on, MovementConfig::default(), CameraConfig::default())
    }

    pub fn with_configs(
        lock_on: LockOnConfig,
        movement: MovementConfig,
        camera: CameraConfig,
    ) -> Self {
        let mut physics = PhysicsWorld::new();
        physics.create_ground(0.0);
        physics.sync_queries();

        Self {
            world: World::new(),
            physics,
            player: None,
            lock_on: LockOnController::new(lock_on),
            movement,
            camera,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn player(&self) -> Option<&PlayerCharacter> {
        self.player.as_ref()
    }

    pub fn lock_on(&self) -> &LockOnController {
        &self.lock_on
    }

    /// Replace the lock-on tuning
    pub fn set_lock_on_config(&mut self, config: LockOnConfig) {
        self.lock_on.set_config(config);
    }

    pub fn set_observer(&mut self, observer: Box<dyn LockOnObserver>) {
        self.lock_on.set_observer(Some(observer));
    }

    /// Borrow the scene as a lock-on collaborator
    pub fn view(&self) -> SceneView<'_> {
        SceneView {
            world: &self.world,
            physics: &self.physics,
        }
    }

    /// Spawn the player at `position`, replacing any existing one
    pub fn spawn_player(&mut self, position: Vec3) -> Entity {
        if let Some(old) = self.player.as_ref().map(|p| p.entity()) {
            self.despawn(old);
        }

        let entity = self.world.spawn();
        let collider = self.physics.add_pawn_capsule(
            entity,
            position,
            self.movement.capsule_half_height,
            self.movement.capsule_radius,
        );
        self.world.insert(entity, Body(collider));
        self.physics.sync_queries();

        let camera = CameraController::with_config(self.camera.clone());
        let mut player =
            PlayerCharacter::with_config(entity, position, self.movement.clone(), camera);
        player.update_camera(Some(&self.physics));
        self.player = Some(player);

        info!(%entity, ?position, "player spawned");
        entity
    }

    /// Spawn a training dummy standing at `position`
    pub fn spawn_dummy(&mut self, position: Vec3) -> Entity {
        let entity = self.world.spawn();
        let collider =
            self.physics.add_pawn_capsule(entity, position, DUMMY_HALF_HEIGHT, DUMMY_RADIUS);
        self.world.insert(entity, Body(collider));
        self.world.insert(
            entity,
            DummyEnemy {
                transform: Transform::from_position(position),
                alive: true,
            },
        );
        self.physics.sync_queries();

        debug!(%entity, ?position, "dummy spawned");
        entity
    }

    /// Spawn a practice target whose base sits at `position`
    pub fn spawn_practice_target(&mut self, position: Vec3) -> Entity {
        let entity = self.world.spawn();
        let collider = self.physics.add_pawn_capsule(
            entity,
            position,
            PRACTICE_HALF_HEIGHT,
            PRACTICE_RADIUS,
        );
        self.world.insert(entity, Body(collider));
        self.world.insert(
            entity,
            PracticeTarget {
                transform: Transform::from_position(position),
                hidden: false,
            },
        );
        self.physics.sync_queries();

        debug!(%entity, ?position, "practice target spawned");
        entity
    }

    /// Place a wall that blocks sight lines and the camera boom
    pub fn spawn_wall(&mut self, half_extents: Vec3, center: Vec3) -> ColliderHandle {
        let handle = self.physics.create_static_box(half_extents, center);
        self.physics.sync_queries();
        handle
    }

    /// Teleport an actor. Returns `false` for stale handles.
    pub fn move_actor(&mut self, entity: Entity, position: Vec3) -> bool {
        let Some(&Body(collider)) = self.world.get::<Body>(entity) else {
            return false;
        };

        if let Some(dummy) = self.world.get_mut::<DummyEnemy>(entity) {
            dummy.transform.position = position;
        }
        if let Some(target) = self.world.get_mut::<PracticeTarget>(entity) {
            target.transform.position = position;
        }
        if let Some(player) = self.player.as_mut().filter(|p| p.entity() == entity) {
            player.set_position(position);
        }

        self.physics.set_collider_position(collider, position);
        self.physics.sync_queries();
        true
    }

    /// Knock a dummy down. Returns `false` if `entity` is not a live dummy.
    pub fn kill(&mut self, entity: Entity) -> bool {
        match self.world.get_mut::<DummyEnemy>(entity) {
            Some(dummy) => {
                dummy.alive = false;
                debug!(%entity, "dummy knocked down");
                true
            }
            None => false,
        }
    }

    /// Show or hide a practice target
    pub fn set_hidden(&mut self, entity: Entity, hidden: bool) -> bool {
        match self.world.get_mut::<PracticeTarget>(entity) {
            Some(target) => {
                target.hidden = hidden;
                true
            }
            None => false,
        }
    }

    /// Remove an actor and its collider
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if self.player.as_ref().is_some_and(|p| p.entity() == entity) {
            if let Some(mut player) = self.player.take() {
                self.lock_on.clear_lock_on(&mut player);
            }
        }

        if let Some(&Body(collider)) = self.world.get::<Body>(entity) {
            self.physics.remove_collider(collider);
            self.physics.sync_queries();
        }
        self.world.despawn(entity)
    }

    /// Walk the player relative to the camera
    pub fn walk(&mut self, input: Vec2, dt: f32) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.apply_movement(input, dt);
        let (entity, position) = (player.entity(), player.position());
        self.move_actor(entity, position);
    }

    /// Feed mouse look to the player's camera
    pub fn look(&mut self, delta: Vec2) -> bool {
        self.player
            .as_mut()
            .is_some_and(|player| player.handle_look(delta))
    }

    pub fn toggle_lock_on(&mut self) -> bool {
        let Some(player) = self.player.as_mut() else {
            warn!("lock-on toggled with no player in the scene");
            return false;
        };
        let view = SceneView {
            world: &self.world,
            physics: &self.physics,
        };
        self.lock_on.toggle_lock_on(player, &view)
    }

    pub fn clear_lock_on(&mut self) {
        if let Some(player) = self.player.as_mut() {
            self.lock_on.clear_lock_on(player);
        }
    }

    pub fn is_locked_on(&self) -> bool {
        self.lock_on.is_locked_on()
    }

    pub fn current_target(&self) -> Option<Entity> {
        self.lock_on.current_target()
    }

    pub fn current_target_location(&self) -> Vec3 {
        self.lock_on.current_target_location(&self.view())
    }

    /// Advance one frame: step physics, place the camera boom, then run
    /// lock-on tracking
    pub fn tick(&mut self, dt: f32) {
        self.physics.step();

        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.update_camera(Some(&self.physics));

        let view = SceneView {
            world: &self.world,
            physics: &self.physics,
        };
        self.lock_on.update(dt, player, &view);
    }
}
