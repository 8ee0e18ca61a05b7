//! Lotus Physics - Collision queries using rapier3d
//!
//! Provides the spatial overlap query and visibility trace used by target
//! acquisition, plus the static geometry helpers that block them.

use glam::Vec3;
use lotus_ecs::Entity;
use nalgebra::Unit;
use rapier3d::prelude::*;
use tracing::debug;

/// Collision group for characters and lockable actors
pub const PAWN_GROUP: Group = Group::GROUP_1;
/// Collision group for static level geometry
pub const WORLD_GROUP: Group = Group::GROUP_2;

/// Marks collider user data that carries an entity handle
const ENTITY_TAG: u128 = 1 << 64;

fn entity_user_data(entity: Entity) -> u128 {
    ENTITY_TAG | u128::from(entity.to_bits())
}

/// Decode the entity stored on a collider, if it carries one
pub fn collider_entity(collider: &Collider) -> Option<Entity> {
    if collider.user_data & ENTITY_TAG == 0 {
        return None;
    }
    Some(Entity::from_bits(collider.user_data as u64))
}

/// Physics world configuration
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -980 on Y axis, world units are centimetres)
    pub gravity: Vec3,
    /// Physics timestep (default: 1/60)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -980.0, 0.0),
            timestep: 1.0 / 60.0,
        }
    }
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,

    /// Rigid body storage
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Impulse joint storage
    pub impulse_joint_set: ImpulseJointSet,
    /// Multi-body joint storage
    pub multibody_joint_set: MultibodyJointSet,

    /// Integration parameters
    integration_parameters: IntegrationParameters,
    /// Physics pipeline
    physics_pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,
    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,
    /// Continuous collision detection solver
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasts and overlaps
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Step the physics simulation
    pub fn step(&mut self) {
        let gravity = vector![self.config.gravity.x, self.config.gravity.y, self.config.gravity.z];

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        self.sync_queries();
    }

    /// Refresh the query pipeline after colliders were added or moved
    /// without a simulation step
    pub fn sync_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static collider (ground, walls, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Add a pawn capsule for `entity`, standing with its feet at `position`
    pub fn add_pawn_capsule(
        &mut self,
        entity: Entity,
        position: Vec3,
        half_height: f32,
        radius: f32,
    ) -> ColliderHandle {
        let center = position + Vec3::Y * (half_height + radius);
        let collider = ColliderBuilder::capsule_y(half_height.max(0.01), radius)
            .translation(vector![center.x, center.y, center.z])
            .collision_groups(InteractionGroups::new(PAWN_GROUP, Group::ALL))
            .user_data(entity_user_data(entity))
            .build();
        self.add_static_collider(collider)
    }

    /// Move a collider so its feet sit at `position`.
    ///
    /// Returns `false` if the handle no longer names a collider.
    pub fn set_collider_position(&mut self, handle: ColliderHandle, position: Vec3) -> bool {
        let Some(collider) = self.collider_set.get_mut(handle) else {
            return false;
        };
        let lift = collider
            .shape()
            .as_capsule()
            .map_or(0.0, |capsule| capsule.half_height() + capsule.radius);
        collider.set_translation(vector![position.x, position.y + lift, position.z]);
        true
    }

    /// Remove a collider
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set
            .remove(handle, &mut self.island_manager, &mut self.rigid_body_set, true);
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Cast a ray and return the first hit
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<(ColliderHandle, f32)> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray(&self.rigid_body_set, &self.collider_set, &ray, max_distance, true, filter)
    }

    /// Entities whose colliders overlap a sphere, restricted to `groups`.
    ///
    /// Each entity appears once; results are ordered by slot index so callers
    /// iterate candidates deterministically.
    pub fn overlap_sphere(&self, center: Vec3, radius: f32, groups: Group) -> Vec<Entity> {
        let shape = Ball::new(radius);
        let shape_pos = Isometry::translation(center.x, center.y, center.z);
        let filter = QueryFilter::default().groups(InteractionGroups::new(Group::ALL, groups));

        let mut hits = Vec::new();
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &shape,
            filter,
            |handle| {
                if let Some(entity) = self.collider_set.get(handle).and_then(collider_entity) {
                    hits.push(entity);
                }
                true
            },
        );

        hits.sort();
        hits.dedup();
        hits
    }

    /// Whether anything solid lies on the segment `from -> to`, ignoring
    /// colliders that belong to the listed entities
    pub fn line_of_sight_blocked(&self, from: Vec3, to: Vec3, ignore: &[Entity]) -> bool {
        let segment = to - from;
        let length = segment.length();
        if length <= f32::EPSILON {
            return false;
        }

        let skip_ignored =
            |_: ColliderHandle, collider: &Collider| match collider_entity(collider) {
                Some(entity) => !ignore.contains(&entity),
                None => true,
            };
        let filter = QueryFilter::default().predicate(&skip_ignored);

        match self.raycast(from, segment / length, length, filter) {
            Some((handle, toi)) => {
                debug!(?handle, toi, "line of sight blocked");
                true
            }
            None => false,
        }
    }

    /// Create a ground plane collider
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .collision_groups(InteractionGroups::new(WORLD_GROUP, Group::ALL))
            .friction(0.7)
            .restitution(0.0)
            .build();
        self.add_static_collider(ground)
    }

    /// Create a static box collider
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .collision_groups(InteractionGroups::new(WORLD_GROUP, Group::ALL))
            .friction(0.7)
            .build();
        self.add_static_collider(collider)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
