//! Candidate filtering and scoring
//!
//! Acquisition runs a fixed pipeline over the candidates returned by the
//! spatial query: drop the requester, drop anything that refuses a lock, drop
//! candidates out of range, outside the view cone or behind geometry, then pick
//! the highest score. Ties go to the candidate seen first.

use std::fmt;

use glam::Vec3;
use lotus_core::Rotator;
use lotus_ecs::Entity;
use tracing::debug;

use super::{LockOnConfig, TargetWorld};

/// View state captured once per acquisition attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringContext {
    /// Centre of the spatial query (the requester's location)
    pub origin: Vec3,
    /// Where distances and angles are measured from
    pub view_origin: Vec3,
    /// Unit view direction
    pub view_forward: Vec3,
}

impl ScoringContext {
    /// Build a context, normalising `view_forward`
    pub fn new(origin: Vec3, view_origin: Vec3, view_forward: Vec3) -> Self {
        Self {
            origin,
            view_origin,
            view_forward: view_forward.normalize_or_zero(),
        }
    }

    /// Build a context from a camera location and rotation
    pub fn from_view(origin: Vec3, view_origin: Vec3, view_rotation: Rotator) -> Self {
        Self::new(origin, view_origin, view_rotation.forward())
    }

    /// Distance from the view origin and alignment with the view direction
    fn measure(&self, aim_point: Vec3) -> (f32, f32) {
        let to_target = aim_point - self.view_origin;
        let dot = self.view_forward.dot(to_target.normalize_or_zero());
        (to_target.length(), dot)
    }
}

/// Why a candidate was dropped
#[derive(Debug, Clone, Copy, PartialEq)]
enum Rejection {
    Requester,
    NotLockable,
    TooFar(f32),
    OutsideCone(f32),
    Obstructed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Requester => write!(f, "requester"),
            Rejection::NotLockable => write!(f, "not lockable"),
            Rejection::TooFar(distance) => write!(f, "too far ({distance:.0})"),
            Rejection::OutsideCone(dot) => write!(f, "outside cone (dot {dot:.3})"),
            Rejection::Obstructed => write!(f, "no line of sight"),
        }
    }
}

/// Score a surviving candidate: centred is better, far is worse
pub fn compute_score(ctx: &ScoringContext, aim_point: Vec3, config: &LockOnConfig) -> f32 {
    let (distance, dot) = ctx.measure(aim_point);
    let distance_norm = (distance / config.search_radius).clamp(0.0, 1.0);
    config.angle_weight * dot - config.distance_weight * distance_norm
}

/// Run one candidate through the filters, returning its score if it survives
fn evaluate<W: TargetWorld + ?Sized>(
    candidate: Entity,
    requester: Entity,
    ctx: &ScoringContext,
    world: &W,
    config: &LockOnConfig,
) -> Result<f32, Rejection> {
    if candidate == requester {
        return Err(Rejection::Requester);
    }

    let target = world
        .target(candidate)
        .filter(|t| t.is_lockable())
        .ok_or(Rejection::NotLockable)?;
    let aim_point = target.lock_on_location();

    let (distance, dot) = ctx.measure(aim_point);
    if distance > config.max_lock_distance {
        return Err(Rejection::TooFar(distance));
    }
    if dot < config.min_dot() {
        return Err(Rejection::OutsideCone(dot));
    }
    if config.require_line_of_sight
        && world.is_visibility_blocked(ctx.view_origin, aim_point, &[requester, candidate])
    {
        return Err(Rejection::Obstructed);
    }

    Ok(compute_score(ctx, aim_point, config))
}

/// Pick the best lockable candidate, or `None` if nothing survives filtering
pub fn find_best_target<W: TargetWorld + ?Sized>(
    candidates: &[Entity],
    requester: Entity,
    ctx: &ScoringContext,
    world: &W,
    config: &LockOnConfig,
) -> Option<Entity> {
    let mut best: Option<(Entity, f32)> = None;

    for &candidate in candidates {
        match evaluate(candidate, requester, ctx, world, config) {
            Ok(score) => {
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((candidate, score));
                }
            }
            Err(reason) => debug!(%candidate, %reason, "lock-on candidate rejected"),
        }
    }

    best.map(|(entity, _)| entity)
}
