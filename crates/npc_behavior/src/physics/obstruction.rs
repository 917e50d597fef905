//! Obstruction test: does anything on a layer block a ray?
//!
//! Line of sight only needs hit/no-hit, so the contract is a single
//! `cast_ray` returning the distance to the first blocker. The ECS
//! implementation walks rapier `Collider` shapes directly; no physics step
//! or rapier context is required.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, CollisionGroups, Group};

/// Ray query against static scene geometry.
pub trait ObstructionTest {
    /// Distance to the first shape on `mask` hit within `max_distance`.
    ///
    /// `direction` must be normalized.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: Group) -> Option<f32>;
}

/// One blocker: collider pose + the layers it belongs to.
#[derive(Clone)]
pub struct Obstacle {
    pub translation: Vec3,
    pub rotation: Quat,
    pub collider: Collider,
    pub memberships: Group,
}

impl Obstacle {
    pub fn new(transform: &Transform, collider: &Collider, groups: &CollisionGroups) -> Self {
        Self {
            translation: transform.translation,
            rotation: transform.rotation,
            collider: collider.clone(),
            memberships: groups.memberships,
        }
    }
}

/// Per-tick snapshot of obstacle colliders.
///
/// Built once per system run, then shared by every agent's perception.
#[derive(Default, Clone)]
pub struct ColliderObstruction {
    obstacles: Vec<Obstacle>,
}

impl ColliderObstruction {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn from_colliders<'a>(
        items: impl IntoIterator<Item = (&'a Transform, &'a Collider, &'a CollisionGroups)>,
    ) -> Self {
        Self {
            obstacles: items
                .into_iter()
                .map(|(transform, collider, groups)| Obstacle::new(transform, collider, groups))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl ObstructionTest for ColliderObstruction {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: Group) -> Option<f32> {
        self.obstacles
            .iter()
            .filter(|obstacle| obstacle.memberships.intersects(mask))
            .filter_map(|obstacle| {
                obstacle.collider.cast_ray(
                    obstacle.translation,
                    obstacle.rotation,
                    origin,
                    direction,
                    max_distance,
                    true,
                )
            })
            .min_by(|a, b| a.total_cmp(b))
    }
}
