//! Environment interaction: agents open closed doors they walk up to.
//!
//! Runs independently of the behavior state. The agent never touches door
//! internals: it asks through `Openable` and the door decides.

pub mod door;


pub use door::*;

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, CollisionGroups};

use crate::ai::components::{BehaviorConfig, BehaviorController};
use crate::physics::group_from_mask;

/// Open/closed contract a door-like object exposes to agents.
pub trait Openable {
    fn is_open(&self) -> bool;
    fn is_moving(&self) -> bool;
    /// Ask the object to start opening. Returns whether it accepted.
    fn request_open(&mut self) -> bool;
}

/// Request every closed, resting candidate to open.
///
/// `None` candidates (objects on the interaction layer without the
/// contract) are skipped. Returns how many requests were accepted.
pub fn open_nearby_doors<'a>(candidates: impl IntoIterator<Item = Option<&'a mut dyn Openable>>) -> usize {
    let mut opened = 0;

    for candidate in candidates {
        let Some(door) = candidate else {
            continue;
        };

        if !door.is_open() && !door.is_moving() && door.request_open() {
            opened += 1;
        }
    }

    opened
}

/// Distance from `point` to the surface of an interactable (or its origin
/// when it has no collider)
fn distance_to_interactable(point: Vec3, transform: &Transform, collider: Option<&Collider>) -> f32 {
    match collider {
        Some(collider) => {
            let projection = collider.project_point(transform.translation, transform.rotation, point, true);
            if projection.is_inside {
                0.0
            } else {
                projection.point.distance(point)
            }
        }
        None => transform.translation.distance(point),
    }
}

/// System: open doors near behavior agents
///
/// Every tick, for each agent, every entity on the agent's door layer within
/// `door_detection_radius` is a candidate. Entities without a `Door` are
/// skipped.
pub fn door_interaction(
    agents: Query<(Entity, &Transform, &BehaviorConfig), With<BehaviorController>>,
    mut interactables: Query<
        (Entity, &Transform, &CollisionGroups, Option<&Collider>, Option<&mut Door>),
        Without<BehaviorController>,
    >,
) {
    for (agent, agent_transform, config) in agents.iter() {
        let mask = group_from_mask(config.door_mask);
        let position = agent_transform.translation;

        let candidates = interactables
            .iter_mut()
            .filter(|(_, _, groups, _, _)| groups.memberships.intersects(mask))
            .filter(|(_, transform, _, collider, _)| {
                distance_to_interactable(position, transform, *collider) <= config.door_detection_radius
            })
            .map(|(entity, _, _, _, door)| (entity, door));

        let mut nearby = Vec::new();
        for (entity, door) in candidates {
            if door.is_none() {
                crate::log(&format!(
                    "door_interaction: {:?} on door layer has no Door, skipped",
                    entity
                ));
            }
            nearby.push(door);
        }

        let opened = open_nearby_doors(
            nearby
                .iter_mut()
                .map(|door| door.as_mut().map(|door| &mut **door as &mut dyn Openable)),
        );

        if opened > 0 {
            crate::log(&format!("🚪 {:?} opened {} door(s)", agent, opened));
        }
    }
}
