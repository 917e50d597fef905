//! Perception: distance + line of sight to the target, recomputed every tick.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;

use crate::physics::{group_from_mask, ObstructionTest};

use super::components::BehaviorConfig;

/// What the agent knows about its target this tick (no history kept)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PerceptionResult {
    pub distance: f32,
    pub visible: bool,
}

/// Inputs of the line-of-sight check, lifted out of `BehaviorConfig`
#[derive(Debug, Clone, Copy)]
pub struct PerceptionParams {
    pub max_detection_distance: f32,
    pub eye_height: f32,
    pub obstruction_mask: Group,
}

impl From<&BehaviorConfig> for PerceptionParams {
    fn from(config: &BehaviorConfig) -> Self {
        Self {
            max_detection_distance: config.max_detection_distance,
            eye_height: config.eye_height,
            obstruction_mask: group_from_mask(config.obstruction_mask),
        }
    }
}

/// Distance + visibility of `target` seen from `agent`.
///
/// Beyond `max_detection_distance` the target is invisible and no ray is
/// cast. Otherwise a ray leaves the agent's eye (raised by `eye_height`)
/// and ends at the target; any obstruction-layer hit along it blocks sight.
pub fn perceive(
    agent: Vec3,
    target: Vec3,
    params: &PerceptionParams,
    obstruction: &dyn ObstructionTest,
) -> PerceptionResult {
    let distance = agent.distance(target);

    if distance > params.max_detection_distance {
        return PerceptionResult {
            distance,
            visible: false,
        };
    }

    let eye = agent + Vec3::Y * params.eye_height;
    let to_target = target - eye;
    let direction = to_target.normalize_or_zero();

    // Target exactly at the eye: nothing can be in between
    if direction == Vec3::ZERO {
        return PerceptionResult {
            distance,
            visible: true,
        };
    }

    let blocked = obstruction
        .cast_ray(eye, direction, to_target.length(), params.obstruction_mask)
        .is_some();

    PerceptionResult {
        distance,
        visible: !blocked,
    }
}
