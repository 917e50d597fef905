//! Behavior tuning: radii, timers, thresholds, layer masks.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{BehaviorError, BehaviorResult};
use crate::physics::layers::{MASK_DOORS, MASK_LINE_OF_SIGHT};

/// Behavior controller tunables (one per agent)
///
/// Radii are reflected so inspectors can show them instead of debug gizmos.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Radius of the sphere wander destinations are drawn from (meters)
    pub wander_radius: f32,
    /// Max time spent walking to one wander destination (seconds)
    pub wander_timer: f32,
    /// Time spent idling at a destination before picking a new one (seconds)
    pub idle_time_at_destination: f32,
    /// Targets farther than this are never visible (no ray is cast)
    pub max_detection_distance: f32,
    /// Ray origin offset above the agent position
    pub eye_height: f32,
    /// Slerp rate for facing (per second)
    pub face_speed: f32,
    /// Planar distance at which chasing turns into attacking
    pub stop_threshold: f32,
    /// Inspectable only. Does not gate any transition, `stop_threshold` does.
    pub attack_range: f32,
    /// Doors closer than this get opened
    pub door_detection_radius: f32,
    /// Layer bits that block line of sight
    pub obstruction_mask: u32,
    /// Layer bits that doors live on
    pub door_mask: u32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            wander_radius: 10.0,
            wander_timer: 5.0,
            idle_time_at_destination: 3.0,
            max_detection_distance: 10.0,
            eye_height: 1.0,
            face_speed: 5.0,
            stop_threshold: 0.15,
            attack_range: 1.5,
            door_detection_radius: 2.0,
            obstruction_mask: MASK_LINE_OF_SIGHT,
            door_mask: MASK_DOORS,
        }
    }
}

impl BehaviorConfig {
    /// Rejects negative or non-finite tunables.
    ///
    /// Zero is allowed everywhere: a zero `wander_timer` just means "idle on
    /// the next tick", a zero `max_detection_distance` a blind agent.
    pub fn validate(&self) -> BehaviorResult<()> {
        let fields = [
            ("wander_radius", self.wander_radius),
            ("wander_timer", self.wander_timer),
            ("idle_time_at_destination", self.idle_time_at_destination),
            ("max_detection_distance", self.max_detection_distance),
            ("eye_height", self.eye_height),
            ("face_speed", self.face_speed),
            ("stop_threshold", self.stop_threshold),
            ("attack_range", self.attack_range),
            ("door_detection_radius", self.door_detection_radius),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(BehaviorError::InvalidConfig { field, value });
            }
        }

        Ok(())
    }

    /// Parse a TOML preset. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> BehaviorResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> BehaviorResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
