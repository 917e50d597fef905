//! Errors surfaced while building or configuring behavior agents.
//!
//! Runtime hiccups (failed wander sampling, doors without the open contract)
//! are not errors: they are skipped and retried by the tick cadence.

use bevy::prelude::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    /// Agent spawned without a target to perceive
    #[error("behavior agent has no target entity")]
    MissingTarget,

    /// Target entity is gone or has no Transform at initialization
    #[error("target {0:?} has no Transform")]
    TargetWithoutTransform(Entity),

    #[error("invalid config: `{field}` = {value}")]
    InvalidConfig { field: &'static str, value: f32 },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to read config: {0}")]
    ConfigIo(#[from] std::io::Error),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
