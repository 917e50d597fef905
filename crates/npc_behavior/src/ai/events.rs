//! AI events written by the behavior tick

use bevy::prelude::*;

use super::components::{BehaviorState, TransitionCause};

/// Behavior state change of one agent
///
/// Hosts poll these instead of diffing `BehaviorController` every frame.
/// `from == to` (Attacking → Attacking) marks a fresh swing.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BehaviorTransition {
    pub entity: Entity,
    pub from: BehaviorState,
    pub to: BehaviorState,
    pub cause: TransitionCause,
}
