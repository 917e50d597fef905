//! Behavior FSM components: state, timers, target link.

use bevy::prelude::*;

/// Behavior FSM states
///
/// Exactly one is active; Chasing/Attacking ("target aware") exclude
/// Wandering/Idle, so wander timers don't matter while aware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum BehaviorState {
    /// Walking to a random destination
    #[default]
    Wandering,
    /// Waiting at the destination (or after a wander timeout)
    Idle,
    /// Target visible, walking toward it
    Chasing,
    /// Target within stop threshold, swinging
    Attacking,
}

impl BehaviorState {
    pub fn is_target_aware(&self) -> bool {
        matches!(self, BehaviorState::Chasing | BehaviorState::Attacking)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorState::Wandering => "Wandering",
            BehaviorState::Idle => "Idle",
            BehaviorState::Chasing => "Chasing",
            BehaviorState::Attacking => "Attacking",
        }
    }
}

/// Why a transition fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum TransitionCause {
    /// Chasing/Attacking and the target is no longer visible
    LostSight,
    /// Wandering/Idle and the target became visible
    TargetSpotted,
    /// Planar distance ≤ stop threshold
    InStopRange,
    /// Attack clip completed (or was replaced) while the target is visible
    AttackFinished,
    /// Navigation reports the wander destination reached
    Arrived,
    /// Wander destination not reached within `wander_timer`
    WanderTimeout,
    /// Idle time at destination elapsed
    IdleElapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Transition {
    pub from: BehaviorState,
    pub to: BehaviorState,
    pub cause: TransitionCause,
}

/// Wander/idle timers (seconds), owned by the controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct WanderTimers {
    /// Time spent walking to the current wander destination
    pub wander_countdown: f32,
    /// Time spent idling
    pub idle_timer: f32,
}

impl WanderTimers {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Behavior controller component: FSM state + timers
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct BehaviorController {
    pub state: BehaviorState,
    pub timers: WanderTimers,
    /// Set once the first wander destination has been requested
    pub started: bool,
}

/// Entity the agent perceives and chases (read only)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct BehaviorTarget(pub Entity);
