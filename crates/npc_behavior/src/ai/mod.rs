//! AI decision-making module
//!
//! Perception-driven FSM: Wandering ↔ Idle while the target is unseen,
//! Chasing → Attacking while it is visible.
//!
//! Layout:
//! - components: BehaviorController, BehaviorConfig, BehaviorTarget
//! - perception: distance + line of sight
//! - controller: the FSM tick (collaborators injected via traits)
//! - systems: ECS wiring

use bevy::prelude::*;

pub mod bundle;
pub mod components;
pub mod controller;
pub mod events;
pub mod perception;
pub mod systems;


pub use bundle::BehaviorAgentBundle;
pub use components::*;
pub use controller::{AgentPose, TickOutcome, TickServices};
pub use events::BehaviorTransition;
pub use perception::{perceive, PerceptionParams, PerceptionResult};

use crate::animation::{animation_step, Animator};
use crate::interaction::{door_interaction, door_motion, Door};
use crate::movement::{navigation_step, NavAgent, NavigableArea};
use crate::DeterministicRng;

/// Behavior Plugin
///
/// Registers everything in FixedUpdate. Order:
/// 1. initialize_behavior_agents: first wander destination
/// 2. behavior_tick: perception → FSM → nav/animation commands
/// 3. navigation_step: headless agents walk
/// 4. animation_step: clips advance
/// 5. door_interaction: open doors near agents (independent of FSM state)
/// 6. door_motion: doors swing
pub struct BehaviorPlugin;

impl Plugin for BehaviorPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_event::<BehaviorTransition>()
            .init_resource::<NavigableArea>()
            .register_type::<BehaviorController>()
            .register_type::<BehaviorConfig>()
            .register_type::<BehaviorTarget>()
            .register_type::<NavAgent>()
            .register_type::<NavigableArea>()
            .register_type::<Animator>()
            .register_type::<Door>()
            .add_systems(
                FixedUpdate,
                (
                    systems::initialize_behavior_agents,
                    systems::behavior_tick,
                    navigation_step,
                    animation_step,
                    door_interaction,
                    door_motion,
                )
                    .chain(), // Sequential for determinism
            );
    }
}
