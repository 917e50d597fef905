//! Behavior systems (ECS wiring of the controller).
//!
//! - `initialize_behavior_agents`: first wander destination, target check
//! - `behavior_tick`: perception → FSM → navigation/animation commands

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, CollisionGroups};

use crate::animation::Animator;
use crate::error::BehaviorError;
use crate::movement::{NavAgent, NavigableArea};
use crate::physics::ColliderObstruction;
use crate::DeterministicRng;

use super::components::{BehaviorConfig, BehaviorController, BehaviorTarget};
use super::controller::{AgentPose, TickServices};
use super::events::BehaviorTransition;

/// Detach the controller from an agent whose target vanished
fn detach_controller(commands: &mut Commands, agent: Entity, error: BehaviorError) {
    crate::log_error(&format!(
        "❌ {:?}: {}, detaching behavior controller",
        agent, error
    ));
    commands.entity(agent).remove::<BehaviorController>();
}

/// System: start freshly spawned agents
///
/// Verifies the target entity exists (fail fast: an agent with a dangling
/// target is detached with an error instead of ticking blind forever),
/// then requests the first wander destination.
pub fn initialize_behavior_agents(
    mut commands: Commands,
    mut agents: Query<(
        Entity,
        &Transform,
        &mut BehaviorController,
        &BehaviorConfig,
        &BehaviorTarget,
        &mut NavAgent,
    )>,
    targets: Query<&Transform, Without<BehaviorController>>,
    area: Res<NavigableArea>,
    mut rng: ResMut<DeterministicRng>,
) {
    for (entity, transform, mut controller, config, target, mut nav_agent) in agents.iter_mut() {
        if controller.started {
            continue;
        }

        if targets.get(target.0).is_err() {
            detach_controller(&mut commands, entity, BehaviorError::TargetWithoutTransform(target.0));
            continue;
        }

        let destination = controller.start(
            config,
            transform.translation,
            &mut *nav_agent,
            &*area,
            &mut rng.rng,
        );

        crate::log_info(&format!(
            "🧠 {:?} spawned → Wandering (target {:?}, first destination {:?})",
            entity, target.0, destination
        ));
    }
}

/// System: one behavior tick per agent
///
/// Obstacle colliders are snapshotted once per run and shared by all agents.
/// Position stays navigation's job; only the rotation is written back.
#[allow(clippy::too_many_arguments)]
pub fn behavior_tick(
    mut commands: Commands,
    mut agents: Query<(
        Entity,
        &mut Transform,
        &mut BehaviorController,
        &BehaviorConfig,
        &BehaviorTarget,
        &mut NavAgent,
        &mut Animator,
    )>,
    targets: Query<&Transform, Without<BehaviorController>>,
    obstacles: Query<(&Transform, &Collider, &CollisionGroups), Without<BehaviorController>>,
    area: Res<NavigableArea>,
    mut rng: ResMut<DeterministicRng>,
    mut transitions: EventWriter<BehaviorTransition>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let obstruction = ColliderObstruction::from_colliders(obstacles.iter());

    for (entity, mut transform, mut controller, config, target, mut nav_agent, mut animator) in
        agents.iter_mut()
    {
        if !controller.started {
            continue;
        }

        let Ok(target_transform) = targets.get(target.0) else {
            detach_controller(&mut commands, entity, BehaviorError::TargetWithoutTransform(target.0));
            continue;
        };

        let mut pose = AgentPose::from(&*transform);
        let mut services = TickServices {
            navigation: &mut *nav_agent,
            surface: &*area,
            animation: &mut *animator,
            obstruction: &obstruction,
            rng: &mut rng.rng,
        };

        let outcome = controller.tick(
            config,
            &mut pose,
            target_transform.translation,
            &mut services,
            delta,
        );

        if transform.rotation != pose.rotation {
            transform.rotation = pose.rotation;
        }

        let Some(transition) = outcome.transition else {
            continue;
        };

        crate::log(&format!(
            "🧠 {:?} {} → {} ({:?}, distance {:.2}, visible {})",
            entity,
            transition.from.as_str(),
            transition.to.as_str(),
            transition.cause,
            outcome.perception.distance,
            outcome.perception.visible
        ));

        transitions.write(BehaviorTransition {
            entity,
            from: transition.from,
            to: transition.to,
            cause: transition.cause,
        });
    }
}
