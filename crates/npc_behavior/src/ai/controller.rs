//! Behavior FSM: wander → idle → wander, chase → attack, forced de-escalation.
//!
//! Evaluated once per fixed tick, in priority order:
//! 1. Chasing/Attacking and target not visible → Wandering (pre-empts all)
//! 2. Target visible → keep swinging while the attack clip runs, else chase
//!    (re-attack when within `stop_threshold`)
//! 3. Otherwise Wandering → Idle (arrival or timeout), Idle → Wandering
//!    (idle time elapsed)
//! 4. Locomotion blend from velocity whenever not attacking
//!
//! Collaborators are passed in per tick (`TickServices`), so the FSM runs
//! the same against the headless ECS implementations and test fakes.

use bevy::prelude::*;
use rand::RngCore;

use crate::animation::{locomotion_blend, AnimationSink, ATTACK_BLEND, ATTACK_CLIP, NEUTRAL_BLEND};
use crate::movement::{face_smoothly, pick_random_wander_destination, planar_distance};
use crate::movement::{NavigableSurface, NavigationService};
use crate::physics::ObstructionTest;

use super::components::{
    BehaviorConfig, BehaviorController, BehaviorState, Transition, TransitionCause,
};
use super::perception::{perceive, PerceptionParams, PerceptionResult};

/// Agent transform as seen by the controller.
///
/// The controller writes `rotation`; `position` belongs to navigation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl From<&Transform> for AgentPose {
    fn from(transform: &Transform) -> Self {
        Self {
            position: transform.translation,
            rotation: transform.rotation,
        }
    }
}

/// Collaborators injected into every tick
pub struct TickServices<'a> {
    pub navigation: &'a mut dyn NavigationService,
    pub surface: &'a dyn NavigableSurface,
    pub animation: &'a mut dyn AnimationSink,
    pub obstruction: &'a dyn ObstructionTest,
    pub rng: &'a mut dyn RngCore,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub perception: PerceptionResult,
    /// `from == to` is possible: Attacking → Attacking is a fresh swing
    pub transition: Option<Transition>,
    /// Wander destination successfully requested this tick
    pub wander_destination: Option<Vec3>,
}

impl BehaviorController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn-time setup: Wandering with a first random destination.
    pub fn start(
        &mut self,
        config: &BehaviorConfig,
        position: Vec3,
        navigation: &mut dyn NavigationService,
        surface: &dyn NavigableSurface,
        rng: &mut dyn RngCore,
    ) -> Option<Vec3> {
        self.state = BehaviorState::Wandering;
        self.timers.reset();
        self.started = true;
        pick_random_wander_destination(position, config.wander_radius, surface, navigation, rng)
    }

    pub fn tick(
        &mut self,
        config: &BehaviorConfig,
        pose: &mut AgentPose,
        target: Vec3,
        services: &mut TickServices<'_>,
        delta: f32,
    ) -> TickOutcome {
        let from = self.state;
        let perception = perceive(
            pose.position,
            target,
            &PerceptionParams::from(config),
            services.obstruction,
        );

        if self.state.is_target_aware() && !perception.visible {
            let wander_destination = self.de_escalate(config, pose.position, services);

            // Pre-empts everything else, blend included (already neutral)
            return TickOutcome {
                perception,
                transition: Some(Transition {
                    from,
                    to: self.state,
                    cause: TransitionCause::LostSight,
                }),
                wander_destination,
            };
        }

        let mut wander_destination = None;

        let cause = if perception.visible {
            self.pursue(config, pose, target, services, delta)
        } else {
            self.wander(config, pose.position, services, delta, &mut wander_destination)
        };

        if self.state != BehaviorState::Attacking {
            let blend = locomotion_blend(services.navigation.velocity(), services.navigation.speed());
            services.animation.set_blend(blend);
        }

        TickOutcome {
            perception,
            transition: cause.map(|cause| Transition {
                from,
                to: self.state,
                cause,
            }),
            wander_destination,
        }
    }

    /// Target lost while aware: back to Wandering, timers zeroed, moving,
    /// neutral blend, fresh destination.
    fn de_escalate(
        &mut self,
        config: &BehaviorConfig,
        position: Vec3,
        services: &mut TickServices<'_>,
    ) -> Option<Vec3> {
        self.state = BehaviorState::Wandering;
        self.timers.reset();
        services.navigation.set_stopped(false);
        services.animation.set_blend(NEUTRAL_BLEND);
        self.request_wander(config, position, services)
    }

    fn pursue(
        &mut self,
        config: &BehaviorConfig,
        pose: &mut AgentPose,
        target: Vec3,
        services: &mut TickServices<'_>,
        delta: f32,
    ) -> Option<TransitionCause> {
        let to_target = target - pose.position;

        let mut cause = match self.state {
            BehaviorState::Attacking => {
                let swinging = services.animation.current_clip() == ATTACK_CLIP
                    && services.animation.normalized_time() < 1.0;

                if swinging {
                    services.navigation.set_stopped(true);
                    services.animation.set_blend(ATTACK_BLEND);
                    face_smoothly(&mut pose.rotation, to_target, config.face_speed, delta);
                    return None;
                }

                // Swing over: fall through to the chase branch this same tick
                Some(TransitionCause::AttackFinished)
            }
            BehaviorState::Chasing => None,
            BehaviorState::Wandering | BehaviorState::Idle => Some(TransitionCause::TargetSpotted),
        };

        self.state = BehaviorState::Chasing;
        services.navigation.set_stopped(false);
        services.navigation.set_destination(target);

        if planar_distance(pose.position, target) <= config.stop_threshold {
            services.navigation.set_stopped(true);
            self.state = BehaviorState::Attacking;
            services.animation.set_blend(ATTACK_BLEND);
            face_smoothly(&mut pose.rotation, to_target, config.face_speed, delta);
            cause = Some(TransitionCause::InStopRange);
        } else {
            // Turn along the path, not at the target
            let velocity = services.navigation.velocity();
            face_smoothly(&mut pose.rotation, velocity, config.face_speed, delta);
        }

        cause
    }

    fn wander(
        &mut self,
        config: &BehaviorConfig,
        position: Vec3,
        services: &mut TickServices<'_>,
        delta: f32,
        wander_destination: &mut Option<Vec3>,
    ) -> Option<TransitionCause> {
        match self.state {
            BehaviorState::Wandering => {
                self.timers.wander_countdown += delta;

                let navigation = &*services.navigation;
                let arrived = !navigation.path_pending()
                    && navigation.remaining_distance() <= navigation.stopping_distance();

                if arrived {
                    self.state = BehaviorState::Idle;
                    Some(TransitionCause::Arrived)
                } else if self.timers.wander_countdown > config.wander_timer {
                    self.state = BehaviorState::Idle;
                    Some(TransitionCause::WanderTimeout)
                } else {
                    None
                }
            }
            BehaviorState::Idle => {
                self.timers.idle_timer += delta;

                if self.timers.idle_timer > config.idle_time_at_destination {
                    self.state = BehaviorState::Wandering;
                    self.timers.reset();
                    *wander_destination = self.request_wander(config, position, services);
                    Some(TransitionCause::IdleElapsed)
                } else {
                    None
                }
            }
            // Aware states never get here: visible → pursue, invisible → de_escalate
            BehaviorState::Chasing | BehaviorState::Attacking => None,
        }
    }

    fn request_wander(
        &mut self,
        config: &BehaviorConfig,
        position: Vec3,
        services: &mut TickServices<'_>,
    ) -> Option<Vec3> {
        let destination = pick_random_wander_destination(
            position,
            config.wander_radius,
            services.surface,
            &mut *services.navigation,
            &mut *services.rng,
        );

        if destination.is_none() {
            crate::log(&format!(
                "wander: no navigable point within {:.1}m of {:?}, keeping previous destination",
                config.wander_radius, position
            ));
        }

        destination
    }
}
