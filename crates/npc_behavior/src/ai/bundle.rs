//! Spawn bundle for behavior agents (fails fast on bad input).

use bevy::prelude::*;
use bevy_rapier3d::prelude::{CollisionGroups, Group};

use crate::animation::Animator;
use crate::error::{BehaviorError, BehaviorResult};
use crate::movement::NavAgent;
use crate::physics::LAYER_ACTORS;

use super::components::{BehaviorConfig, BehaviorController, BehaviorTarget};

/// Everything a behavior agent needs: controller, tuning, target link and
/// the headless navigation/animation collaborators.
#[derive(Bundle)]
pub struct BehaviorAgentBundle {
    pub controller: BehaviorController,
    pub config: BehaviorConfig,
    pub target: BehaviorTarget,
    pub nav_agent: NavAgent,
    pub animator: Animator,
    pub transform: Transform,
    pub groups: CollisionGroups,
}

impl BehaviorAgentBundle {
    /// `target` is required: an agent without one would never perceive
    /// anything, so it's rejected here instead of being skipped every tick.
    pub fn new(config: BehaviorConfig, target: Option<Entity>, transform: Transform) -> BehaviorResult<Self> {
        let target = target.ok_or(BehaviorError::MissingTarget)?;
        config.validate()?;

        Ok(Self {
            controller: BehaviorController::new(),
            config,
            target: BehaviorTarget(target),
            nav_agent: NavAgent::default(),
            animator: Animator::default(),
            transform,
            groups: CollisionGroups::new(LAYER_ACTORS, Group::ALL),
        })
    }

    pub fn with_nav_agent(mut self, nav_agent: NavAgent) -> Self {
        self.nav_agent = nav_agent;
        self
    }

    pub fn with_animator(mut self, animator: Animator) -> Self {
        self.animator = animator;
        self
    }
}
