//! Animation bridge: one blend value in, current clip + progress out.
//!
//! The blend tree itself is the host's business. The controller only:
//! - writes `speed ratio` (0 at rest → 1 at full speed) while moving
//! - pins the blend to `ATTACK_BLEND` while attacking
//! - polls the current clip name and its normalized time

use bevy::prelude::*;

/// Blend value that selects the attack clip
pub const ATTACK_BLEND: f32 = 2.0;

/// Neutral blend (standing still)
pub const NEUTRAL_BLEND: f32 = 0.0;

/// Floor for the speed divisor when computing the locomotion blend
pub const BLEND_SPEED_EPSILON: f32 = 1e-3;

pub const ATTACK_CLIP: &str = "Attack";
pub const LOCOMOTION_CLIP: &str = "Locomotion";

/// Animation sink consumed by the controller.
pub trait AnimationSink {
    fn set_blend(&mut self, value: f32);
    fn blend(&self) -> f32;
    fn current_clip(&self) -> &str;
    /// 0 at clip start, 1 at clip end (keeps growing past 1 if not restarted)
    fn normalized_time(&self) -> f32;
}

/// Locomotion blend for a given velocity and max speed
pub fn locomotion_blend(velocity: Vec3, speed: f32) -> f32 {
    velocity.length() / speed.max(BLEND_SPEED_EPSILON)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AnimationClip {
    Locomotion,
    Attack,
}

impl AnimationClip {
    pub fn name(&self) -> &'static str {
        match self {
            AnimationClip::Locomotion => LOCOMOTION_CLIP,
            AnimationClip::Attack => ATTACK_CLIP,
        }
    }
}

/// Headless animator: a two-clip blend tree.
///
/// Blend ≥ `ATTACK_BLEND` plays the attack clip, anything lower plays
/// locomotion. Pushing the attack blend again after a swing completed
/// starts a fresh swing.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Animator {
    pub blend: f32,
    pub clip: AnimationClip,
    pub normalized_time: f32,
    /// Attack swing duration (seconds)
    pub attack_clip_length: f32,
    /// Locomotion cycle duration (seconds)
    pub locomotion_clip_length: f32,
    /// Swings started since spawn
    pub attacks_started: u32,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            blend: NEUTRAL_BLEND,
            clip: AnimationClip::Locomotion,
            normalized_time: 0.0,
            attack_clip_length: 0.8,
            locomotion_clip_length: 1.0,
            attacks_started: 0,
        }
    }
}

impl Animator {
    pub fn with_attack_length(attack_clip_length: f32) -> Self {
        Self {
            attack_clip_length,
            ..Default::default()
        }
    }

    fn clip_length(&self) -> f32 {
        match self.clip {
            AnimationClip::Locomotion => self.locomotion_clip_length,
            AnimationClip::Attack => self.attack_clip_length,
        }
    }

    pub fn step(&mut self, delta: f32) {
        let length = self.clip_length().max(f32::EPSILON);
        self.normalized_time += delta / length;

        // Locomotion loops; attack keeps counting so "finished" stays observable
        if self.clip == AnimationClip::Locomotion {
            self.normalized_time = self.normalized_time.fract();
        }
    }

    fn start(&mut self, clip: AnimationClip) {
        self.clip = clip;
        self.normalized_time = 0.0;
        if clip == AnimationClip::Attack {
            self.attacks_started += 1;
        }
    }
}

impl AnimationSink for Animator {
    fn set_blend(&mut self, value: f32) {
        self.blend = value;

        let wants_attack = value >= ATTACK_BLEND;
        match (self.clip, wants_attack) {
            (AnimationClip::Locomotion, true) => self.start(AnimationClip::Attack),
            (AnimationClip::Attack, true) if self.normalized_time >= 1.0 => {
                self.start(AnimationClip::Attack)
            }
            (AnimationClip::Attack, false) => self.start(AnimationClip::Locomotion),
            _ => {}
        }
    }

    fn blend(&self) -> f32 {
        self.blend
    }

    fn current_clip(&self) -> &str {
        self.clip.name()
    }

    fn normalized_time(&self) -> f32 {
        self.normalized_time
    }
}

/// System: advance headless animators
pub fn animation_step(mut animators: Query<&mut Animator>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut animator in animators.iter_mut() {
        animator.step(delta);
    }
}
