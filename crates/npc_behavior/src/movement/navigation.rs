//! Navigation service contract + headless implementation.
//!
//! The controller only ever talks to `NavigationService` (per agent) and
//! `NavigableSurface` (shared). Path planning lives behind them:
//! - engines plug their nav agent / navmesh in by implementing the traits
//! - headless runs use `NavAgent` (straight-line kinematic mover) and
//!   `NavigableArea` (rectangular walkable regions)

use bevy::prelude::*;

/// Per-agent navigation handle (polled every tick, no callbacks)
pub trait NavigationService {
    /// Idempotent for an unchanged destination: must not restart the path.
    fn set_destination(&mut self, point: Vec3);
    fn set_stopped(&mut self, stopped: bool);
    fn is_stopped(&self) -> bool;
    fn velocity(&self) -> Vec3;
    fn remaining_distance(&self) -> f32;
    fn path_pending(&self) -> bool;
    fn stopping_distance(&self) -> f32;
    fn speed(&self) -> f32;
}

/// Walkable surface query.
pub trait NavigableSurface {
    /// Closest walkable point to `near`, if one lies within `radius`.
    fn sample_navigable_point(&self, near: Vec3, radius: f32) -> Option<Vec3>;
}

/// Destinations closer than this to the current one count as unchanged
const DESTINATION_EPSILON: f32 = 0.01;

/// Headless navigation agent: walks straight at the destination.
///
/// The first destination is resolved on the next navigation step
/// (`path_pending` stays true for one tick), mimicking an engine that
/// computes paths asynchronously. Changing an existing destination
/// retargets in place, so a moving chase target never stalls the agent.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    /// Max movement speed (m/s)
    pub speed: f32,
    /// Arrival tolerance (m)
    pub stopping_distance: f32,
    pub destination: Option<Vec3>,
    pub stopped: bool,
    pub velocity: Vec3,
    pub remaining_distance: f32,
    pub path_pending: bool,
    /// Number of times a path was (re)started; unchanged destinations don't bump it
    pub path_requests: u32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            speed: 3.5,
            stopping_distance: 0.1,
            destination: None,
            stopped: false,
            velocity: Vec3::ZERO,
            remaining_distance: 0.0,
            path_pending: false,
            path_requests: 0,
        }
    }
}

impl NavAgent {
    pub fn with_speed(speed: f32) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }

    /// Advance one navigation step and return the new position.
    pub fn step(&mut self, position: Vec3, delta: f32) -> Vec3 {
        let Some(destination) = self.destination else {
            self.velocity = Vec3::ZERO;
            self.remaining_distance = 0.0;
            return position;
        };

        let to_destination = destination - position;
        let distance = to_destination.length();

        if self.path_pending {
            // Path "computed" this step, movement starts next one
            self.path_pending = false;
            self.remaining_distance = distance;
            self.velocity = Vec3::ZERO;
            return position;
        }

        if self.stopped || distance <= self.stopping_distance {
            self.velocity = Vec3::ZERO;
            self.remaining_distance = distance;
            return position;
        }

        let travel = (self.speed * delta).min(distance);
        let direction = to_destination / distance;
        let new_position = position + direction * travel;

        self.velocity = direction * self.speed;
        self.remaining_distance = distance - travel;

        new_position
    }
}

impl NavigationService for NavAgent {
    fn set_destination(&mut self, point: Vec3) {
        let unchanged = self
            .destination
            .is_some_and(|current| current.distance(point) <= DESTINATION_EPSILON);

        if unchanged {
            return;
        }

        // Only the first path resolves with a delay; replanning keeps walking
        if self.destination.is_none() {
            self.path_pending = true;
        }
        self.destination = Some(point);
        self.path_requests += 1;
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
        if stopped {
            self.velocity = Vec3::ZERO;
        }
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining_distance
    }

    fn path_pending(&self) -> bool {
        self.path_pending
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn speed(&self) -> f32 {
        self.speed
    }
}

/// Rectangular walkable region (XZ bounds at a fixed ground height)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct NavRegion {
    pub min: Vec2,
    pub max: Vec2,
    pub height: f32,
}

impl NavRegion {
    pub fn new(min: Vec2, max: Vec2, height: f32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            height,
        }
    }

    /// Square centered on the origin
    pub fn square(half_extent: f32) -> Self {
        Self::new(Vec2::splat(-half_extent), Vec2::splat(half_extent), 0.0)
    }

    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let planar = Vec2::new(point.x, point.z).clamp(self.min, self.max);
        Vec3::new(planar.x, self.height, planar.y)
    }
}

/// Headless navmesh: union of rectangular regions
#[derive(Resource, Debug, Clone, Default, Reflect)]
#[reflect(Resource)]
pub struct NavigableArea {
    pub regions: Vec<NavRegion>,
}

impl NavigableArea {
    pub fn new(regions: Vec<NavRegion>) -> Self {
        Self { regions }
    }
}

impl NavigableSurface for NavigableArea {
    fn sample_navigable_point(&self, near: Vec3, radius: f32) -> Option<Vec3> {
        self.regions
            .iter()
            .map(|region| region.closest_point(near))
            .map(|point| (point, point.distance(near)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(point, _)| point)
    }
}

/// System: advance headless nav agents and write the result into Transform
pub fn navigation_step(mut agents: Query<(&mut NavAgent, &mut Transform)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (mut agent, mut transform) in agents.iter_mut() {
        let new_position = agent.step(transform.translation, delta);
        if new_position != transform.translation {
            transform.translation = new_position;
        }
    }
}
