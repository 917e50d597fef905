//! Random wander destinations.

use bevy::prelude::*;
use rand::Rng;

use super::navigation::{NavigableSurface, NavigationService};

/// Uniform sample inside the unit ball (rejection sampling)
pub fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let candidate = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if candidate.length_squared() <= 1.0 {
            return candidate;
        }
    }
}

/// Pick a random point within `radius` of `origin`, snap it to the
/// navigable surface and send the agent there.
///
/// Returns the new destination. On a failed projection nothing changes and
/// `None` is returned; the next wander cycle simply tries again.
pub fn pick_random_wander_destination<R: Rng + ?Sized>(
    origin: Vec3,
    radius: f32,
    surface: &dyn NavigableSurface,
    navigation: &mut dyn NavigationService,
    rng: &mut R,
) -> Option<Vec3> {
    let sample = origin + random_in_unit_sphere(rng) * radius;
    let destination = surface.sample_navigable_point(sample, radius)?;
    navigation.set_destination(destination);
    Some(destination)
}
