//! Physics queries for the behavior layer
//!
//! No rigid-body simulation here: rapier colliders are only used as shapes
//! for line-of-sight rays and for sizing door proximity checks.

pub mod layers;
pub mod obstruction;


pub use layers::*;
pub use obstruction::{ColliderObstruction, Obstacle, ObstructionTest};
