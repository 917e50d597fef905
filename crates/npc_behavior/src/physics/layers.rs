//! Collision layer constants shared by the obstruction ray and door queries.
//!
//! ## Layers (bitmask, mapped onto rapier `Group`):
//! - Layer 1 (0b1): Reserved
//! - Layer 2 (0b10): Actors (agents, targets)
//! - Layer 3 (0b100): Environment (walls, obstacles that block sight)
//! - Layer 4 (0b1000): Interactables (doors)
//!
//! ## Usage:
//! ```ignore
//! commands.spawn((
//!     Transform::from_xyz(0.0, 1.0, 4.0),
//!     Collider::cuboid(3.0, 1.5, 0.2),
//!     CollisionGroups::new(LAYER_ENVIRONMENT, Group::ALL),
//! ));
//! ```

use bevy_rapier3d::prelude::Group;

pub const LAYER_ACTORS: Group = Group::GROUP_2;
pub const LAYER_ENVIRONMENT: Group = Group::GROUP_3;
pub const LAYER_INTERACTABLES: Group = Group::GROUP_4;

/// Default obstruction mask for line-of-sight rays
pub const MASK_LINE_OF_SIGHT: u32 = LAYER_ENVIRONMENT.bits();

/// Default mask for the door proximity query
pub const MASK_DOORS: u32 = LAYER_INTERACTABLES.bits();

/// Bits → rapier group (unknown bits are dropped)
pub fn group_from_mask(mask: u32) -> Group {
    Group::from_bits_truncate(mask)
}
