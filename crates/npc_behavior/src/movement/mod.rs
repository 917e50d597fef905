//! Movement domain: navigation contract, headless navigation, facing, wander
//!
//! Contains:
//! - NavigationService / NavigableSurface (collaborator contracts)
//! - NavAgent + NavigableArea (headless implementations)
//! - face_smoothly / planar_distance (orientation helpers)
//! - pick_random_wander_destination

pub mod facing;
pub mod navigation;
pub mod wander;


pub use facing::*;
pub use navigation::*;
pub use wander::*;
