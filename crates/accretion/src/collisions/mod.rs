//! Collision handling for planet formation runs
//!
//! This module turns engine-reported collisions into partial-accretion
//! mergers, records them in the collision forest, and classifies bodies that
//! leave the system.

pub mod forest;
pub mod impact;
pub mod resolution;
pub mod terminal;

#[cfg(test)]
mod forest_test;
#[cfg(test)]
mod terminal_test;

pub use forest::{Ancestors, CollisionForest, CollisionRecord, ForestEntry, LostMass};
pub use impact::{
    ALPHA_RANGE, GAMMA_RANGE, ImpactInput, PROJECTILE_MASS_RANGE, VELOCITY_RANGE, measure_impact,
};
pub use resolution::{
    CollisionAction, CollisionResolver, MergeOutcome, choose_target, keep_lower_slot, merge_bodies,
};
pub use terminal::{TerminalCriteria, TerminalEvent, kepler_semi_major_axis};
