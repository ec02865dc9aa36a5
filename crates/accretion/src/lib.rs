//! Partial-accretion collisions for planet formation runs
//!
//! An external N-body engine integrates the bodies. This crate decides what
//! happens when two of them touch: the [`CollisionResolver`] measures the
//! impact, asks a retention estimator how much water, mantle and core survive,
//! and replaces the pair with one merged body under a fresh identity. The
//! composition of every body lives in the [`BodyRegistry`] and every merger in
//! the [`CollisionForest`], so the growth history of a final planet can be
//! walked back to its seeds.
//!
//! The [`Driver`] runs the engine in save intervals and keeps all of this in a
//! [`RunState`] that is checkpointed to disk after each interval.

pub mod analysis;
pub mod body;
pub mod checkpoint;
pub mod collisions;
pub mod config;
pub mod driver;
pub mod error;
pub mod history;
pub mod initcon;
pub mod radius;
pub mod registry;
pub mod state;

#[cfg(test)]
mod analysis_test;
#[cfg(test)]
mod body_test;
#[cfg(test)]
mod initcon_test;
#[cfg(test)]
mod test_support;

pub use body::{Body, BodyId, Contact};
pub use checkpoint::{CheckpointPaths, RunLock};
pub use collisions::{
    CollisionAction, CollisionForest, CollisionRecord, CollisionResolver, ForestEntry,
    ImpactInput, TerminalCriteria, TerminalEvent,
};
pub use config::RunConfig;
pub use driver::{CollisionHandler, Driver, EngineStatus, RunOutcome, SimulationEngine};
pub use error::{AccretionError, Result};
pub use history::{Diagnostics, History};
pub use initcon::{InitialConditions, SeedBody};
pub use registry::{BodyRecord, BodyRegistry, BodyType, TerminalKind};
pub use state::{AbortFlag, RunMeta, RunState};
