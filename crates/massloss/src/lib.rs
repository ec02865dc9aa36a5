//! Mass retention estimators for planetary collisions
//!
//! A collision between two differentiated bodies loses part of its water,
//! mantle and core to space. How much depends on the impact angle, the impact
//! velocity relative to the mutual escape velocity, the projectile mass and
//! the mass ratio. This crate provides interchangeable estimators for those
//! retention fractions behind the [`RetentionEstimator`] trait:
//!
//! - [`PerfectMerging`]: no loss at all, the control scenario
//! - [`EmpiricalRetention`]: losses drawn from fixed bounded ranges
//! - [`RbfRetention`]: linear radial-basis-function interpolation over a
//!   dataset of impact simulations
//! - [`NeuralRetention`]: a small feed-forward network trained on the same data
//!
//! Estimators are built once per run with [`build_estimator`] and reused for
//! every collision.

pub mod empirical;
pub mod error;
pub mod estimator;
pub mod neural;
pub mod perfect;
pub mod rbf;

#[cfg(test)]
mod empirical_test;

pub use empirical::EmpiricalRetention;
pub use error::EstimatorError;
pub use estimator::{
    EstimatorKind, EstimatorSources, Retention, RetentionEstimator, build_estimator,
};
pub use neural::{NeuralModel, NeuralRetention};
pub use perfect::PerfectMerging;
pub use rbf::{FeatureScaler, RbfRetention, SimulationSample};
