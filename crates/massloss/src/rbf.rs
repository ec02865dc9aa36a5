//! Radial-basis-function interpolation over impact simulations
//!
//! The dataset holds the outcome of many SPH impact simulations, each
//! described by six parameters (impact angle, v/v_esc, projectile mass, mass
//! ratio, target and projectile water fraction) and three outcomes (retained
//! water, mantle and core fraction).
//!
//! At construction every sample is mapped into a unit feature cube by
//! [`FeatureScaler`] and the weights of a linear RBF (`φ(r) = r`) are found
//! by solving the dense `N × N` interpolation system once. Each query is then
//! a weighted sum of distances to all samples.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;
use crate::estimator::{Retention, RetentionEstimator};

/// Number of input parameters per simulation
pub const FEATURES: usize = 6;

/// Water fraction used for both bodies on every query
///
/// The estimator contract does not carry water fractions, and water-poor
/// bodies fall outside the dataset's sampled range. A small fixed value keeps
/// water-poor collisions inside it.
const QUERY_WATER_FRACTION: f64 = 1e-5;

/// One row of the impact simulation dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSample {
    pub alpha: f64,
    pub velocity: f64,
    pub projectile_mass: f64,
    pub gamma: f64,
    pub target_water_fraction: f64,
    pub projectile_water_fraction: f64,
    pub water_retention: f64,
    pub mantle_retention: f64,
    pub core_retention: f64,
}

impl SimulationSample {
    pub fn features(&self) -> [f64; FEATURES] {
        [
            self.alpha,
            self.velocity,
            self.projectile_mass,
            self.gamma,
            self.target_water_fraction,
            self.projectile_water_fraction,
        ]
    }

    fn outcome(&self) -> [f64; 3] {
        [
            self.water_retention,
            self.mantle_retention,
            self.core_retention,
        ]
    }
}

/// Maps raw impact parameters into a comparable `[0, 1]` range
///
/// Masses and water fractions span many orders of magnitude and are scaled
/// in log10 space; all features are then min-max normalized over the fitted
/// dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    min: [f64; FEATURES],
    max: [f64; FEATURES],
}

impl FeatureScaler {
    const LOG_SCALED: [bool; FEATURES] = [false, false, true, false, true, true];

    fn prepare(raw: [f64; FEATURES]) -> [f64; FEATURES] {
        let mut out = raw;
        for (value, log) in out.iter_mut().zip(Self::LOG_SCALED) {
            if log {
                *value = value.max(f64::MIN_POSITIVE).log10();
            }
        }
        out
    }

    pub fn fit(rows: &[[f64; FEATURES]]) -> Self {
        let mut min = [f64::INFINITY; FEATURES];
        let mut max = [f64::NEG_INFINITY; FEATURES];
        for row in rows {
            let prepared = Self::prepare(*row);
            for i in 0..FEATURES {
                min[i] = min[i].min(prepared[i]);
                max[i] = max[i].max(prepared[i]);
            }
        }
        Self { min, max }
    }

    pub fn transform(&self, raw: [f64; FEATURES]) -> [f64; FEATURES] {
        let prepared = Self::prepare(raw);
        let mut out = [0.0; FEATURES];
        for i in 0..FEATURES {
            let span = self.max[i] - self.min[i];
            // a feature that never varies carries no information
            out[i] = if span > 0.0 {
                (prepared[i] - self.min[i]) / span
            } else {
                0.0
            };
        }
        out
    }
}

fn distance(a: &[f64; FEATURES], b: &[f64; FEATURES]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[derive(Debug, Clone)]
pub struct RbfRetention {
    scaler: FeatureScaler,
    centers: Vec<[f64; FEATURES]>,
    /// N × 3 weights, one column per outcome
    weights: DMatrix<f64>,
}

impl RbfRetention {
    /// Fit the interpolator to a set of simulations
    pub fn fit(samples: &[SimulationSample]) -> Result<Self, EstimatorError> {
        Self::fit_limited(samples, None)
    }

    /// Fit using only the first `limit` samples as centers
    ///
    /// The feature scaler always sees the whole dataset, so a truncated fit
    /// works in the same scaled space as the full one.
    pub fn fit_limited(
        samples: &[SimulationSample],
        limit: Option<usize>,
    ) -> Result<Self, EstimatorError> {
        if samples.is_empty() {
            return Err(EstimatorError::EmptyDataset);
        }

        let raw: Vec<[f64; FEATURES]> = samples.iter().map(|s| s.features()).collect();
        let scaler = FeatureScaler::fit(&raw);
        let samples = &samples[..limit.map_or(samples.len(), |l| l.clamp(1, samples.len()))];
        let centers: Vec<[f64; FEATURES]> = raw[..samples.len()]
            .iter()
            .map(|r| scaler.transform(*r))
            .collect();

        let n = centers.len();
        let phi = DMatrix::from_fn(n, n, |i, j| distance(&centers[i], &centers[j]));
        let outcomes = DMatrix::from_fn(n, 3, |i, j| samples[i].outcome()[j]);

        let weights = phi
            .lu()
            .solve(&outcomes)
            .ok_or(EstimatorError::SingularSystem)?;

        Ok(Self {
            scaler,
            centers,
            weights,
        })
    }

    /// Load a JSON-lines dataset and fit it
    ///
    /// `limit` keeps only the first rows as interpolation centers, which
    /// bounds the size of the dense system for short runs.
    pub fn from_jsonl(path: &Path, limit: Option<usize>) -> Result<Self, EstimatorError> {
        log::info!("loading interpolation dataset from {}", path.display());
        let io_err = |source| EstimatorError::Io {
            path: path.to_path_buf(),
            source,
        };
        let reader = BufReader::new(File::open(path).map_err(io_err)?);

        let mut samples = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(io_err)?;
            if line.trim().is_empty() {
                continue;
            }
            let sample = serde_json::from_str(&line).map_err(|source| EstimatorError::Parse {
                line: index + 1,
                source,
            })?;
            samples.push(sample);
        }

        let estimator = Self::fit_limited(&samples, limit)?;
        log::info!(
            "finished loading interpolation dataset ({} of {} samples)",
            estimator.sample_count(),
            samples.len()
        );
        Ok(estimator)
    }

    pub fn sample_count(&self) -> usize {
        self.centers.len()
    }

    pub fn scaler(&self) -> &FeatureScaler {
        &self.scaler
    }

    /// Interpolate at an arbitrary point of the six-parameter space
    pub fn interpolate(&self, raw: [f64; FEATURES]) -> Retention {
        let x = self.scaler.transform(raw);
        let phi = DVector::from_iterator(
            self.centers.len(),
            self.centers.iter().map(|c| distance(&x, c)),
        );
        let out = self.weights.tr_mul(&phi);
        Retention::new(out[0], out[1], out[2])
    }
}

impl RetentionEstimator for RbfRetention {
    fn name(&self) -> &'static str {
        "rbf"
    }

    fn estimate(
        &mut self,
        alpha: f64,
        velocity: f64,
        projectile_mass: f64,
        gamma: f64,
    ) -> Retention {
        let retention = self.interpolate([
            alpha,
            velocity,
            projectile_mass,
            gamma,
            QUERY_WATER_FRACTION,
            QUERY_WATER_FRACTION,
        ]);
        log::debug!(
            "rbf estimate alpha={alpha} v={velocity} mp={projectile_mass} gamma={gamma} -> {retention:?}"
        );
        retention
    }
}
