//! The estimator interface and run-start selection

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::empirical::EmpiricalRetention;
use crate::error::EstimatorError;
use crate::neural::NeuralRetention;
use crate::perfect::PerfectMerging;
use crate::rbf::RbfRetention;

/// Retained fractions of each mass category after a collision
///
/// Values come straight from an estimator and are not guaranteed to lie in
/// `[0, 1]`; interpolating estimators can overshoot. Use [`Retention::clamped`]
/// before applying them to masses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Retention {
    pub water: f64,
    pub mantle: f64,
    pub core: f64,
}

impl Retention {
    /// Nothing is lost
    pub const FULL: Retention = Retention {
        water: 1.0,
        mantle: 1.0,
        core: 1.0,
    };

    pub fn new(water: f64, mantle: f64, core: f64) -> Self {
        Self {
            water,
            mantle,
            core,
        }
    }

    /// Clamp every fraction to `[0, 1]`
    ///
    /// A NaN fraction becomes 0: an estimator that cannot say how much
    /// survived is treated as having lost the whole category.
    ///
    /// # Examples
    /// ```
    /// use massloss::Retention;
    ///
    /// let raw = Retention::new(1.2, -0.1, f64::NAN);
    /// let clamped = raw.clamped();
    /// assert_eq!(clamped, Retention::new(1.0, 0.0, 0.0));
    /// ```
    pub fn clamped(&self) -> Self {
        fn unit(x: f64) -> f64 {
            if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
        }
        Self {
            water: unit(self.water),
            mantle: unit(self.mantle),
            core: unit(self.core),
        }
    }
}

/// A strategy for estimating mass retention in a collision
///
/// Inputs are expected inside the domain the estimator was built for:
/// impact angle in degrees within `[0, 60]`, velocity in units of the mutual
/// escape velocity within `[1, 5]`, projectile mass in kg and the
/// projectile/target mass ratio within `[0.1, 1]`. Callers clamp before
/// calling.
pub trait RetentionEstimator {
    /// Short selector name used in run configuration
    fn name(&self) -> &'static str;

    /// Estimate retained water, mantle and core fractions
    fn estimate(
        &mut self,
        alpha: f64,
        velocity: f64,
        projectile_mass: f64,
        gamma: f64,
    ) -> Retention;
}

/// Available estimator implementations, selected by name at run start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstimatorKind {
    #[serde(rename = "rbf")]
    Rbf,
    #[serde(rename = "leizhou")]
    LeiZhou,
    #[serde(rename = "perfectmerging")]
    PerfectMerging,
    #[serde(rename = "simpleNN")]
    SimpleNn,
}

impl EstimatorKind {
    pub const ALL: [EstimatorKind; 4] = [
        EstimatorKind::Rbf,
        EstimatorKind::LeiZhou,
        EstimatorKind::PerfectMerging,
        EstimatorKind::SimpleNn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EstimatorKind::Rbf => "rbf",
            EstimatorKind::LeiZhou => "leizhou",
            EstimatorKind::PerfectMerging => "perfectmerging",
            EstimatorKind::SimpleNn => "simpleNN",
        }
    }

    pub fn valid_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.as_str()).collect()
    }
}

impl fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EstimatorKind {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| EstimatorError::UnknownMethod {
                name: s.to_string(),
                valid: Self::valid_names(),
            })
    }
}

/// External inputs some estimators need at construction
#[derive(Debug, Clone, Default)]
pub struct EstimatorSources {
    /// JSON-lines dataset of impact simulations (`rbf`)
    pub dataset: Option<PathBuf>,
    /// Keep only the first N dataset rows, to bound memory in short test runs
    pub dataset_limit: Option<usize>,
    /// JSON weight file (`simpleNN`)
    pub model: Option<PathBuf>,
    /// RNG seed (`leizhou`)
    pub seed: u64,
}

/// Construct the estimator for `kind`
///
/// This is the only place an estimator is created. Construction can be
/// expensive (the RBF variant solves a dense linear system over the whole
/// dataset), so the result is meant to live for the whole run.
pub fn build_estimator(
    kind: EstimatorKind,
    sources: &EstimatorSources,
) -> Result<Box<dyn RetentionEstimator>, EstimatorError> {
    log::info!("building {} retention estimator", kind);
    let estimator: Box<dyn RetentionEstimator> = match kind {
        EstimatorKind::PerfectMerging => Box::new(PerfectMerging),
        EstimatorKind::LeiZhou => Box::new(EmpiricalRetention::new(sources.seed)),
        EstimatorKind::Rbf => {
            let path = sources.dataset.as_ref().ok_or(EstimatorError::MissingSource {
                method: "rbf",
                what: "dataset",
            })?;
            Box::new(RbfRetention::from_jsonl(path, sources.dataset_limit)?)
        }
        EstimatorKind::SimpleNn => {
            let path = sources.model.as_ref().ok_or(EstimatorError::MissingSource {
                method: "simpleNN",
                what: "model",
            })?;
            Box::new(NeuralRetention::from_json(path)?)
        }
    };
    Ok(estimator)
}
