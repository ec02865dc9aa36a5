use std::fs;
use std::path::{Path, PathBuf};

use massloss::{EstimatorKind, EstimatorSources};
use serde::{Deserialize, Serialize};
use units::{Length, Time};

use crate::collisions::TerminalCriteria;
use crate::error::{AccretionError, Result};

fn default_t_max() -> Time {
    Time::from_myr(200.0)
}

fn default_num_savesteps() -> u32 {
    20_000
}

fn default_max_distance() -> Length {
    Length::from_au(30.0)
}

fn default_min_timesteps_per_orbit() -> f64 {
    20.0
}

/// Parameters of a simulation run, read from a JSON file
///
/// Only `initial_conditions` and `method` are required.
///
/// # Examples
///
/// ```
/// use accretion::config::RunConfig;
///
/// let config: RunConfig = serde_json::from_str(
///     r#"{"initial_conditions": "ic/run1.txt", "method": "leizhou", "t_max": 1e6}"#,
/// )
/// .unwrap();
/// assert_eq!(config.num_savesteps, 20_000);
/// assert_eq!(config.per_savestep().to_years(), 50.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub initial_conditions: PathBuf,
    /// Retention estimator selector (`rbf`, `leizhou`, `perfectmerging`, `simpleNN`)
    pub method: String,
    /// Simulation length in years
    #[serde(default = "default_t_max")]
    pub t_max: Time,
    #[serde(default = "default_num_savesteps")]
    pub num_savesteps: u32,
    /// Turn off collision detection; bodies pass through each other
    #[serde(default)]
    pub no_merging: bool,
    /// Beyond this heliocentric distance (AU) a body has escaped
    #[serde(default = "default_max_distance")]
    pub max_distance: Length,
    #[serde(default = "default_min_timesteps_per_orbit")]
    pub min_timesteps_per_orbit: f64,
    #[serde(default)]
    pub dataset: Option<PathBuf>,
    #[serde(default)]
    pub dataset_limit: Option<usize>,
    #[serde(default)]
    pub model: Option<PathBuf>,
    #[serde(default)]
    pub seed: u64,
}

impl RunConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| AccretionError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| AccretionError::json(path, e))
    }

    /// Checks the configuration and resolves the estimator selector
    ///
    /// An unknown selector fails here, before any run state exists.
    pub fn validate(&self) -> Result<EstimatorKind> {
        let kind: EstimatorKind = self.method.parse()?;
        if !(self.t_max.to_years() > 0.0) {
            return Err(AccretionError::InvalidConfig(format!(
                "t_max must be positive, got {} yr",
                self.t_max.to_years()
            )));
        }
        if self.num_savesteps == 0 {
            return Err(AccretionError::InvalidConfig(
                "num_savesteps must be at least 1".to_string(),
            ));
        }
        if !(self.min_timesteps_per_orbit > 0.0) {
            return Err(AccretionError::InvalidConfig(format!(
                "min_timesteps_per_orbit must be positive, got {}",
                self.min_timesteps_per_orbit
            )));
        }
        if !(self.max_distance.to_au() > 0.0) {
            return Err(AccretionError::InvalidConfig(format!(
                "max_distance must be positive, got {} AU",
                self.max_distance.to_au()
            )));
        }
        Ok(kind)
    }

    pub fn per_savestep(&self) -> Time {
        Time::from_years(self.t_max.to_years() / f64::from(self.num_savesteps.max(1)))
    }

    pub fn estimator_sources(&self) -> EstimatorSources {
        EstimatorSources {
            dataset: self.dataset.clone(),
            dataset_limit: self.dataset_limit,
            model: self.model.clone(),
            seed: self.seed,
        }
    }

    /// Escape and central-collision limits for an integrator with step `dt`
    pub fn terminal_criteria(&self, dt: Time) -> TerminalCriteria {
        TerminalCriteria::for_timestep(dt, self.min_timesteps_per_orbit, self.max_distance)
    }
}
