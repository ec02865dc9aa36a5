//! Two-layer feed-forward network trained on impact simulations
//!
//! Architecture: standardized six-parameter input → linear → ReLU → linear →
//! sigmoid, producing water, mantle and core retention. The sigmoid output
//! keeps every fraction inside `(0, 1)`.

use std::fs;
use std::path::Path;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;
use crate::estimator::{Retention, RetentionEstimator};

const INPUTS: usize = 6;
const OUTPUTS: usize = 3;

/// Water fraction of target and projectile on every query
const QUERY_WATER_FRACTION: f64 = 1e-4;

/// Network weights as exported from training
///
/// Field names follow the exported state dict (`hidden.weight` etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuralModel {
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
    #[serde(rename = "hidden.weight")]
    pub hidden_weight: Vec<Vec<f64>>,
    #[serde(rename = "hidden.bias")]
    pub hidden_bias: Vec<f64>,
    #[serde(rename = "output.weight")]
    pub output_weight: Vec<Vec<f64>>,
    #[serde(rename = "output.bias")]
    pub output_bias: Vec<f64>,
}

fn to_matrix(rows: &[Vec<f64>], cols: usize, name: &str) -> Result<DMatrix<f64>, EstimatorError> {
    if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
        return Err(EstimatorError::Shape(format!(
            "{name} row {bad} has {} columns, expected {cols}",
            rows[bad].len()
        )));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(DMatrix::from_row_slice(rows.len(), cols, &flat))
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[derive(Debug, Clone)]
pub struct NeuralRetention {
    means: DVector<f64>,
    stds: DVector<f64>,
    hidden_weight: DMatrix<f64>,
    hidden_bias: DVector<f64>,
    output_weight: DMatrix<f64>,
    output_bias: DVector<f64>,
}

impl NeuralRetention {
    /// Validate layer shapes and build the network
    pub fn new(model: NeuralModel) -> Result<Self, EstimatorError> {
        if model.means.len() != INPUTS || model.stds.len() != INPUTS {
            return Err(EstimatorError::Shape(format!(
                "expected {INPUTS} input means/stds, got {}/{}",
                model.means.len(),
                model.stds.len()
            )));
        }
        if model.stds.iter().any(|s| *s == 0.0) {
            return Err(EstimatorError::Shape("zero standard deviation".into()));
        }

        let hidden = model.hidden_bias.len();
        if model.hidden_weight.len() != hidden {
            return Err(EstimatorError::Shape(format!(
                "hidden.weight has {} rows but hidden.bias has {hidden}",
                model.hidden_weight.len()
            )));
        }
        if model.output_bias.len() != OUTPUTS || model.output_weight.len() != OUTPUTS {
            return Err(EstimatorError::Shape(format!(
                "expected {OUTPUTS} outputs, got {}",
                model.output_bias.len()
            )));
        }

        Ok(Self {
            hidden_weight: to_matrix(&model.hidden_weight, INPUTS, "hidden.weight")?,
            output_weight: to_matrix(&model.output_weight, hidden, "output.weight")?,
            means: DVector::from_vec(model.means),
            stds: DVector::from_vec(model.stds),
            hidden_bias: DVector::from_vec(model.hidden_bias),
            output_bias: DVector::from_vec(model.output_bias),
        })
    }

    pub fn from_json(path: &Path) -> Result<Self, EstimatorError> {
        log::info!("loading network weights from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| EstimatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: NeuralModel = serde_json::from_str(&text)
            .map_err(|source| EstimatorError::Parse { line: 1, source })?;
        Self::new(model)
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_bias.len()
    }

    /// Forward pass over the six raw parameters
    pub fn evaluate(&self, input: [f64; INPUTS]) -> [f64; OUTPUTS] {
        let x = (DVector::from_column_slice(&input) - &self.means).component_div(&self.stds);
        let hidden = (&self.hidden_weight * x + &self.hidden_bias).map(|v| v.max(0.0));
        let out = (&self.output_weight * hidden + &self.output_bias).map(sigmoid);
        [out[0], out[1], out[2]]
    }
}

impl RetentionEstimator for NeuralRetention {
    fn name(&self) -> &'static str {
        "simpleNN"
    }

    fn estimate(
        &mut self,
        alpha: f64,
        velocity: f64,
        projectile_mass: f64,
        gamma: f64,
    ) -> Retention {
        let [water, mantle, core] = self.evaluate([
            alpha,
            velocity,
            projectile_mass,
            gamma,
            QUERY_WATER_FRACTION,
            QUERY_WATER_FRACTION,
        ]);
        Retention::new(water, mantle, core)
    }
}
