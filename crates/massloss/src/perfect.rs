use crate::estimator::{Retention, RetentionEstimator};

/// Control scenario: every collision is a perfect merger
#[derive(Debug, Clone, Copy, Default)]
pub struct PerfectMerging;

impl RetentionEstimator for PerfectMerging {
    fn name(&self) -> &'static str {
        "perfectmerging"
    }

    fn estimate(
        &mut self,
        _alpha: f64,
        _velocity: f64,
        _projectile_mass: f64,
        _gamma: f64,
    ) -> Retention {
        Retention::FULL
    }
}
