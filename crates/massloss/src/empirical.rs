//! Empirical retention from fixed loss ranges
//!
//! Water and mantle losses are drawn uniformly from the ranges reported for
//! terrestrial planet formation between two giant planets (Zhou, Dvorak &
//! Zhou 2021). That work only models a rocky body with a water shell, so the
//! core loses the same fraction as the mantle.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::estimator::{Retention, RetentionEstimator};

pub const WATER_LOSS_RANGE: (f64, f64) = (0.01, 0.08);
pub const MANTLE_LOSS_RANGE: (f64, f64) = (0.01, 0.10);

#[derive(Debug, Clone)]
pub struct EmpiricalRetention {
    /// None means deterministic: always the midpoint of each range
    rng: Option<ChaChaRng>,
}

impl EmpiricalRetention {
    /// Random losses from a seeded generator
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Some(ChaChaRng::seed_from_u64(seed)),
        }
    }

    /// Midpoint losses, no randomness
    pub fn deterministic() -> Self {
        Self { rng: None }
    }

    fn sample(&mut self, (low, high): (f64, f64)) -> f64 {
        let t = match self.rng.as_mut() {
            Some(rng) => rng.random::<f64>(),
            None => 0.5,
        };
        low + t * (high - low)
    }
}

impl RetentionEstimator for EmpiricalRetention {
    fn name(&self) -> &'static str {
        "leizhou"
    }

    fn estimate(
        &mut self,
        _alpha: f64,
        _velocity: f64,
        _projectile_mass: f64,
        _gamma: f64,
    ) -> Retention {
        let water_loss = self.sample(WATER_LOSS_RANGE);
        let mantle_loss = self.sample(MANTLE_LOSS_RANGE);
        let core_loss = mantle_loss;
        Retention::new(1.0 - water_loss, 1.0 - mantle_loss, 1.0 - core_loss)
    }
}
