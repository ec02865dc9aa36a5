use serde::{Deserialize, Serialize};
use units::{Mass, Time};

/// Conserved quantities reported by the engine at a checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Total energy in engine units
    pub energy: f64,
    /// Magnitude of the total momentum in engine units
    pub momentum: f64,
    pub total_mass: Mass,
    pub time: Time,
    /// Bodies in the simulation
    pub n: u32,
    /// Bodies that interact with everything
    pub n_active: u32,
}

/// Time series of [`Diagnostics`], one sample per checkpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    samples: Vec<Diagnostics>,
}

impl History {
    pub fn append(&mut self, sample: Diagnostics) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[Diagnostics] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Relative energy change between the first and the last sample
    pub fn relative_energy_error(&self) -> Option<f64> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        if first.energy == 0.0 {
            return None;
        }
        Some(((last.energy - first.energy) / first.energy).abs())
    }
}
