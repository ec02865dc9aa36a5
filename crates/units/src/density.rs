use crate::mass::Mass;
use std::f64::consts::PI;

/// Uncompressed density of water ice (kg/m³)
pub const ICE_DENSITY: Density = Density(917.0);

/// Uncompressed density of basalt, used for silicate mantles (kg/m³)
pub const BASALT_DENSITY: Density = Density(2700.0);

/// Uncompressed density of iron, used for metal cores (kg/m³)
pub const IRON_DENSITY: Density = Density(7800.0);

/// Volume density in kg/m³
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Density(pub f64);

impl Density {
    pub fn from_kg_per_m3(value: f64) -> Self {
        Self(value)
    }

    pub fn from_grams_per_cm3(value: f64) -> Self {
        Self(value * 1000.0)
    }

    pub fn to_kg_per_m3(&self) -> f64 {
        self.0
    }

    /// Volume in m³ occupied by `mass` at this density
    pub fn volume_of(&self, mass: Mass) -> f64 {
        mass.to_kg() / self.0
    }

    /// Radius in meters of a uniform sphere of `mass` at this density
    pub fn sphere_radius(&self, mass: Mass) -> f64 {
        (self.volume_of(mass) * 3.0 / (4.0 * PI)).cbrt()
    }
}
