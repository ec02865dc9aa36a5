use crate::length::{AU_TO_M, Length};
use crate::mass::Mass;
use crate::time::SECONDS_PER_YEAR;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Gravitational constant in SI units (m³ kg⁻¹ s⁻²)
pub const G_SI: f64 = 6.6743e-11;

// Convert between AU/year and m/s
pub const AU_YEAR_TO_M_SEC: f64 = AU_TO_M / SECONDS_PER_YEAR;

/// Mutual escape velocity of two touching bodies
///
/// `v_esc = sqrt(2 G (m_1 + m_2) / (r_1 + r_2))`, evaluated in SI units.
///
/// # Arguments
/// * `total_mass` - Combined mass of both bodies
/// * `contact_distance` - Sum of both radii
///
/// # Examples
/// ```
/// use units::{Length, Mass, mutual_escape_velocity};
///
/// // Escape velocity from the surface of the Earth, about 11.2 km/s
/// let v = mutual_escape_velocity(Mass::from_earth_masses(1.0), Length::from_km(6371.0));
/// assert!((v.to_meters_per_sec() - 11_186.0).abs() < 10.0);
/// ```
pub fn mutual_escape_velocity(total_mass: Mass, contact_distance: Length) -> Velocity {
    let v = (2.0 * G_SI * total_mass.to_kg() / contact_distance.to_meters()).sqrt();
    Velocity::from_meters_per_sec(v)
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Velocity(f64); // Base unit: AU/year

impl Velocity {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_au_per_year(value: f64) -> Self {
        Self(value)
    }

    pub fn from_meters_per_sec(value: f64) -> Self {
        Self(value / AU_YEAR_TO_M_SEC)
    }

    pub fn from_km_per_sec(value: f64) -> Self {
        Self::from_meters_per_sec(value * 1000.0)
    }

    pub fn to_au_per_year(&self) -> f64 {
        self.0
    }

    pub fn to_meters_per_sec(&self) -> f64 {
        self.0 * AU_YEAR_TO_M_SEC
    }

    pub fn to_km_per_sec(&self) -> f64 {
        self.to_meters_per_sec() / 1000.0
    }
}

impl Add for Velocity {
    type Output = Velocity;

    fn add(self, rhs: Velocity) -> Velocity {
        Velocity(self.0 + rhs.0)
    }
}

impl Sub for Velocity {
    type Output = Velocity;

    fn sub(self, rhs: Velocity) -> Velocity {
        Velocity(self.0 - rhs.0)
    }
}

impl Mul<f64> for Velocity {
    type Output = Velocity;

    fn mul(self, rhs: f64) -> Velocity {
        Velocity(self.0 * rhs)
    }
}

/// Ratio of two velocities (e.g. impact speed over escape speed)
impl std::ops::Div for Velocity {
    type Output = f64;

    fn div(self, rhs: Velocity) -> f64 {
        self.0 / rhs.0
    }
}
