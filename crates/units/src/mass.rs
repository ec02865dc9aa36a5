use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Mass of the Sun in kilograms
pub const SOLAR_MASS_KG: f64 = 1.98847e30;

/// Mass of the Earth in kilograms
pub const EARTH_MASS_KG: f64 = 5.9722e24;

/// Mass of Ceres in kilograms, the smallest projectile the impact
/// datasets were computed for is twice this value
pub const CERES_MASS_KG: f64 = 9.393e20;

/// Mass of Earth's surface water (one "Earth ocean") in kilograms
pub const EARTH_WATER_MASS_KG: f64 = 1.4e21;

/// A physical mass quantity using f64 precision.
///
/// The base unit is the kilogram, matching the mass unit of the
/// simulation runs (`yr`, `AU`, `kg`).
///
/// # Examples
///
/// ```rust
/// use units::Mass;
///
/// let earth = Mass::from_earth_masses(1.0);
/// let ceres = Mass::from_kg(9.393e20);
///
/// assert!(ceres < earth);
/// assert!((earth.to_kg() - 5.9722e24).abs() < 1e10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Mass(f64); // Base unit: kg

impl Mass {
    /// Creates a zero mass value
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Mass` from a value in kilograms.
    pub fn from_kg(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Mass` from a value in Earth masses.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use units::Mass;
    ///
    /// let super_earth = Mass::from_earth_masses(5.0);
    /// assert!((super_earth.to_earth_masses() - 5.0).abs() < 1e-12);
    /// ```
    pub fn from_earth_masses(value: f64) -> Self {
        Self(value * EARTH_MASS_KG)
    }

    pub fn from_solar_masses(value: f64) -> Self {
        Self(value * SOLAR_MASS_KG)
    }

    pub fn to_kg(&self) -> f64 {
        self.0
    }

    pub fn to_earth_masses(&self) -> f64 {
        self.0 / EARTH_MASS_KG
    }

    pub fn to_solar_masses(&self) -> f64 {
        self.0 / SOLAR_MASS_KG
    }

    /// Expresses the mass in Earth oceans.
    ///
    /// Used for water budgets, where water mass is reported relative to
    /// the present-day surface water of the Earth.
    pub fn to_earth_water_masses(&self) -> f64 {
        self.0 / EARTH_WATER_MASS_KG
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }
}

impl Add for Mass {
    type Output = Mass;

    fn add(self, rhs: Mass) -> Mass {
        Mass(self.0 + rhs.0)
    }
}

impl Sub for Mass {
    type Output = Mass;

    fn sub(self, rhs: Mass) -> Mass {
        Mass(self.0 - rhs.0)
    }
}

impl Mul<f64> for Mass {
    type Output = Mass;

    fn mul(self, rhs: f64) -> Mass {
        Mass(self.0 * rhs)
    }
}

impl Div<f64> for Mass {
    type Output = Mass;

    fn div(self, rhs: f64) -> Mass {
        Mass(self.0 / rhs)
    }
}

/// Division of Mass by Mass returns a dimensionless ratio
impl Div for Mass {
    type Output = f64;

    fn div(self, rhs: Mass) -> f64 {
        self.0 / rhs.0
    }
}

/// Allow f64 * Mass (commutative multiplication)
impl Mul<Mass> for f64 {
    type Output = Mass;

    fn mul(self, rhs: Mass) -> Mass {
        rhs * self
    }
}

impl std::iter::Sum for Mass {
    fn sum<I: Iterator<Item = Mass>>(iter: I) -> Mass {
        iter.fold(Mass::zero(), |acc, m| acc + m)
    }
}
