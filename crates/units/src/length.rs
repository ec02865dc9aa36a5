use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Astronomical unit in meters (IAU 2012 definition)
pub const AU_TO_M: f64 = 1.495978707e11;
pub const AU_TO_KM: f64 = AU_TO_M / 1000.0;

/// Nominal solar radius in meters
pub const SOLAR_RADIUS_M: f64 = 6.957e8;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6.371e6;

/// A physical length quantity using f64 precision.
///
/// The base unit is the astronomical unit, the length unit of the
/// simulation runs. Planetary radii are computed in meters and converted
/// here before being handed to the integrator.
///
/// # Examples
///
/// ```rust
/// use units::Length;
///
/// let orbit = Length::from_au(1.0);
/// let radius = Length::from_meters(6.371e6);
///
/// assert!(radius < orbit);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Length(f64); // Base unit: AU

impl Length {
    /// Creates a zero length value
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_au(value: f64) -> Self {
        Self(value)
    }

    pub fn from_meters(value: f64) -> Self {
        Self(value / AU_TO_M)
    }

    pub fn from_km(value: f64) -> Self {
        Self(value / AU_TO_KM)
    }

    pub fn from_earth_radii(value: f64) -> Self {
        Self::from_meters(value * EARTH_RADIUS_M)
    }

    pub fn from_solar_radii(value: f64) -> Self {
        Self::from_meters(value * SOLAR_RADIUS_M)
    }

    pub fn to_au(&self) -> f64 {
        self.0
    }

    pub fn to_meters(&self) -> f64 {
        self.0 * AU_TO_M
    }

    pub fn to_km(&self) -> f64 {
        self.0 * AU_TO_KM
    }

    pub fn to_earth_radii(&self) -> f64 {
        self.to_meters() / EARTH_RADIUS_M
    }

    /// Raise to integer power
    pub fn powi(&self, n: i32) -> f64 {
        self.0.powi(n)
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Length;

    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

impl Mul<f64> for Length {
    type Output = Length;

    fn mul(self, rhs: f64) -> Length {
        Length(self.0 * rhs)
    }
}

impl Div<f64> for Length {
    type Output = Length;

    fn div(self, rhs: f64) -> Length {
        Length(self.0 / rhs)
    }
}

/// Division of Length by Length returns a dimensionless ratio
impl Div for Length {
    type Output = f64;

    fn div(self, rhs: Self) -> f64 {
        self.0 / rhs.0
    }
}
