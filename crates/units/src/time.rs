use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Julian year in seconds (365.25 days)
pub const SECONDS_PER_YEAR: f64 = 31_557_600.0;

/// Million years in regular years
const MYR_TO_YEARS: f64 = 1_000_000.0;

/// A physical time quantity using f64 precision.
///
/// The base unit is the year, the time unit of the simulation clock.
///
/// # Examples
///
/// ```rust
/// use units::Time;
///
/// let run_length = Time::from_myr(200.0);
/// assert_eq!(run_length.to_years(), 2.0e8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(f64); // Base unit: Years

impl Time {
    /// Creates a zero time value
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_years(value: f64) -> Self {
        Self(value)
    }

    /// Creates a time from a value in million years (Myr)
    pub fn from_myr(value: f64) -> Self {
        Self(value * MYR_TO_YEARS)
    }

    pub fn from_seconds(value: f64) -> Self {
        Self(value / SECONDS_PER_YEAR)
    }

    pub fn to_years(&self) -> f64 {
        self.0
    }

    pub fn to_myr(&self) -> f64 {
        self.0 / MYR_TO_YEARS
    }

    pub fn to_seconds(&self) -> f64 {
        self.0 * SECONDS_PER_YEAR
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Time {
        Time(self.0 + rhs.0)
    }
}

impl Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Time {
        Time(self.0 - rhs.0)
    }
}
