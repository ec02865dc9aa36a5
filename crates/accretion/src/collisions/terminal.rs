//! Escapes and central-body collisions
//!
//! Bodies that wander too far out are considered lost from the system; bodies
//! that come closer to the star than the integrator can resolve are treated as
//! having fallen into it. Engines check these after each step and report them
//! as [`TerminalEvent`]s.

use serde::{Deserialize, Serialize};
use units::{G_SI, Length, SOLAR_MASS_KG, Time};

use crate::body::{Body, BodyId};
use crate::registry::TerminalKind;

/// A body leaving the simulation by escape or central-body collision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalEvent {
    pub id: BodyId,
    pub kind: TerminalKind,
    pub time: Time,
}

/// Semi-major axis of a circular orbit around one solar mass with the given period
///
/// # Examples
///
/// ```
/// use accretion::collisions::kepler_semi_major_axis;
/// use units::Time;
///
/// let a = kepler_semi_major_axis(Time::from_years(1.0));
/// assert!((a.to_au() - 1.0).abs() < 1e-3);
/// ```
pub fn kepler_semi_major_axis(period: Time) -> Length {
    let p = period.to_seconds();
    let a3 = G_SI * SOLAR_MASS_KG / (4.0 * std::f64::consts::PI.powi(2)) * p * p;
    Length::from_meters(a3.cbrt())
}

/// Distance limits from the central body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalCriteria {
    /// Closer than this counts as a collision with the central body
    pub min_distance: Length,
    /// Farther than this counts as an escape
    pub max_distance: Length,
}

impl TerminalCriteria {
    pub fn new(min_distance: Length, max_distance: Length) -> Self {
        Self {
            min_distance,
            max_distance,
        }
    }

    /// Limits for an integrator with fixed step `dt`
    ///
    /// Orbits shorter than `min_timesteps_per_orbit` steps cannot be
    /// integrated accurately, so the innermost allowed distance is the
    /// semi-major axis of an orbit with that period.
    pub fn for_timestep(dt: Time, min_timesteps_per_orbit: f64, max_distance: Length) -> Self {
        let period = Time::from_years(dt.to_years() * min_timesteps_per_orbit);
        Self::new(kepler_semi_major_axis(period), max_distance)
    }

    /// Classifies a body by its heliocentric distance
    pub fn classify(&self, body: &Body) -> Option<TerminalKind> {
        let r = body.orbital_radius();
        if r > self.max_distance.to_au() {
            Some(TerminalKind::Escaped)
        } else if r < self.min_distance.to_au() {
            Some(TerminalKind::CollidedWithCenter)
        } else {
            None
        }
    }

    /// Events for every body except the central one that crossed a limit
    pub fn scan<'b>(
        &self,
        bodies: impl IntoIterator<Item = &'b Body>,
        central: BodyId,
        time: Time,
    ) -> Vec<TerminalEvent> {
        bodies
            .into_iter()
            .filter(|body| body.id != central)
            .filter_map(|body| {
                self.classify(body).map(|kind| TerminalEvent {
                    id: body.id,
                    kind,
                    time,
                })
            })
            .collect()
    }
}
