use std::fmt;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use units::{Length, Mass};

/// Stable identity of a body for the whole run
///
/// Identities are handed out by a monotonic counter kept in the run metadata,
/// so a merge product always has a larger identity than both of its parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinematic state of a body as the simulation engine sees it
///
/// Composition lives in the [`crate::registry::BodyRegistry`]; the engine only
/// tracks what gravity needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub mass: f64,              // kg
    pub radius: f64,            // AU (physical radius for collisions)
    pub position: Point3<f64>,  // AU (heliocentric Cartesian)
    pub velocity: Vector3<f64>, // AU/year
}

impl Body {
    /// Creates a body with mass in Earth masses and radius in Earth radii
    ///
    /// Position and velocity are in AU and AU/year respectively.
    ///
    /// # Examples
    ///
    /// ```
    /// use accretion::body::{Body, BodyId};
    ///
    /// let body = Body::new_earth_masses(BodyId(4), 1.0, 1.0, [1.0, 0.0, 0.0], [0.0, 6.28, 0.0]);
    /// assert!((body.mass_quantity().to_earth_masses() - 1.0).abs() < 1e-12);
    /// ```
    pub fn new_earth_masses(
        id: BodyId,
        mass_earth: f64,
        radius_earth: f64,
        position: [f64; 3],
        velocity: [f64; 3],
    ) -> Self {
        Body {
            id,
            mass: Mass::from_earth_masses(mass_earth).to_kg(),
            radius: Length::from_earth_radii(radius_earth).to_au(),
            position: Point3::from(position),
            velocity: Vector3::from(velocity),
        }
    }

    pub fn mass_quantity(&self) -> Mass {
        Mass::from_kg(self.mass)
    }

    pub fn radius_length(&self) -> Length {
        Length::from_au(self.radius)
    }

    pub fn momentum(&self) -> Vector3<f64> {
        self.velocity * self.mass
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (self.position - other.position).magnitude()
    }

    pub fn orbital_radius(&self) -> f64 {
        self.position.coords.magnitude()
    }

    /// True when the two bodies overlap (separation below the sum of radii)
    pub fn touches(&self, other: &Body) -> bool {
        self.distance_to(other) < self.radius + other.radius
    }
}

/// A body together with the engine slot it occupies
///
/// Slot order matters to the engine (active bodies precede test particles),
/// so the resolver reports which slot to drop rather than which identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub slot: usize,
    pub body: Body,
}

impl Contact {
    pub fn new(slot: usize, body: Body) -> Self {
        Self { slot, body }
    }
}
