//! Fixtures shared by the unit tests

use massloss::Retention;
use nalgebra::{Point3, Vector3};
use units::{Length, Mass, Time};

use crate::collisions::{CollisionRecord, ImpactInput, LostMass};

pub fn impact_input() -> ImpactInput {
    ImpactInput {
        alpha: 30.0,
        velocity_original: 1.2,
        escape_velocity: 8_000.0,
        velocity_esc: 1.5,
        gamma: 0.5,
        projectile_mass: 1.0e24,
        target_water_fraction: 0.01,
        projectile_water_fraction: 0.05,
    }
}

/// A lossless collision at `years` between parents of the given Earth masses
pub fn collision_record(years: f64, parent_earth_masses: [f64; 2]) -> CollisionRecord {
    let parent_masses = parent_earth_masses.map(Mass::from_earth_masses);
    let total_mass = parent_masses[0] + parent_masses[1];
    CollisionRecord {
        time: Time::from_years(years),
        input: impact_input(),
        adjusted_input: impact_input(),
        raw_retention: Retention::new(1.02, 0.97, 1.0),
        retention: Retention::new(1.0, 0.97, 1.0),
        parent_masses,
        total_mass,
        final_wmf: 0.02,
        final_cmf: 0.3,
        final_radius: Length::from_earth_radii(1.0),
        lost: LostMass {
            water: Mass::zero(),
            mantle: Mass::zero(),
            core: Mass::zero(),
        },
        collision_positions: [Point3::new(1.0, 0.0, 0.0), Point3::new(1.0001, 0.0, 0.0)],
        collision_velocities: [Vector3::new(0.0, 6.2, 0.0), Vector3::new(-0.5, 6.0, 0.1)],
        collision_radii: [Length::from_earth_radii(1.0), Length::from_earth_radii(0.6)],
    }
}
