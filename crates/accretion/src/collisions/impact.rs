//! Impact geometry and the estimator input domain
//!
//! The retention datasets were computed for a bounded range of impacts. Real
//! collisions in a run fall outside it all the time (grazing impacts, slow
//! mergers of equal bodies, tiny planetesimals), so every input is pulled back
//! into the domain before an estimator sees it. The unclamped values are kept
//! next to the clamped ones in the collision record.

use serde::{Deserialize, Serialize};
use units::{CERES_MASS_KG, EARTH_MASS_KG, Length, Mass, Velocity, mutual_escape_velocity};

use crate::body::Body;
use crate::error::{AccretionError, Result};

/// Impact angle domain in degrees
pub const ALPHA_RANGE: (f64, f64) = (0.0, 60.0);

/// Impact velocity domain in units of the mutual escape velocity
pub const VELOCITY_RANGE: (f64, f64) = (1.0, 5.0);

/// Projectile/target mass ratio domain
pub const GAMMA_RANGE: (f64, f64) = (0.1, 1.0);

/// Projectile mass domain in kg
pub const PROJECTILE_MASS_RANGE: (f64, f64) = (2.0 * CERES_MASS_KG, 2.0 * EARTH_MASS_KG);

/// Parameters describing one impact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactInput {
    /// Impact angle in degrees, 0 is head-on
    pub alpha: f64,
    /// Relative speed in AU/yr
    pub velocity_original: f64,
    /// Mutual escape velocity in m/s
    pub escape_velocity: f64,
    /// Relative speed in units of the mutual escape velocity
    pub velocity_esc: f64,
    /// Projectile mass over target mass
    pub gamma: f64,
    /// Projectile mass in kg
    pub projectile_mass: f64,
    pub target_water_fraction: f64,
    pub projectile_water_fraction: f64,
}

impl ImpactInput {
    /// Returns a copy with every estimator input pulled into its domain
    ///
    /// Angles above 90° are folded back (`180° - alpha`) before clamping, and a
    /// mass ratio above one is inverted. The water fractions and the SI
    /// velocities are informational and pass through untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use accretion::collisions::ImpactInput;
    ///
    /// let input = ImpactInput {
    ///     alpha: 170.0,
    ///     velocity_original: 1.0,
    ///     escape_velocity: 1.0e3,
    ///     velocity_esc: 7.5,
    ///     gamma: 4.0,
    ///     projectile_mass: 1.0e23,
    ///     target_water_fraction: 0.1,
    ///     projectile_water_fraction: 0.0,
    /// };
    /// let clamped = input.clamped();
    /// assert!((clamped.alpha - 10.0).abs() < 1e-12);
    /// assert_eq!(clamped.velocity_esc, 5.0);
    /// assert_eq!(clamped.gamma, 0.25);
    /// ```
    pub fn clamped(&self) -> Self {
        let alpha = fold_angle(self.alpha.abs());
        let gamma = if self.gamma.abs() > 1.0 {
            1.0 / self.gamma.abs()
        } else {
            self.gamma.abs()
        };
        Self {
            alpha: clamp(alpha, ALPHA_RANGE),
            velocity_esc: clamp(self.velocity_esc, VELOCITY_RANGE),
            gamma: clamp(gamma, GAMMA_RANGE),
            projectile_mass: clamp(self.projectile_mass, PROJECTILE_MASS_RANGE),
            ..*self
        }
    }

    /// True when all estimator inputs are finite numbers
    pub fn is_finite(&self) -> bool {
        [self.alpha, self.velocity_esc, self.gamma, self.projectile_mass]
            .iter()
            .all(|x| x.is_finite())
    }

    /// True when every estimator input already lies in its domain
    pub fn in_domain(&self) -> bool {
        within(self.alpha, ALPHA_RANGE)
            && within(self.velocity_esc, VELOCITY_RANGE)
            && within(self.gamma, GAMMA_RANGE)
            && within(self.projectile_mass, PROJECTILE_MASS_RANGE)
    }
}

fn clamp(x: f64, (lo, hi): (f64, f64)) -> f64 {
    x.clamp(lo, hi)
}

fn within(x: f64, (lo, hi): (f64, f64)) -> bool {
    (lo..=hi).contains(&x)
}

/// Folds an angle in degrees onto `[0, 90]`
fn fold_angle(alpha: f64) -> f64 {
    let alpha = alpha % 180.0;
    if alpha > 90.0 { 180.0 - alpha } else { alpha }
}

/// Measures the impact between a target and a projectile
///
/// The angle is taken between the separation and relative-velocity vectors,
/// so a head-on impact has `alpha = 0` and a grazing one approaches 90°.
/// Fails when the angle is undefined: zero relative velocity, coincident
/// centers or non-finite state.
pub fn measure_impact(
    target: &Body,
    projectile: &Body,
    target_water_fraction: f64,
    projectile_water_fraction: f64,
) -> Result<ImpactInput> {
    let vdiff = projectile.velocity - target.velocity;
    let rdiff = projectile.position - target.position;
    let vdiff_n = vdiff.magnitude();
    let rdiff_n = rdiff.magnitude();

    if !(vdiff_n.is_finite() && rdiff_n.is_finite()) {
        return Err(AccretionError::Geometry(format!(
            "non-finite state for bodies {} and {}",
            target.id, projectile.id
        )));
    }
    if vdiff_n == 0.0 {
        return Err(AccretionError::Geometry(format!(
            "bodies {} and {} have zero relative velocity",
            target.id, projectile.id
        )));
    }
    if rdiff_n == 0.0 {
        return Err(AccretionError::Geometry(format!(
            "bodies {} and {} have coincident centers",
            target.id, projectile.id
        )));
    }

    // Rounding can push the cosine a hair past ±1 for exactly aligned vectors
    let cos = (rdiff.dot(&vdiff) / (rdiff_n * vdiff_n)).clamp(-1.0, 1.0);
    let alpha = fold_angle(cos.acos().to_degrees());

    let total_mass = Mass::from_kg(target.mass + projectile.mass);
    let contact = Length::from_au(target.radius + projectile.radius);
    let escape_velocity = mutual_escape_velocity(total_mass, contact);
    let relative_speed = Velocity::from_au_per_year(vdiff_n);
    let velocity_esc = relative_speed / escape_velocity;

    let input = ImpactInput {
        alpha,
        velocity_original: vdiff_n,
        escape_velocity: escape_velocity.to_meters_per_sec(),
        velocity_esc,
        gamma: projectile.mass / target.mass,
        projectile_mass: projectile.mass,
        target_water_fraction,
        projectile_water_fraction,
    };
    if !input.is_finite() {
        return Err(AccretionError::Geometry(format!(
            "impact of {} on {} produced non-finite inputs: {:?}",
            projectile.id, target.id, input
        )));
    }
    Ok(input)
}
