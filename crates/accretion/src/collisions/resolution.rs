//! Collision resolution through partial accretion
//!
//! When bodies collide they merge into a single body, but unlike a perfect
//! merger some water, mantle and core mass is lost to space. How much is
//! decided by a [`RetentionEstimator`] from the impact geometry. The merged
//! body conserves:
//! - Momentum and center of mass of the pre-collision bodies
//! - The composition of whatever mass is retained
//!
//! Its radius follows from its new mass and composition.

use massloss::{Retention, RetentionEstimator};
use nalgebra::Point3;
use units::{Length, Mass, Time};

use crate::body::{Body, BodyId, Contact};
use crate::collisions::forest::{CollisionRecord, LostMass};
use crate::collisions::impact::measure_impact;
use crate::driver::CollisionHandler;
use crate::error::{AccretionError, Result};
use crate::radius::LayeredRadius;
use crate::registry::BodyRecord;
use crate::state::{AbortFlag, RunState};

/// What the engine should do with the two colliding slots
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionAction {
    /// Overwrite the first slot with the merged body, remove the second
    KeepA(Body),
    /// Overwrite the second slot with the merged body, remove the first
    KeepB(Body),
    /// Remove both slots; nothing survived the impact
    RemoveBoth,
    /// Resolution failed and the abort flag is set; stop integrating
    Halt,
}

/// Which body names the merge product
///
/// The heavier body is the target so the product keeps its type (an embryo
/// hitting a gas giant is still a gas giant). Equal masses favor the lower
/// engine slot.
pub fn choose_target<'c>(a: &'c Contact, b: &'c Contact) -> (&'c Contact, &'c Contact) {
    let a_is_target = if a.body.mass == b.body.mass {
        a.slot < b.slot
    } else {
        a.body.mass > b.body.mass
    };
    if a_is_target { (a, b) } else { (b, a) }
}

/// Which slot receives the merge product
///
/// Always the lower slot, regardless of which body is the target, so the
/// engine's count of active bodies (which precede test particles) stays valid.
pub fn keep_lower_slot(a: &Contact, b: &Contact, merged: Body) -> CollisionAction {
    if a.slot < b.slot {
        CollisionAction::KeepA(merged)
    } else {
        CollisionAction::KeepB(merged)
    }
}

/// Retained mass and kinematics of a merge product
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub body: Body,
    pub total_mass: Mass,
    pub water_mass_fraction: f64,
    pub core_mass_fraction: f64,
    pub lost: LostMass,
}

/// Merge a target and a projectile under the given retention
///
/// Both parents' mass is split into water, core and mantle by their recorded
/// fractions, each category is scaled by its retention and the results are
/// summed. Position and velocity are the mass-weighted averages over the
/// pre-collision masses, so the center of mass and the velocity of the pair
/// carry over to the merged body unchanged.
///
/// # Examples
///
/// ```
/// use accretion::body::{Body, BodyId};
/// use accretion::collisions::merge_bodies;
/// use accretion::registry::{BodyRecord, BodyType};
/// use massloss::Retention;
/// use units::Mass;
///
/// let target = Body::new_earth_masses(BodyId(1), 1.0, 1.0, [1.0, 0.0, 0.0], [0.0, 6.0, 0.0]);
/// let projectile = Body::new_earth_masses(BodyId(2), 0.5, 0.8, [1.0001, 0.0, 0.0], [0.0, 4.0, 0.0]);
/// let wet = BodyRecord::new(0.1, 0.3, BodyType::Embryo, target.mass_quantity()).unwrap();
/// let dry = BodyRecord::new(0.0, 0.3, BodyType::Embryo, projectile.mass_quantity()).unwrap();
///
/// let merged = merge_bodies(&target, &wet, &projectile, &dry, &Retention::FULL, BodyId(3));
///
/// assert!((merged.total_mass.to_earth_masses() - 1.5).abs() < 1e-12);
/// assert!((merged.water_mass_fraction - 0.1 / 1.5).abs() < 1e-12);
/// // Momentum is conserved without mass loss
/// let p = target.momentum() + projectile.momentum();
/// assert!((merged.body.momentum() - p).norm() / p.norm() < 1e-12);
/// ```
pub fn merge_bodies(
    target: &Body,
    target_record: &BodyRecord,
    projectile: &Body,
    projectile_record: &BodyRecord,
    retention: &Retention,
    new_id: BodyId,
) -> MergeOutcome {
    let parent_mass = target.mass + projectile.mass;

    let water = target.mass * target_record.water_mass_fraction
        + projectile.mass * projectile_record.water_mass_fraction;
    let core = target.mass * target_record.core_mass_fraction
        + projectile.mass * projectile_record.core_mass_fraction;
    let mantle = (parent_mass - water - core).max(0.0);

    let kept_water = water * retention.water;
    let kept_mantle = mantle * retention.mantle;
    let kept_core = core * retention.core;
    let total = kept_water + kept_mantle + kept_core;

    let (water_mass_fraction, core_mass_fraction) = if total > 0.0 {
        (kept_water / total, kept_core / total)
    } else {
        (0.0, 0.0)
    };

    // Center of mass and momentum-conserving velocity of the pair
    let position = Point3::from(
        (target.position.coords * target.mass + projectile.position.coords * projectile.mass)
            / parent_mass,
    );
    let velocity = (target.momentum() + projectile.momentum()) / parent_mass;

    let total_mass = Mass::from_kg(total);
    let radius = LayeredRadius::new(total_mass, water_mass_fraction, core_mass_fraction)
        .total_radius()
        .to_au();

    MergeOutcome {
        body: Body {
            id: new_id,
            mass: total,
            radius,
            position,
            velocity,
        },
        total_mass,
        water_mass_fraction,
        core_mass_fraction,
        lost: LostMass {
            water: Mass::from_kg(water - kept_water),
            mantle: Mass::from_kg(mantle - kept_mantle),
            core: Mass::from_kg(core - kept_core),
        },
    }
}

/// Resolves collisions reported by the engine
///
/// Borrows the run state for the duration of one integration chunk. All
/// lookups and numerics happen before anything is written, so a failed
/// resolution leaves the registry, forest and identity counter untouched.
pub struct CollisionResolver<'a> {
    state: &'a mut RunState,
    estimator: &'a mut dyn RetentionEstimator,
    abort: AbortFlag,
}

impl<'a> CollisionResolver<'a> {
    pub fn new(
        state: &'a mut RunState,
        estimator: &'a mut dyn RetentionEstimator,
        abort: AbortFlag,
    ) -> Self {
        Self {
            state,
            estimator,
            abort,
        }
    }

    /// Merges the bodies in slots `a` and `b` at simulation time `time`
    pub fn resolve(&mut self, time: Time, a: &Contact, b: &Contact) -> Result<CollisionAction> {
        if a.slot == b.slot {
            return Err(AccretionError::Engine(format!(
                "collision reported between slot {} and itself",
                a.slot
            )));
        }
        let (target, projectile) = choose_target(a, b);
        let target_record = self.state.registry.get(target.body.id)?;
        let projectile_record = self.state.registry.get(projectile.body.id)?;
        self.state.forest.check_time(time)?;

        log::debug!(
            "colliding {} ({}) with {} ({})",
            target.body.id,
            target_record.body_type,
            projectile.body.id,
            projectile_record.body_type
        );

        let input = measure_impact(
            &target.body,
            &projectile.body,
            target_record.water_mass_fraction,
            projectile_record.water_mass_fraction,
        )?;
        let adjusted_input = input.clamped();
        log::debug!("impact {:?}, adjusted {:?}", input, adjusted_input);

        let raw_retention = self.estimator.estimate(
            adjusted_input.alpha,
            adjusted_input.velocity_esc,
            adjusted_input.projectile_mass,
            adjusted_input.gamma,
        );
        let retention = raw_retention.clamped();
        log::debug!(
            "{} retention {:?} (raw {:?})",
            self.estimator.name(),
            retention,
            raw_retention
        );

        let child = self.state.meta.peek_next_id()?;
        let outcome = merge_bodies(
            &target.body,
            target_record,
            &projectile.body,
            projectile_record,
            &retention,
            child,
        );
        let record = BodyRecord {
            water_mass_fraction: outcome.water_mass_fraction,
            core_mass_fraction: outcome.core_mass_fraction,
            body_type: target_record.body_type,
            total_mass: outcome.total_mass,
            escaped_at: None,
            collided_with_center_at: None,
        };
        let meta = CollisionRecord {
            time,
            input,
            adjusted_input,
            raw_retention,
            retention,
            parent_masses: [target.body.mass_quantity(), projectile.body.mass_quantity()],
            total_mass: outcome.total_mass,
            final_wmf: outcome.water_mass_fraction,
            final_cmf: outcome.core_mass_fraction,
            final_radius: Length::from_au(outcome.body.radius),
            lost: outcome.lost,
            collision_positions: [target.body.position, projectile.body.position],
            collision_velocities: [target.body.velocity, projectile.body.velocity],
            collision_radii: [target.body.radius_length(), projectile.body.radius_length()],
        };

        let minted = self
            .state
            .record_merger([target.body.id, projectile.body.id], record, meta)?;
        debug_assert_eq!(minted, child);

        log::info!(
            "t={:.0} yr: {} + {} -> {} ({:.4} M_earth, water {:.3e}, lost {:.3e} M_earth)",
            time.to_years(),
            target.body.id,
            projectile.body.id,
            child,
            outcome.total_mass.to_earth_masses(),
            outcome.water_mass_fraction,
            outcome.lost.total().to_earth_masses()
        );

        if outcome.total_mass.is_zero() {
            return Ok(CollisionAction::RemoveBoth);
        }
        Ok(keep_lower_slot(a, b, outcome.body))
    }
}

impl CollisionHandler for CollisionResolver<'_> {
    fn on_collision(&mut self, time: Time, a: &Contact, b: &Contact) -> CollisionAction {
        match self.resolve(time, a, b) {
            Ok(action) => action,
            Err(err) => {
                log::error!(
                    "failed to resolve collision of {} and {} at {:.0} yr: {}",
                    a.body.id,
                    b.body.id,
                    time.to_years(),
                    err
                );
                self.abort.raise();
                CollisionAction::Halt
            }
        }
    }
}
