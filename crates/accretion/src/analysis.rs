//! Post-run questions answered from a [`RunState`]
//!
//! Everything here is read-only over the registry and the collision forest.
//! Orbits are the engine's business, so callers that want the habitable-zone
//! split pass in the semi-major axes of the surviving bodies.

use std::collections::BTreeMap;

use units::{Length, Mass, Time};

use crate::body::BodyId;
use crate::collisions::CollisionForest;
use crate::error::Result;
use crate::registry::{BodyRecord, BodyType, TerminalKind};
use crate::state::RunState;

/// Semi-major axis range (AU) counted as potentially habitable
pub const HABITABLE_ZONE: (f64, f64) = (0.75, 1.5);

pub fn is_potentially_habitable(semi_major_axis: Length) -> bool {
    let (inner, outer) = HABITABLE_ZONE;
    (inner..=outer).contains(&semi_major_axis.to_au())
}

/// One step of a body's growth history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    pub time: Time,
    pub id: BodyId,
    pub mass: Mass,
    pub water_mass_fraction: f64,
}

impl TracePoint {
    fn new(time: Time, id: BodyId, record: &BodyRecord) -> Self {
        Self {
            time,
            id,
            mass: record.total_mass,
            water_mass_fraction: record.water_mass_fraction,
        }
    }
}

/// Mass and water fraction of `id` back through its dominant parents
///
/// The series starts with `id` at the last checkpoint time, then each merge
/// product at the time it formed, and ends with the seed at time zero. It is
/// meant to be plotted as a step function.
pub fn trace(state: &RunState, id: BodyId) -> Result<Vec<TracePoint>> {
    let mut points = vec![TracePoint::new(
        state.meta.current_time,
        id,
        state.registry.get(id)?,
    )];
    let mut seed = id;
    for (child, entry) in state.forest.ancestors(id) {
        points.push(TracePoint::new(
            entry.meta.time,
            child,
            state.registry.get(child)?,
        ));
        seed = entry.dominant_parent();
    }
    points.push(TracePoint::new(Time::zero(), seed, state.registry.get(seed)?));
    Ok(points)
}

/// Total and water mass of a group of bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassBudget {
    pub mass: Mass,
    pub water: Mass,
}

impl Default for MassBudget {
    fn default() -> Self {
        Self {
            mass: Mass::zero(),
            water: Mass::zero(),
        }
    }
}

impl MassBudget {
    fn add(&mut self, record: &BodyRecord) {
        self.mass = self.mass + record.total_mass;
        self.water = self.water + record.water_mass();
    }
}

/// Where the mass of a run ended up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaterBudget {
    /// Surviving bodies that are neither the Sun, a gas giant nor a
    /// planetesimal
    pub planets: usize,
    pub planet: MassBudget,
    /// Planets with a semi-major axis inside [`HABITABLE_ZONE`]
    pub habitable_planets: usize,
    pub habitable: MassBudget,
    pub escaped: MassBudget,
    /// Bodies that fell into the central body
    pub central: MassBudget,
    /// Mass that gas giants swept up in collisions
    pub gas_giants: MassBudget,
    /// Mass lost to space in collisions
    pub collisions: MassBudget,
    pub last_collision: Option<Time>,
}

impl WaterBudget {
    /// Tallies the run; `semi_major_axes` covers the surviving bodies whose
    /// orbits are known
    pub fn compute(state: &RunState, semi_major_axes: &BTreeMap<BodyId, Length>) -> Result<Self> {
        let mut budget = Self::default();

        for (id, record) in state.survivors() {
            if record.body_type != BodyType::Embryo {
                continue;
            }
            budget.planets += 1;
            budget.planet.add(record);
            if semi_major_axes
                .get(&id)
                .is_some_and(|a| is_potentially_habitable(*a))
            {
                budget.habitable_planets += 1;
                budget.habitable.add(record);
            }
        }

        for (id, record) in state.registry.iter() {
            match record.terminal() {
                Some((TerminalKind::Escaped, _)) => {
                    if matches!(record.body_type, BodyType::Sun | BodyType::GasGiant) {
                        log::warn!(
                            "{} {} escaped, leaving it out of the budget",
                            record.body_type,
                            id
                        );
                        continue;
                    }
                    budget.escaped.add(record);
                }
                Some((TerminalKind::CollidedWithCenter, _)) => budget.central.add(record),
                None => {}
            }
        }

        budget.gas_giants = gas_giant_accretion(state)?;

        for (_, entry) in state.forest.iter() {
            budget.collisions.mass = budget.collisions.mass + entry.meta.lost.total();
            budget.collisions.water = budget.collisions.water + entry.meta.lost.water;
        }
        budget.last_collision = state.forest.last_time();
        Ok(budget)
    }
}

fn gas_giant_accretion(state: &RunState) -> Result<MassBudget> {
    let mut accreted = MassBudget::default();
    for (child, entry) in state.forest.iter() {
        let [first, second] = entry.parents;
        let first_record = state.registry.get(first)?;
        let second_record = state.registry.get(second)?;
        let other = match (first_record.body_type, second_record.body_type) {
            (BodyType::GasGiant, BodyType::GasGiant) => {
                log::warn!("two gas giants merged into {}", child);
                continue;
            }
            (BodyType::GasGiant, _) => second_record,
            (_, BodyType::GasGiant) => first_record,
            _ => continue,
        };
        accreted.add(other);
    }
    Ok(accreted)
}

/// Impact geometry of one recorded collision, as measured before clamping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionSample {
    pub time: Time,
    /// Impact angle in degrees
    pub alpha: f64,
    /// Impact speed in units of the mutual escape velocity
    pub velocity_esc: f64,
}

/// Impact angles and speeds over a whole run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionStats {
    pub samples: Vec<CollisionSample>,
}

impl CollisionStats {
    pub fn from_forest(forest: &CollisionForest) -> Self {
        let samples = forest
            .iter()
            .map(|(_, entry)| CollisionSample {
                time: entry.meta.time,
                alpha: entry.meta.input.alpha,
                velocity_esc: entry.meta.input.velocity_esc,
            })
            .collect();
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn mean_alpha(&self) -> Option<f64> {
        self.mean(|s| s.alpha)
    }

    pub fn mean_velocity_esc(&self) -> Option<f64> {
        self.mean(|s| s.velocity_esc)
    }

    fn mean(&self, value: impl Fn(&CollisionSample) -> f64) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().map(value).sum::<f64>() / self.samples.len() as f64)
    }
}
