//! Body Registry: composition and fate of every body that ever existed
//!
//! The engine only knows mass, radius and kinematics. Everything else about a
//! body (what it is made of, what kind of object it is, whether it left the
//! system) is kept here, keyed by [`BodyId`]. Entries are never removed; a body
//! that merges, escapes or falls into the central body keeps its record so
//! that the collision forest and later analysis can refer back to it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use units::{Mass, Time};

use crate::body::BodyId;
use crate::error::{AccretionError, Result};

/// Tolerance on `water + core <= 1` for fractions that went through arithmetic
const FRACTION_TOLERANCE: f64 = 1e-9;

/// Kind of object a body represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyType {
    #[serde(rename = "sun")]
    Sun,
    #[serde(rename = "gas giant")]
    GasGiant,
    #[serde(rename = "embryo")]
    Embryo,
    #[serde(rename = "planetesimal")]
    Planetesimal,
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BodyType::Sun => "sun",
            BodyType::GasGiant => "gas giant",
            BodyType::Embryo => "embryo",
            BodyType::Planetesimal => "planetesimal",
        };
        f.write_str(name)
    }
}

/// How a body left the active simulation, other than by merging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalKind {
    Escaped,
    CollidedWithCenter,
}

/// Composition and fate of a single body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyRecord {
    pub water_mass_fraction: f64,
    pub core_mass_fraction: f64,
    #[serde(rename = "type")]
    pub body_type: BodyType,
    pub total_mass: Mass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escaped_at: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collided_with_center_at: Option<Time>,
}

impl BodyRecord {
    /// Creates a record for a body that is still active
    ///
    /// Fails when either fraction is negative or they sum to more than one.
    ///
    /// # Examples
    ///
    /// ```
    /// use accretion::registry::{BodyRecord, BodyType};
    /// use units::Mass;
    ///
    /// let record = BodyRecord::new(0.1, 0.3, BodyType::Embryo, Mass::from_earth_masses(0.05)).unwrap();
    /// assert!((record.mantle_mass_fraction() - 0.6).abs() < 1e-12);
    ///
    /// assert!(BodyRecord::new(0.7, 0.4, BodyType::Embryo, Mass::from_kg(1.0)).is_err());
    /// ```
    pub fn new(
        water_mass_fraction: f64,
        core_mass_fraction: f64,
        body_type: BodyType,
        total_mass: Mass,
    ) -> Result<Self> {
        check_fractions(water_mass_fraction, core_mass_fraction)?;
        Ok(Self {
            water_mass_fraction,
            core_mass_fraction,
            body_type,
            total_mass,
            escaped_at: None,
            collided_with_center_at: None,
        })
    }

    pub fn mantle_mass_fraction(&self) -> f64 {
        (1.0 - self.water_mass_fraction - self.core_mass_fraction).max(0.0)
    }

    pub fn water_mass(&self) -> Mass {
        self.total_mass * self.water_mass_fraction
    }

    pub fn core_mass(&self) -> Mass {
        self.total_mass * self.core_mass_fraction
    }

    pub fn mantle_mass(&self) -> Mass {
        self.total_mass * self.mantle_mass_fraction()
    }

    /// Terminal status, if the body escaped or fell into the central body
    pub fn terminal(&self) -> Option<(TerminalKind, Time)> {
        match (self.escaped_at, self.collided_with_center_at) {
            (Some(t), _) => Some((TerminalKind::Escaped, t)),
            (None, Some(t)) => Some((TerminalKind::CollidedWithCenter, t)),
            (None, None) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal().is_some()
    }

    /// Checks a record that did not come through [`BodyRecord::new`], such as
    /// one read from a checkpoint
    pub fn validate(&self, id: BodyId) -> Result<()> {
        check_fractions(self.water_mass_fraction, self.core_mass_fraction)?;
        if let (Some(at), Some(_)) = (self.escaped_at, self.collided_with_center_at) {
            return Err(AccretionError::AlreadyTerminal {
                id,
                existing: TerminalKind::Escaped,
                at,
                requested: TerminalKind::CollidedWithCenter,
            });
        }
        Ok(())
    }
}

/// Both fractions are non-negative and leave a non-negative mantle
///
/// NaN fails every comparison and is rejected with the rest.
fn check_fractions(water: f64, core: f64) -> Result<()> {
    let valid = water >= 0.0 && core >= 0.0 && water + core <= 1.0 + FRACTION_TOLERANCE;
    if !valid {
        return Err(AccretionError::InvalidComposition { water, core });
    }
    Ok(())
}

/// Source of truth for body composition, keyed by identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyRegistry {
    records: BTreeMap<BodyId, BodyRecord>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new body
    ///
    /// Identities are never reused, so inserting an existing one is an error.
    pub fn insert(&mut self, id: BodyId, record: BodyRecord) -> Result<()> {
        if self.records.contains_key(&id) {
            return Err(AccretionError::DuplicateBody(id));
        }
        log::debug!(
            "registered body {} ({}, {:.3e} kg, water {:.3e})",
            id,
            record.body_type,
            record.total_mass.to_kg(),
            record.water_mass_fraction
        );
        self.records.insert(id, record);
        Ok(())
    }

    /// Looks up a body
    ///
    /// An unknown identity is always a bookkeeping bug, hence an error rather
    /// than an `Option`.
    pub fn get(&self, id: BodyId) -> Result<&BodyRecord> {
        self.records.get(&id).ok_or(AccretionError::UnknownBody(id))
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.records.contains_key(&id)
    }

    /// Marks a body as escaped or absorbed by the central body
    ///
    /// A body can only leave the simulation once; a second call fails and
    /// leaves the record untouched.
    pub fn set_terminal(&mut self, id: BodyId, kind: TerminalKind, time: Time) -> Result<()> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(AccretionError::UnknownBody(id))?;
        if let Some((existing, at)) = record.terminal() {
            return Err(AccretionError::AlreadyTerminal {
                id,
                existing,
                at,
                requested: kind,
            });
        }
        match kind {
            TerminalKind::Escaped => record.escaped_at = Some(time),
            TerminalKind::CollidedWithCenter => record.collided_with_center_at = Some(time),
        }
        log::info!("body {} {:?} at {:.0} yr", id, kind, time.to_years());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in identity order
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &BodyRecord)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    /// Largest registered identity
    pub fn max_id(&self) -> Option<BodyId> {
        self.records.keys().next_back().copied()
    }
}
