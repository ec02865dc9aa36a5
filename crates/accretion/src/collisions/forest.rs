//! Collision Forest: the genealogy of every merge in a run
//!
//! Each merge product points back at its two parents. Seeds have no entry, so
//! the structure is a forest whose roots are the initial bodies. Because a
//! child's identity is always minted after both parents', every edge points
//! from a larger identity to a smaller one and the graph cannot contain a
//! cycle.

use std::collections::BTreeMap;

use massloss::Retention;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use units::{Length, Mass, Time};

use crate::body::BodyId;
use crate::collisions::impact::ImpactInput;
use crate::error::{AccretionError, Result};

/// Mass lost to space in one collision, per category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LostMass {
    pub water: Mass,
    pub mantle: Mass,
    pub core: Mass,
}

impl LostMass {
    pub fn total(&self) -> Mass {
        self.water + self.mantle + self.core
    }
}

/// Everything known about a single collision
///
/// Parent-indexed arrays are ordered `[target, projectile]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionRecord {
    pub time: Time,
    /// Impact parameters as measured
    pub input: ImpactInput,
    /// Impact parameters as handed to the estimator
    pub adjusted_input: ImpactInput,
    /// Estimator output before clamping
    pub raw_retention: Retention,
    pub retention: Retention,
    /// Pre-collision masses
    pub parent_masses: [Mass; 2],
    pub total_mass: Mass,
    pub final_wmf: f64,
    pub final_cmf: f64,
    pub final_radius: Length,
    pub lost: LostMass,
    pub collision_positions: [Point3<f64>; 2],
    pub collision_velocities: [Vector3<f64>; 2],
    pub collision_radii: [Length; 2],
}

impl CollisionRecord {
    pub fn lost_mass(&self) -> Mass {
        self.lost.total()
    }
}

/// A forest node: the two parents of a merge product and how they merged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestEntry {
    pub parents: [BodyId; 2],
    #[serde(rename = "metadata", alias = "meta")]
    pub meta: CollisionRecord,
}

impl ForestEntry {
    /// The parent that brought more mass into the collision
    ///
    /// Ties go to the first parent, which is the target.
    pub fn dominant_parent(&self) -> BodyId {
        let [first, second] = self.meta.parent_masses;
        if second > first {
            self.parents[1]
        } else {
            self.parents[0]
        }
    }
}

/// Append-only map from merge product to its [`ForestEntry`]
///
/// Merge products are added in identity order and collision times never
/// decrease along it, so the newest entry also holds the latest time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionForest {
    entries: BTreeMap<BodyId, ForestEntry>,
}

impl CollisionForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time of the most recent collision
    pub fn last_time(&self) -> Option<Time> {
        self.entries.values().next_back().map(|entry| entry.meta.time)
    }

    /// The merge product `id` went into, if it merged
    pub fn merged_into(&self, id: BodyId) -> Option<BodyId> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.parents.contains(&id))
            .map(|(child, _)| *child)
    }

    /// Checks that a collision at `time` keeps the record in time order
    pub fn check_time(&self, time: Time) -> Result<()> {
        match self.last_time() {
            Some(last) if time < last => Err(AccretionError::OutOfOrder { time, last }),
            _ => Ok(()),
        }
    }

    /// Records that `child` was formed from `parent1` and `parent2`
    ///
    /// The child must be newer than both parents and than every merge product
    /// already recorded. Collisions must arrive in non-decreasing time order.
    pub fn add(
        &mut self,
        parent1: BodyId,
        parent2: BodyId,
        child: BodyId,
        meta: CollisionRecord,
    ) -> Result<()> {
        check_lineage(child, [parent1, parent2])?;
        if self.entries.contains_key(&child) {
            return Err(AccretionError::Lineage {
                child,
                reason: "already has a collision record".to_string(),
            });
        }
        if let Some(newest) = self.entries.keys().next_back() {
            if child < *newest {
                return Err(AccretionError::Lineage {
                    child,
                    reason: format!("is older than the recorded merge product {}", newest),
                });
            }
        }
        self.check_time(meta.time)?;
        self.entries.insert(
            child,
            ForestEntry {
                parents: [parent1, parent2],
                meta,
            },
        );
        Ok(())
    }

    pub fn get(&self, child: BodyId) -> Option<&ForestEntry> {
        self.entries.get(&child)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries keyed by merge product, in identity (and so creation) order
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &ForestEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Walks from `id` back to the seed it mostly grew from
    ///
    /// Yields the collision that formed `id`, then the collision that formed
    /// its dominant parent, and so on. A body that never collided yields
    /// nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use accretion::body::BodyId;
    /// use accretion::collisions::CollisionForest;
    ///
    /// let forest = CollisionForest::new();
    /// assert_eq!(forest.ancestors(BodyId(5)).count(), 0);
    /// ```
    pub fn ancestors(&self, id: BodyId) -> Ancestors<'_> {
        Ancestors {
            forest: self,
            next: Some(id),
        }
    }

    /// Seed at the root of the dominant-parent chain of `id`
    pub fn root_of(&self, id: BodyId) -> BodyId {
        self.ancestors(id)
            .last()
            .map_or(id, |(_, entry)| entry.dominant_parent())
    }

    /// Checks the lineage and time order of every entry, for data loaded
    /// from disk
    pub fn validate(&self) -> Result<()> {
        let mut last: Option<Time> = None;
        for (child, entry) in &self.entries {
            check_lineage(*child, entry.parents)?;
            if let Some(last) = last {
                if entry.meta.time < last {
                    return Err(AccretionError::OutOfOrder {
                        time: entry.meta.time,
                        last,
                    });
                }
            }
            last = Some(entry.meta.time);
        }
        Ok(())
    }
}

fn check_lineage(child: BodyId, parents: [BodyId; 2]) -> Result<()> {
    if parents[0] == parents[1] {
        return Err(AccretionError::Lineage {
            child,
            reason: format!("both parents are {}", parents[0]),
        });
    }
    if parents.iter().any(|parent| *parent >= child) {
        return Err(AccretionError::Lineage {
            child,
            reason: format!(
                "parents {} and {} must be older than the child",
                parents[0], parents[1]
            ),
        });
    }
    Ok(())
}

/// Lazy ancestry walk, see [`CollisionForest::ancestors`]
///
/// Every step moves to a strictly smaller identity, so the walk is finite.
pub struct Ancestors<'a> {
    forest: &'a CollisionForest,
    next: Option<BodyId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (BodyId, &'a ForestEntry);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        let entry = self.forest.get(id)?;
        self.next = Some(entry.dominant_parent());
        Some((id, entry))
    }
}
