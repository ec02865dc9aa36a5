use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use massloss::EstimatorKind;
use serde::{Deserialize, Serialize};
use units::{Mass, Time};
use uuid::Uuid;

use crate::body::BodyId;
use crate::collisions::{CollisionForest, CollisionRecord};
use crate::error::{AccretionError, Result};
use crate::history::History;
use crate::registry::{BodyRecord, BodyRegistry, TerminalKind};

/// Identifier of the build that produced a checkpoint
pub const BUILD_ID: &str = env!("CARGO_PKG_VERSION");

/// Run-level abort request
///
/// Set by the collision resolver when a collision cannot be resolved and
/// checked by the driver after each integration chunk. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Scalar metadata of a run
///
/// Fields added after the first checkpoint format carry serde defaults so
/// older checkpoints still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    #[serde(default = "Uuid::nil")]
    pub run_id: Uuid,
    /// Version of the code that started the run
    pub build: String,
    #[serde(default)]
    pub initial_conditions: Option<PathBuf>,
    /// Retention estimator used for every collision of the run
    pub method: EstimatorKind,
    pub t_max: Time,
    pub num_savesteps: u32,
    pub per_savestep: Time,
    /// Collision detection was off for the whole run
    #[serde(default)]
    pub no_merging: bool,
    /// Simulation time at the last checkpoint
    pub current_time: Time,
    /// Last identity handed out; the next body gets `id_counter + 1`
    #[serde(alias = "hash_counter")]
    pub id_counter: u32,
    #[serde(default)]
    pub initial_n: u32,
    #[serde(default)]
    pub initial_n_embryo: u32,
    #[serde(default)]
    pub initial_n_planetesimal: u32,
    /// Bodies that interact with everything (sun, giants, embryos)
    #[serde(default)]
    pub n_active: u32,
    /// Checkpoints written so far
    #[serde(default)]
    pub steps_done: u64,
    /// Wall-clock seconds over all sessions of the run
    #[serde(default)]
    pub walltime: f64,
    /// Seconds spent inside engine integration over all sessions
    #[serde(default)]
    pub cputime: f64,
}

impl RunMeta {
    pub fn new(method: EstimatorKind, t_max: Time, num_savesteps: u32) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            build: BUILD_ID.to_string(),
            initial_conditions: None,
            method,
            t_max,
            num_savesteps,
            per_savestep: Time::from_years(t_max.to_years() / f64::from(num_savesteps.max(1))),
            no_merging: false,
            current_time: Time::zero(),
            id_counter: 0,
            initial_n: 0,
            initial_n_embryo: 0,
            initial_n_planetesimal: 0,
            n_active: 0,
            steps_done: 0,
            walltime: 0.0,
            cputime: 0.0,
        }
    }

    /// Identity the next call to [`RunMeta::next_body_id`] will return
    pub fn peek_next_id(&self) -> Result<BodyId> {
        self.id_counter
            .checked_add(1)
            .map(BodyId)
            .ok_or(AccretionError::IdsExhausted)
    }

    /// Mints a new body identity
    ///
    /// # Examples
    ///
    /// ```
    /// use accretion::body::BodyId;
    /// use accretion::state::RunMeta;
    /// use massloss::EstimatorKind;
    /// use units::Time;
    ///
    /// let mut meta = RunMeta::new(EstimatorKind::PerfectMerging, Time::from_myr(1.0), 10);
    /// assert_eq!(meta.next_body_id().unwrap(), BodyId(1));
    /// assert_eq!(meta.next_body_id().unwrap(), BodyId(2));
    /// ```
    pub fn next_body_id(&mut self) -> Result<BodyId> {
        let id = self.peek_next_id()?;
        self.id_counter = id.0;
        Ok(id)
    }

    /// Simulation time the next integration chunk of a resumed run ends at
    pub fn resume_target(&self) -> Time {
        Time::from_years((self.current_time + self.per_savestep).to_years().round())
    }
}

/// Everything that persists between sessions of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub meta: RunMeta,
    pub registry: BodyRegistry,
    pub forest: CollisionForest,
    pub history: History,
}

impl RunState {
    pub fn new(meta: RunMeta) -> Self {
        Self {
            meta,
            registry: BodyRegistry::new(),
            forest: CollisionForest::new(),
            history: History::default(),
        }
    }

    /// Registers a seed body under a freshly minted identity
    pub fn register_seed(&mut self, record: BodyRecord) -> Result<BodyId> {
        let id = self.meta.peek_next_id()?;
        self.registry.insert(id, record)?;
        self.meta.id_counter = id.0;
        Ok(id)
    }

    /// Registers a merge product and its collision record
    ///
    /// Both parents must be registered and the collision must not predate the
    /// last recorded one. These are checked before anything is written.
    pub fn record_merger(
        &mut self,
        parents: [BodyId; 2],
        record: BodyRecord,
        meta: CollisionRecord,
    ) -> Result<BodyId> {
        for parent in parents {
            self.registry.get(parent)?;
        }
        self.forest.check_time(meta.time)?;
        let child = self.meta.peek_next_id()?;
        if self.registry.contains(child) {
            return Err(AccretionError::DuplicateBody(child));
        }

        self.forest.add(parents[0], parents[1], child, meta)?;
        self.registry.insert(child, record)?;
        self.meta.id_counter = child.0;
        Ok(child)
    }

    /// Marks a body that left the simulation by escaping or hitting the
    /// central body
    ///
    /// A body that already merged is no longer in the simulation and is
    /// refused, as is a body that is already terminal.
    pub fn set_terminal(&mut self, id: BodyId, kind: TerminalKind, time: Time) -> Result<()> {
        self.registry.get(id)?;
        if let Some(into) = self.forest.merged_into(id) {
            return Err(AccretionError::AlreadyMerged { id, into });
        }
        self.registry.set_terminal(id, kind, time)
    }

    /// Total mass of bodies that neither merged nor left the system
    pub fn surviving_mass(&self) -> Mass {
        self.survivors().map(|(_, record)| record.total_mass).sum()
    }

    /// Records of bodies still in the simulation
    ///
    /// A body survives if it has no terminal status and is not a parent in
    /// any collision.
    pub fn survivors(&self) -> impl Iterator<Item = (BodyId, &BodyRecord)> {
        let merged: std::collections::HashSet<BodyId> = self
            .forest
            .iter()
            .flat_map(|(_, entry)| entry.parents)
            .collect();
        self.registry
            .iter()
            .filter(move |(id, record)| !record.is_terminal() && !merged.contains(id))
    }

    /// Cross-checks the registry, forest and identity counter
    ///
    /// Used after loading a checkpoint, before the state is trusted.
    pub fn validate(&self) -> Result<()> {
        for (id, record) in self.registry.iter() {
            record.validate(id)?;
        }
        self.forest.validate()?;
        for (child, entry) in self.forest.iter() {
            self.registry.get(child)?;
            for parent in entry.parents {
                self.registry.get(parent)?;
            }
        }
        if let Some(max) = self.registry.max_id() {
            if max.0 > self.meta.id_counter {
                return Err(AccretionError::Lineage {
                    child: max,
                    reason: format!(
                        "identity counter {} is behind the registry",
                        self.meta.id_counter
                    ),
                });
            }
        }
        Ok(())
    }
}
