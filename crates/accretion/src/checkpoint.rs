//! Durable run state
//!
//! A checkpoint is one pretty-printed JSON document with the run metadata, the
//! body registry, the collision forest and the diagnostics history. It is
//! written to a temporary file next to the target and renamed over it, so a
//! crash mid-write leaves the previous checkpoint intact.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::collisions::CollisionForest;
use crate::error::{AccretionError, Result};
use crate::history::History;
use crate::registry::BodyRegistry;
use crate::state::{RunMeta, RunState};

/// Checkpoint format written by this build
///
/// Version 1 had no `history` section.
pub const SCHEMA_VERSION: u32 = 2;

/// Files belonging to one run, derived from a common stem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointPaths {
    pub checkpoint: PathBuf,
    pub lock: PathBuf,
    pub backup: PathBuf,
    /// Engine-owned snapshot of particle state
    pub snapshot: PathBuf,
}

impl CheckpointPaths {
    /// Paths for the run stored under `stem`
    ///
    /// # Examples
    ///
    /// ```
    /// use accretion::checkpoint::CheckpointPaths;
    /// use std::path::Path;
    ///
    /// let paths = CheckpointPaths::from_stem("output/run7");
    /// assert_eq!(paths.checkpoint, Path::new("output/run7.checkpoint.json"));
    /// assert_eq!(paths.lock, Path::new("output/run7.lock"));
    /// ```
    pub fn from_stem(stem: impl AsRef<Path>) -> Self {
        let stem = stem.as_ref();
        let with = |suffix: &str| {
            let mut name = stem.as_os_str().to_owned();
            name.push(suffix);
            PathBuf::from(name)
        };
        Self {
            checkpoint: with(".checkpoint.json"),
            lock: with(".lock"),
            backup: with(".bak.json"),
            snapshot: with(".snapshot"),
        }
    }
}

#[derive(Serialize)]
struct CheckpointRef<'a> {
    schema_version: u32,
    meta: &'a RunMeta,
    registry: &'a BodyRegistry,
    forest: &'a CollisionForest,
    history: &'a History,
}

#[derive(Deserialize)]
struct CheckpointFile {
    schema_version: u32,
    meta: RunMeta,
    registry: BodyRegistry,
    forest: CollisionForest,
    #[serde(default)]
    history: History,
}

/// Writes `state` to `path` atomically
pub fn save(state: &RunState, path: &Path) -> Result<()> {
    let document = CheckpointRef {
        schema_version: SCHEMA_VERSION,
        meta: &state.meta,
        registry: &state.registry,
        forest: &state.forest,
        history: &state.history,
    };
    let bytes =
        serde_json::to_vec_pretty(&document).map_err(|e| AccretionError::json(path, e))?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let mut file = File::create(&tmp).map_err(|e| AccretionError::io(&tmp, e))?;
    file.write_all(&bytes)
        .and_then(|()| file.sync_all())
        .map_err(|e| AccretionError::io(&tmp, e))?;
    drop(file);
    fs::rename(&tmp, path).map_err(|e| AccretionError::io(path, e))?;

    log::info!(
        "saved checkpoint {} at {:.0} yr ({} bodies, {} collisions)",
        path.display(),
        state.meta.current_time.to_years(),
        state.registry.len(),
        state.forest.len()
    );
    Ok(())
}

/// Reads a checkpoint written by [`save`] or by an older build
///
/// The loaded state is validated (lineage, parent registration, identity
/// counter) before it is returned.
pub fn load(path: &Path) -> Result<RunState> {
    let text = fs::read_to_string(path).map_err(|e| AccretionError::io(path, e))?;
    let file: CheckpointFile =
        serde_json::from_str(&text).map_err(|e| AccretionError::json(path, e))?;
    if file.schema_version > SCHEMA_VERSION {
        return Err(AccretionError::Schema {
            found: file.schema_version,
            supported: SCHEMA_VERSION,
        });
    }
    if file.schema_version < SCHEMA_VERSION {
        log::info!(
            "upgrading checkpoint {} from schema {} to {}",
            path.display(),
            file.schema_version,
            SCHEMA_VERSION
        );
    }

    let state = RunState {
        meta: file.meta,
        registry: file.registry,
        forest: file.forest,
        history: file.history,
    };
    state.validate()?;
    Ok(state)
}

/// Copies the checkpoint to the backup path before a resumed run touches it
pub fn backup(paths: &CheckpointPaths) -> Result<()> {
    fs::copy(&paths.checkpoint, &paths.backup)
        .map_err(|e| AccretionError::io(&paths.backup, e))?;
    Ok(())
}

/// Exclusive claim on a run directory
///
/// The lock file is created atomically and fails if it already exists. It is
/// removed by [`RunLock::release`] when a run finishes; an aborted run leaves
/// it behind on purpose so nobody resumes a run that died in an unknown state.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub fn acquire(path: &Path) -> Result<Self> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(AccretionError::Lock(path.to_path_buf()));
            }
            Err(e) => return Err(AccretionError::io(path, e)),
        };
        writeln!(file, "{}", std::process::id()).map_err(|e| AccretionError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the lock file
    pub fn release(self) -> Result<()> {
        fs::remove_file(&self.path).map_err(|e| AccretionError::io(&self.path, e))
    }

    /// Gives up the handle but keeps the lock file on disk
    pub fn keep(self) -> PathBuf {
        log::warn!("leaving lock file {} in place", self.path.display());
        self.path
    }
}
