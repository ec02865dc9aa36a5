use std::path::PathBuf;

use massloss::EstimatorError;
use thiserror::Error;
use units::Time;

use crate::body::BodyId;
use crate::registry::TerminalKind;

/// Errors raised by collision bookkeeping and run management
#[derive(Error, Debug)]
pub enum AccretionError {
    #[error("body {0} was never registered")]
    UnknownBody(BodyId),

    #[error("body {0} is already registered")]
    DuplicateBody(BodyId),

    #[error("body {id} is already terminal ({existing:?} at {at:?}), cannot mark it {requested:?}")]
    AlreadyTerminal {
        id: BodyId,
        existing: TerminalKind,
        at: Time,
        requested: TerminalKind,
    },

    #[error("body {id} already merged into {into}, it cannot leave the simulation again")]
    AlreadyMerged { id: BodyId, into: BodyId },

    #[error("invalid composition: water fraction {water} and core fraction {core}")]
    InvalidComposition { water: f64, core: f64 },

    #[error("undefined impact geometry: {0}")]
    Geometry(String),

    #[error("collision at {time:?} is earlier than the last recorded collision at {last:?}")]
    OutOfOrder { time: Time, last: Time },

    #[error("invalid lineage for body {child}: {reason}")]
    Lineage { child: BodyId, reason: String },

    #[error("body identity counter exhausted")]
    IdsExhausted,

    #[error("lock file {0} exists, another process may be running this simulation (remove it manually if not)")]
    Lock(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("checkpoint schema version {found} is newer than the supported version {supported}")]
    Schema { found: u32, supported: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("initial conditions line {line}: {reason}")]
    InitialConditions { line: usize, reason: String },

    #[error("simulation engine failure: {0}")]
    Engine(String),

    #[error(transparent)]
    Estimator(#[from] EstimatorError),
}

impl AccretionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AccretionError>;
