use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while selecting or constructing a retention estimator
///
/// All of these are configuration errors: they surface at run start and are
/// never produced by [`crate::RetentionEstimator::estimate`].
#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("invalid mass loss estimation method {name:?}, please use one of: {}", .valid.join(", "))]
    UnknownMethod {
        name: String,
        valid: Vec<&'static str>,
    },

    #[error("method {method} needs a {what} file but none was configured")]
    MissingSource {
        method: &'static str,
        what: &'static str,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("model shape mismatch: {0}")]
    Shape(String),

    #[error("interpolation dataset is empty")]
    EmptyDataset,

    #[error("interpolation system is singular (duplicate samples in the dataset?)")]
    SingularSystem,
}
