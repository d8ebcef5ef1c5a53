use thiserror::Error;

/// Errors raised while parsing or validating a datafile
#[derive(Debug, Error)]
pub enum DatafileError {
    #[error("datafile is not valid JSON or misses required properties")]
    InvalidJson(#[from] serde_json::Error),

    #[error("revision {0:?} is not parsable as an integer")]
    InvalidRevision(String),

    #[error("flag {flag:?} references unknown rollout {rollout:?}")]
    UnknownRollout { flag: String, rollout: String },

    #[error("flag {flag:?} references unknown experiment {experiment:?}")]
    UnknownExperiment { flag: String, experiment: String },
}
