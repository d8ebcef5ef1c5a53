use flagwise_datafile::DatafileError;
use flagwise_events::EventApiError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no datafile was provided to the client builder")]
    DatafileMissing,

    #[error("failed to read datafile {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download datafile")]
    Request(#[from] reqwest::Error),

    #[error("invalid datafile")]
    InvalidDatafile(#[from] DatafileError),

    #[error("failed to set up event dispatcher")]
    EventDispatcher(#[from] EventApiError),
}
