use thiserror::Error;

/// Errors raised while building or delivering Event API payloads
#[derive(Debug, Error)]
pub enum EventApiError {
    #[error("failed to serialize payload to JSON")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to send request to Event API")]
    Request(#[from] reqwest::Error),

    #[error("Event API responded with status {0}")]
    Status(u16),

    #[error("event for account {found} cannot join payload for account {expected}")]
    AccountMismatch { expected: String, found: String },
}
