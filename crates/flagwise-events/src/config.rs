//! Event delivery configuration

use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://logx.optimizely.com/v1/events";

/// Where and how often events are delivered
#[derive(Debug, Clone)]
pub struct EventConfig {
    /// Event API endpoint receiving JSON payloads
    pub endpoint: String,

    /// Events per payload before the batched dispatcher flushes
    pub batch_size: usize,

    /// Longest time a pending event waits before being flushed
    pub flush_interval: Duration,

    /// HTTP request timeout
    pub request_timeout: Duration,
}

impl EventConfig {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            batch_size: 10,
            flush_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self::new()
    }
}
