//! HTTP delivery of payloads

use crate::config::EventConfig;
use crate::error::EventApiError;
use crate::payload::Payload;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

/// Delivers a payload somewhere; the Event API in production
pub trait Transport: Send + Sync + 'static {
    fn send(&self, payload: &Payload) -> Result<(), EventApiError>;
}

/// Blocking HTTP client for the Event API
pub struct EventApiClient {
    endpoint: String,
    http: Client,
}

impl EventApiClient {
    pub fn new(config: &EventConfig) -> Result<Self, EventApiError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for EventApiClient {
    fn send(&self, payload: &Payload) -> Result<(), EventApiError> {
        let body = serde_json::to_vec(payload)?;
        let response = self
            .http
            .post(self.endpoint.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(EventApiError::Status(status.as_u16()));
        }
        tracing::debug!(
            account = payload.account_id(),
            visitors = payload.visitor_count(),
            "payload delivered"
        );
        Ok(())
    }
}
