//! Event API wire format
//!
//! A payload groups events per visitor. Each visitor carries a single
//! snapshot holding its decisions and the events derived from them:
//!
//! ```json
//! {"account_id": "...", "visitors": [{"visitor_id": "...", "snapshots": [
//!     {"decisions": [...], "events": [...]}
//! ]}], "enrich_decisions": true, ...}
//! ```

use crate::error::EventApiError;
use crate::event::Event;
use serde::Serialize;

const CLIENT_NAME: &str = "flagwise";
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");
const CAMPAIGN_ACTIVATED: &str = "campaign_activated";

#[derive(Debug, Clone, Serialize)]
pub struct Payload {
    account_id: String,
    visitors: Vec<Visitor>,
    enrich_decisions: bool,
    anonymize_ip: bool,
    client_name: &'static str,
    client_version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct Visitor {
    visitor_id: String,
    snapshots: [Snapshot; 1],
}

#[derive(Debug, Clone, Default, Serialize)]
struct Snapshot {
    decisions: Vec<DecisionEntry>,
    events: Vec<EventEntry>,
}

#[derive(Debug, Clone, Serialize)]
struct DecisionEntry {
    campaign_id: String,
    experiment_id: String,
    variation_id: String,
    is_campaign_holdback: bool,
}

#[derive(Debug, Clone, Serialize)]
struct EventEntry {
    entity_id: String,
    key: String,
    /// Milliseconds since the Unix epoch
    timestamp: i64,
    uuid: String,
}

impl EventEntry {
    fn new(entity_id: String, key: String) -> Self {
        Self {
            entity_id,
            key,
            timestamp: chrono::Utc::now().timestamp_millis(),
            uuid: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl Payload {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            visitors: Vec::new(),
            enrich_decisions: true,
            anonymize_ip: true,
            client_name: CLIENT_NAME,
            client_version: CLIENT_VERSION,
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn visitor_count(&self) -> usize {
        self.visitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }

    /// Add an event, merging it into the visitor entry for its user
    pub fn add_event(&mut self, event: Event) -> Result<(), EventApiError> {
        if event.account_id() != self.account_id {
            return Err(EventApiError::AccountMismatch {
                expected: self.account_id.clone(),
                found: event.account_id().to_string(),
            });
        }

        match event {
            Event::Decision {
                user_id,
                campaign_id,
                experiment_id,
                variation_id,
                ..
            } => {
                tracing::debug!(user = %user_id, experiment = %experiment_id, "adding decision to payload");
                let snapshot = self.snapshot(user_id);
                snapshot
                    .events
                    .push(EventEntry::new(campaign_id.clone(), CAMPAIGN_ACTIVATED.to_string()));
                snapshot.decisions.push(DecisionEntry {
                    campaign_id,
                    experiment_id,
                    variation_id,
                    is_campaign_holdback: false,
                });
            }
            Event::Conversion {
                user_id,
                event_id,
                event_key,
                ..
            } => {
                tracing::debug!(user = %user_id, event = %event_key, "adding conversion to payload");
                self.snapshot(user_id)
                    .events
                    .push(EventEntry::new(event_id, event_key));
            }
        }
        Ok(())
    }

    fn snapshot(&mut self, visitor_id: String) -> &mut Snapshot {
        let index = match self
            .visitors
            .iter()
            .position(|visitor| visitor.visitor_id == visitor_id)
        {
            Some(index) => index,
            None => {
                self.visitors.push(Visitor {
                    visitor_id,
                    snapshots: [Snapshot::default()],
                });
                self.visitors.len() - 1
            }
        };
        &mut self.visitors[index].snapshots[0]
    }
}
