use crate::client::{EventApiClient, Transport};
use crate::config::EventConfig;
use crate::dispatcher::EventDispatcher;
use crate::error::EventApiError;
use crate::event::Event;
use crate::payload::Payload;

/// Sends one request per event on the calling thread
pub struct SimpleEventDispatcher<T: Transport = EventApiClient> {
    transport: T,
}

impl SimpleEventDispatcher {
    pub fn new(config: &EventConfig) -> Result<Self, EventApiError> {
        Ok(Self::with_transport(EventApiClient::new(config)?))
    }
}

impl<T: Transport> SimpleEventDispatcher<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: Transport> EventDispatcher for SimpleEventDispatcher<T> {
    fn send_event(&self, event: Event) {
        let mut payload = Payload::new(event.account_id());
        let result = payload
            .add_event(event)
            .and_then(|()| self.transport.send(&payload));

        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to dispatch event");
        }
    }
}
