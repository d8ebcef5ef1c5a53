use crate::dispatcher::EventDispatcher;
use crate::event::Event;
use std::sync::{Arc, Mutex, PoisonError};

/// Records events instead of sending them. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventDispatcher {
    events: Arc<Mutex<Vec<Event>>>,
}

impl InMemoryEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far, in dispatch order
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventDispatcher for InMemoryEventDispatcher {
    fn send_event(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
