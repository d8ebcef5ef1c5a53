use crate::event::Event;

/// Receives events produced by decisions and tracking calls
pub trait EventDispatcher: Send + Sync {
    fn send_event(&self, event: Event);
}
