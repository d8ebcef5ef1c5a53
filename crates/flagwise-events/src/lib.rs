//! Event API payloads and dispatchers for decision and conversion events

mod batched;
mod client;
mod config;
mod dispatcher;
mod error;
mod event;
mod memory;
mod payload;
mod simple;

pub use batched::BatchedEventDispatcher;
pub use client::{EventApiClient, Transport};
pub use config::{EventConfig, DEFAULT_ENDPOINT};
pub use dispatcher::EventDispatcher;
pub use error::EventApiError;
pub use event::Event;
pub use memory::InMemoryEventDispatcher;
pub use payload::Payload;
pub use simple::SimpleEventDispatcher;
