//! Background batching of events into shared payloads

use crate::client::{EventApiClient, Transport};
use crate::config::EventConfig;
use crate::dispatcher::EventDispatcher;
use crate::error::EventApiError;
use crate::event::Event;
use crate::payload::Payload;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Queues events on a channel; a worker thread groups them into payloads.
///
/// A payload is flushed once `batch_size` events are queued, once
/// `flush_interval` has passed since its first event, when an event for a
/// different account arrives, and when the dispatcher is dropped.
pub struct BatchedEventDispatcher {
    sender: Option<Mutex<Sender<Event>>>,
    worker: Option<JoinHandle<()>>,
}

impl BatchedEventDispatcher {
    pub fn new(config: EventConfig) -> Result<Self, EventApiError> {
        let transport = EventApiClient::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport<T: Transport>(config: EventConfig, transport: T) -> Self {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("flagwise-events".to_string())
            .spawn(move || batch_loop(&config, &transport, &receiver));

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::warn!(error = %err, "failed to spawn event worker, events will be dropped");
                None
            }
        };

        Self {
            sender: Some(Mutex::new(sender)),
            worker,
        }
    }
}

impl EventDispatcher for BatchedEventDispatcher {
    fn send_event(&self, event: Event) {
        let Some(sender) = &self.sender else {
            return;
        };
        let sent = match sender.lock() {
            Ok(sender) => sender.send(event).is_ok(),
            Err(_) => false,
        };
        if !sent {
            tracing::warn!("event worker is gone, dropping event");
        }
    }
}

impl Drop for BatchedEventDispatcher {
    fn drop(&mut self) {
        // Closing the channel makes the worker flush and exit
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("event worker panicked");
            }
        }
    }
}

fn batch_loop<T: Transport>(config: &EventConfig, transport: &T, receiver: &Receiver<Event>) {
    let batch_size = config.batch_size.max(1);
    let mut carried: Option<Event> = None;

    loop {
        let first = match carried.take() {
            Some(event) => event,
            None => match receiver.recv() {
                Ok(event) => event,
                Err(_) => break,
            },
        };

        let deadline = Instant::now() + config.flush_interval;
        let mut payload = Payload::new(first.account_id());
        let mut queued = 0;
        let mut closed = false;
        add(&mut payload, &mut queued, first);

        while queued < batch_size {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if timeout.is_zero() {
                break;
            }
            match receiver.recv_timeout(timeout) {
                Ok(event) if event.account_id() != payload.account_id() => {
                    tracing::debug!("account changed, flushing batch early");
                    carried = Some(event);
                    break;
                }
                Ok(event) => add(&mut payload, &mut queued, event),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    closed = true;
                    break;
                }
            }
        }

        flush(transport, &payload, queued);
        if closed {
            break;
        }
    }
}

fn add(payload: &mut Payload, queued: &mut usize, event: Event) {
    match payload.add_event(event) {
        Ok(()) => *queued += 1,
        Err(err) => tracing::warn!(error = %err, "dropping event"),
    }
}

fn flush<T: Transport>(transport: &T, payload: &Payload, queued: usize) {
    tracing::debug!(events = queued, account = payload.account_id(), "flushing batch");
    if let Err(err) = transport.send(payload) {
        tracing::warn!(error = %err, events = queued, "failed to deliver batch");
    }
}
