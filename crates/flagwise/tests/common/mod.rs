#![allow(dead_code)]

use flagwise_events::{EventApiError, Payload, Transport};
use std::io::Write;
use std::sync::{Arc, Mutex};

pub const SANDBOX_DATAFILE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../datafiles/sandbox.json"
));

/// Sandbox datafile written to a temporary file
pub fn sandbox_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SANDBOX_DATAFILE.as_bytes()).unwrap();
    file
}

/// Transport keeping delivered payloads in memory
#[derive(Clone, Default)]
pub struct RecordingTransport {
    payloads: Arc<Mutex<Vec<Payload>>>,
}

impl RecordingTransport {
    pub fn payloads(&self) -> Vec<Payload> {
        self.payloads.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, payload: &Payload) -> Result<(), EventApiError> {
        self.payloads.lock().unwrap().push(payload.clone());
        Ok(())
    }
}
