#![allow(dead_code)]

use flagwise_core::{Client, DecideOptions};
use flagwise_events::InMemoryEventDispatcher;

pub const SANDBOX_DATAFILE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../datafiles/sandbox.json"
));

pub const ACCOUNT_ID: &str = "21537940595";

/// Client over the sandbox datafile with events recorded in memory
pub fn sandbox_client() -> (Client, InMemoryEventDispatcher) {
    sandbox_client_with_options(DecideOptions::default())
}

pub fn sandbox_client_with_options(options: DecideOptions) -> (Client, InMemoryEventDispatcher) {
    let dispatcher = InMemoryEventDispatcher::new();
    let client = Client::builder()
        .with_datafile_str(SANDBOX_DATAFILE)
        .expect("sandbox datafile is valid")
        .with_event_dispatcher(dispatcher.clone())
        .with_default_decide_options(options)
        .build()
        .expect("client builds");
    (client, dispatcher)
}

pub fn with_reasons() -> DecideOptions {
    DecideOptions {
        include_reasons: true,
        ..DecideOptions::default()
    }
}
