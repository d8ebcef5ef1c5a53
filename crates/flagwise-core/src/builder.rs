//! Client construction from local files, strings or the CDN

use crate::client::Client;
use crate::decide_options::DecideOptions;
use crate::error::ClientError;
use flagwise_datafile::Datafile;
use flagwise_events::{EventConfig, EventDispatcher, SimpleEventDispatcher};
use std::path::Path;

const CDN_URL: &str = "https://cdn.optimizely.com/datafiles";

/// CDN location of the datafile for `sdk_key`
pub fn datafile_url(sdk_key: &str) -> String {
    format!("{CDN_URL}/{sdk_key}.json")
}

#[derive(Default)]
pub struct ClientBuilder {
    datafile: Option<Datafile>,
    event_dispatcher: Option<Box<dyn EventDispatcher>>,
    default_decide_options: DecideOptions,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_datafile(mut self, datafile: Datafile) -> Self {
        self.datafile = Some(datafile);
        self
    }

    pub fn with_datafile_str(self, content: &str) -> Result<Self, ClientError> {
        let datafile = Datafile::build(content)?;
        Ok(self.with_datafile(datafile))
    }

    pub fn with_local_datafile(self, path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ClientError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "read local datafile");
        self.with_datafile_str(&content)
    }

    /// Download the datafile for `sdk_key` from the CDN
    pub fn with_sdk_key(self, sdk_key: &str) -> Result<Self, ClientError> {
        let url = datafile_url(sdk_key);
        tracing::debug!(%url, "downloading datafile");
        let content = reqwest::blocking::get(url.as_str())?.error_for_status()?.text()?;
        self.with_datafile_str(&content)
    }

    pub fn with_event_dispatcher(mut self, dispatcher: impl EventDispatcher + 'static) -> Self {
        self.event_dispatcher = Some(Box::new(dispatcher));
        self
    }

    pub fn with_default_decide_options(mut self, options: DecideOptions) -> Self {
        self.default_decide_options = options;
        self
    }

    /// Finish the client. Without an explicit dispatcher, events are sent
    /// one request at a time to the default Event API endpoint.
    pub fn build(self) -> Result<Client, ClientError> {
        let datafile = self.datafile.ok_or(ClientError::DatafileMissing)?;
        let event_dispatcher: Box<dyn EventDispatcher> = match self.event_dispatcher {
            Some(dispatcher) => dispatcher,
            None => Box::new(SimpleEventDispatcher::new(&EventConfig::default())?),
        };

        Ok(Client {
            datafile,
            event_dispatcher,
            default_decide_options: self.default_decide_options,
        })
    }
}
