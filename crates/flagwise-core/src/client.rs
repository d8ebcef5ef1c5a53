use crate::builder::ClientBuilder;
use crate::decide_options::DecideOptions;
use crate::user_context::UserContext;
use flagwise_datafile::{Datafile, UserAttributes};
use flagwise_events::{Event, EventDispatcher};

/// Read-only decision engine over one datafile revision
pub struct Client {
    pub(crate) datafile: Datafile,
    pub(crate) event_dispatcher: Box<dyn EventDispatcher>,
    pub(crate) default_decide_options: DecideOptions,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn datafile(&self) -> &Datafile {
        &self.datafile
    }

    pub fn default_decide_options(&self) -> &DecideOptions {
        &self.default_decide_options
    }

    pub fn create_user_context(&self, user_id: impl Into<String>) -> UserContext<'_> {
        UserContext::new(self, user_id.into(), UserAttributes::new())
    }

    pub fn create_user_context_with_attributes(
        &self,
        user_id: impl Into<String>,
        attributes: UserAttributes,
    ) -> UserContext<'_> {
        UserContext::new(self, user_id.into(), attributes)
    }

    pub(crate) fn dispatch(&self, event: Event) {
        self.event_dispatcher.send_event(event);
    }
}
