/// An event that can be dispatched to the Event API: either a decision
/// (user bucketed into an experiment variation) or a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Decision {
        account_id: String,
        user_id: String,
        campaign_id: String,
        experiment_id: String,
        variation_id: String,
    },
    Conversion {
        account_id: String,
        user_id: String,
        event_id: String,
        event_key: String,
    },
}

impl Event {
    pub fn decision(
        account_id: impl Into<String>,
        user_id: impl Into<String>,
        campaign_id: impl Into<String>,
        experiment_id: impl Into<String>,
        variation_id: impl Into<String>,
    ) -> Self {
        Event::Decision {
            account_id: account_id.into(),
            user_id: user_id.into(),
            campaign_id: campaign_id.into(),
            experiment_id: experiment_id.into(),
            variation_id: variation_id.into(),
        }
    }

    pub fn conversion(
        account_id: impl Into<String>,
        user_id: impl Into<String>,
        event_id: impl Into<String>,
        event_key: impl Into<String>,
    ) -> Self {
        Event::Conversion {
            account_id: account_id.into(),
            user_id: user_id.into(),
            event_id: event_id.into(),
            event_key: event_key.into(),
        }
    }

    pub fn account_id(&self) -> &str {
        match self {
            Event::Decision { account_id, .. } | Event::Conversion { account_id, .. } => account_id,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            Event::Decision { user_id, .. } | Event::Conversion { user_id, .. } => user_id,
        }
    }
}
