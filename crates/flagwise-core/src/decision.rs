use serde::Serialize;
use serde_json::{Map, Value};

pub const OFF_VARIATION: &str = "off";

/// Outcome of deciding a flag for a user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub flag_key: String,
    pub enabled: bool,
    pub variation_key: String,
    /// Key of the experiment or rollout rule that produced the variation
    pub rule_key: Option<String>,
    pub variables: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

impl Decision {
    /// Disabled decision used when no rule yields a variation
    pub fn off(flag_key: impl Into<String>) -> Self {
        Self {
            flag_key: flag_key.into(),
            enabled: false,
            variation_key: OFF_VARIATION.to_string(),
            rule_key: None,
            variables: Map::new(),
            reasons: Vec::new(),
        }
    }

    pub fn variable(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }
}

/// Explanations collected while deciding; only recorded when requested
pub(crate) struct Reasons {
    enabled: bool,
    messages: Vec<String>,
}

impl Reasons {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            messages: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, message: impl FnOnce() -> String) {
        if self.enabled {
            self.messages.push(message());
        }
    }

    pub(crate) fn into_vec(self) -> Vec<String> {
        self.messages
    }
}
