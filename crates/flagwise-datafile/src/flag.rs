//! Feature flags and their typed variables

use serde::Deserialize;
use serde_json::{Number, Value};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureFlag {
    pub id: String,
    pub key: String,
    /// Empty when the flag has no rollout
    #[serde(rename = "rolloutId", default)]
    pub rollout_id: String,
    #[serde(rename = "experimentIds")]
    pub experiment_ids: Vec<String>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl FeatureFlag {
    pub fn rollout_id(&self) -> Option<&str> {
        Some(self.rollout_id.as_str()).filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    String,
    Integer,
    Double,
    Boolean,
    Json,
}

/// A flag variable; values are string-encoded in the datafile
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Variable {
    pub id: String,
    pub key: String,
    #[serde(rename = "type")]
    pub kind: VariableType,
    #[serde(rename = "defaultValue")]
    pub default_value: String,
}

impl Variable {
    /// Convert a string-encoded value into a typed JSON value
    pub fn parse(&self, raw: &str) -> Option<Value> {
        match self.kind {
            VariableType::String => Some(Value::String(raw.to_string())),
            VariableType::Integer => raw.trim().parse::<i64>().ok().map(Value::from),
            VariableType::Double => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
            VariableType::Boolean => match raw.trim() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            VariableType::Json => serde_json::from_str(raw).ok(),
        }
    }

    pub fn default(&self) -> Option<Value> {
        self.parse(&self.default_value)
    }
}
