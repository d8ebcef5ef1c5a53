use serde::Deserialize;

/// A conversion event that can be tracked for a user
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    pub id: String,
    pub key: String,
    #[serde(rename = "experimentIds", default)]
    pub experiment_ids: Vec<String>,
}
