//! Experiments, rollout rules and their variations

use crate::condition::BooleanCondition;
use crate::traffic_allocation::TrafficAllocation;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

const RUNNING: &str = "Running";

fn running() -> String {
    RUNNING.to_string()
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VariableUsage {
    pub id: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Variation {
    pub id: String,
    pub key: String,
    #[serde(rename = "featureEnabled", default = "enabled")]
    pub feature_enabled: bool,
    #[serde(default)]
    pub variables: Vec<VariableUsage>,
}

impl Variation {
    /// String-encoded override for the variable with `variable_id`
    pub fn variable_value(&self, variable_id: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|usage| usage.id == variable_id)
            .map(|usage| usage.value.as_str())
    }
}

/// An A/B experiment, or a targeted delivery rule when part of a rollout
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Experiment {
    pub id: String,
    pub key: String,
    /// Campaign id reported in decision events
    #[serde(rename = "layerId", default)]
    pub layer_id: String,
    #[serde(default = "running")]
    pub status: String,
    #[serde(rename = "audienceIds", default)]
    pub audience_ids: Vec<String>,
    #[serde(rename = "audienceConditions", default)]
    pub audience_conditions: Option<BooleanCondition<String>>,
    /// User id -> variation key
    #[serde(rename = "forcedVariations", default)]
    pub forced_variations: HashMap<String, String>,
    #[serde(rename = "trafficAllocation")]
    pub traffic_allocation: TrafficAllocation,
    #[serde(deserialize_with = "index_variations")]
    pub variations: HashMap<String, Variation>,
}

impl Experiment {
    pub fn is_running(&self) -> bool {
        self.status == RUNNING
    }

    pub fn variation(&self, variation_id: &str) -> Option<&Variation> {
        self.variations.get(variation_id)
    }

    pub fn variation_by_key(&self, variation_key: &str) -> Option<&Variation> {
        self.variations
            .values()
            .find(|variation| variation.key == variation_key)
    }

    /// Forced variation configured for `user_id`, if it names a known variation
    pub fn forced_variation(&self, user_id: &str) -> Option<&Variation> {
        let key = self.forced_variations.get(user_id)?;
        let variation = self.variation_by_key(key);
        if variation.is_none() {
            tracing::warn!(experiment = %self.key, variation = %key, "forced variation not found");
        }
        variation
    }

    /// Evaluate the experiment's audiences, resolving each audience id with
    /// `audience_matches`. `audienceConditions` wins over `audienceIds`, which
    /// combine with an implicit `or`. No conditions admit every user.
    pub fn audiences_match<F>(&self, audience_matches: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        match &self.audience_conditions {
            Some(conditions) if conditions.is_empty() => true,
            Some(conditions) => conditions.evaluate(&|id: &String| audience_matches(id)),
            None if self.audience_ids.is_empty() => true,
            None => self.audience_ids.iter().any(|id| audience_matches(id)),
        }
    }
}

/// Ordered delivery rules; the last one targets everyone else
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rollout {
    pub id: String,
    pub experiments: Vec<Experiment>,
}

fn index_variations<'de, D>(deserializer: D) -> Result<HashMap<String, Variation>, D::Error>
where
    D: Deserializer<'de>,
{
    let variations = Vec::<Variation>::deserialize(deserializer)?;
    Ok(variations
        .into_iter()
        .map(|variation| (variation.id.clone(), variation))
        .collect())
}
