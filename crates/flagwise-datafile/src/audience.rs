use crate::attributes::UserAttributes;
use crate::audience_condition::AudienceCondition;
use crate::condition::BooleanCondition;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A named group of users described by a condition tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Audience {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "deserialize_conditions")]
    pub conditions: BooleanCondition<AudienceCondition>,
}

impl Audience {
    pub fn evaluate(&self, attributes: &UserAttributes) -> bool {
        self.conditions
            .evaluate(&|condition: &AudienceCondition| condition.evaluate(attributes))
    }
}

/// `typedAudiences` carry conditions as JSON, legacy `audiences` as a
/// JSON-encoded string
fn deserialize_conditions<'de, D>(
    deserializer: D,
) -> Result<BooleanCondition<AudienceCondition>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Value::deserialize(deserializer)? {
        Value::String(encoded) => serde_json::from_str(&encoded).map_err(D::Error::custom)?,
        value => value,
    };
    BooleanCondition::from_value(value).map_err(D::Error::custom)
}
