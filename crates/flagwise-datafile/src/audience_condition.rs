//! Leaf conditions of audience trees and their evaluation against user attributes

use crate::attributes::{AttributeValue, UserAttributes};
use crate::semver;
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;

const CUSTOM_ATTRIBUTE: &str = "custom_attribute";

/// How an attribute is compared against the condition value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Exists,
    Substring,
    Gt,
    Ge,
    Lt,
    Le,
    SemverEq,
    SemverGt,
    SemverGe,
    SemverLt,
    SemverLe,
    #[serde(other)]
    Unknown,
}

/// A single `{"type", "name", "match", "value"}` condition
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AudienceCondition {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    /// Absent match types are legacy conditions and behave as `exact`
    #[serde(rename = "match", default)]
    pub match_type: Option<MatchType>,
    #[serde(default)]
    pub value: Value,
}

impl AudienceCondition {
    pub fn evaluate(&self, attributes: &UserAttributes) -> bool {
        if self.kind != CUSTOM_ATTRIBUTE {
            tracing::warn!(kind = %self.kind, "unsupported audience condition type");
            return false;
        }

        let match_type = self.match_type.unwrap_or(MatchType::Exact);
        let attribute = attributes.get(&self.name).filter(|value| !value.is_null());

        let attribute = match (match_type, attribute) {
            (MatchType::Exists, attribute) => return attribute.is_some(),
            (_, None) => return false,
            (_, Some(attribute)) => attribute,
        };

        match match_type {
            MatchType::Exact | MatchType::Exists => self.exact(attribute),
            MatchType::Substring => match (attribute.as_str(), self.value.as_str()) {
                (Some(haystack), Some(needle)) => haystack.contains(needle),
                _ => false,
            },
            MatchType::Gt => self.numeric(attribute).is_some_and(Ordering::is_gt),
            MatchType::Ge => self.numeric(attribute).is_some_and(Ordering::is_ge),
            MatchType::Lt => self.numeric(attribute).is_some_and(Ordering::is_lt),
            MatchType::Le => self.numeric(attribute).is_some_and(Ordering::is_le),
            MatchType::SemverEq => self.semver(attribute).is_some_and(Ordering::is_eq),
            MatchType::SemverGt => self.semver(attribute).is_some_and(Ordering::is_gt),
            MatchType::SemverGe => self.semver(attribute).is_some_and(Ordering::is_ge),
            MatchType::SemverLt => self.semver(attribute).is_some_and(Ordering::is_lt),
            MatchType::SemverLe => self.semver(attribute).is_some_and(Ordering::is_le),
            MatchType::Unknown => {
                tracing::warn!(name = %self.name, "unrecognized match type in audience condition");
                false
            }
        }
    }

    fn exact(&self, attribute: &AttributeValue) -> bool {
        match &self.value {
            Value::Bool(expected) => attribute.as_bool() == Some(*expected),
            Value::String(expected) => attribute.as_str() == Some(expected.as_str()),
            Value::Number(_) => self.numeric(attribute).is_some_and(Ordering::is_eq),
            _ => false,
        }
    }

    /// Compare the attribute to the condition value; `None` when either side
    /// is not a number or the values are incomparable (NaN)
    fn numeric(&self, attribute: &AttributeValue) -> Option<Ordering> {
        let Value::Number(expected) = &self.value else {
            return None;
        };
        if let (Some(actual), Some(expected)) = (attribute.as_i64(), expected.as_i64()) {
            return Some(actual.cmp(&expected));
        }
        attribute.as_f64()?.partial_cmp(&expected.as_f64()?)
    }

    fn semver(&self, attribute: &AttributeValue) -> Option<Ordering> {
        semver::compare(attribute.as_str()?, self.value.as_str()?)
    }
}
