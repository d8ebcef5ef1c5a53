//! Boolean condition trees as encoded in datafiles
//!
//! Conditions are nested JSON arrays whose first element is an operator:
//! `["and", ["or", {...}, {...}], ["not", {...}]]`. An array without an
//! operator is treated as an implicit `or`.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum BooleanCondition<T> {
    And(Vec<BooleanCondition<T>>),
    Or(Vec<BooleanCondition<T>>),
    Not(Option<Box<BooleanCondition<T>>>),
    Single(T),
}

impl<T: DeserializeOwned> BooleanCondition<T> {
    /// Build a condition tree from an already parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let Value::Array(items) = value else {
            return Ok(BooleanCondition::Single(serde_json::from_value(value)?));
        };

        let mut items = items.into_iter();
        let Some(first) = items.next() else {
            return Ok(BooleanCondition::And(Vec::new()));
        };

        match first.as_str() {
            Some("and") => Ok(BooleanCondition::And(Self::collect(items)?)),
            Some("or") => Ok(BooleanCondition::Or(Self::collect(items)?)),
            Some("not") => {
                let operand = items.next().map(Self::from_value).transpose()?;
                Ok(BooleanCondition::Not(operand.map(Box::new)))
            }
            _ => {
                let mut operands = vec![Self::from_value(first)?];
                operands.extend(Self::collect(items)?);
                Ok(BooleanCondition::Or(operands))
            }
        }
    }

    fn collect(items: impl Iterator<Item = Value>) -> Result<Vec<Self>, serde_json::Error> {
        items.map(Self::from_value).collect()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for BooleanCondition<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        BooleanCondition::from_value(value).map_err(D::Error::custom)
    }
}

impl<T> BooleanCondition<T> {
    /// Evaluate the tree, delegating leaves to `evaluator`
    pub fn evaluate<E>(&self, evaluator: &E) -> bool
    where
        E: Fn(&T) -> bool,
    {
        match self {
            BooleanCondition::And(conditions) => conditions.iter().all(|c| c.evaluate(evaluator)),
            BooleanCondition::Or(conditions) => conditions.iter().any(|c| c.evaluate(evaluator)),
            BooleanCondition::Not(Some(condition)) => !condition.evaluate(evaluator),
            BooleanCondition::Not(None) => false,
            BooleanCondition::Single(leaf) => evaluator(leaf),
        }
    }

    /// True when the tree contains no operands at its root
    pub fn is_empty(&self) -> bool {
        match self {
            BooleanCondition::And(conditions) | BooleanCondition::Or(conditions) => {
                conditions.is_empty()
            }
            BooleanCondition::Not(condition) => condition.is_none(),
            BooleanCondition::Single(_) => false,
        }
    }
}
