//! Datafile model: flags, experiments, rollouts, audiences and events

mod attributes;
mod audience;
mod audience_condition;
mod condition;
mod datafile;
mod error;
mod event;
mod experiment;
mod flag;
pub mod semver;
mod traffic_allocation;

pub use attributes::{AttributeValue, UserAttributes};
pub use audience::Audience;
pub use audience_condition::{AudienceCondition, MatchType};
pub use condition::BooleanCondition;
pub use datafile::Datafile;
pub use error::DatafileError;
pub use event::Event;
pub use experiment::{Experiment, Rollout, VariableUsage, Variation};
pub use flag::{FeatureFlag, Variable, VariableType};
pub use traffic_allocation::TrafficAllocation;
