//! Per-user decisions and event tracking
//!
//! A flag is decided by walking its experiments in order, then the rules of
//! its rollout. The first variation found wins; otherwise the flag is off.

use crate::bucketing::bucket_value;
use crate::client::Client;
use crate::decide_options::DecideOptions;
use crate::decision::{Decision, Reasons};
use flagwise_datafile::{AttributeValue, Experiment, FeatureFlag, UserAttributes, Variation};
use flagwise_events::Event;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A user with attributes, bound to a client
pub struct UserContext<'a> {
    client: &'a Client,
    user_id: String,
    attributes: UserAttributes,
}

/// Variation picked for a flag and the rule that picked it
struct Selection<'d> {
    rule: &'d Experiment,
    variation: &'d Variation,
}

impl<'a> UserContext<'a> {
    pub(crate) fn new(client: &'a Client, user_id: String, attributes: UserAttributes) -> Self {
        Self {
            client,
            user_id,
            attributes,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn attributes(&self) -> &UserAttributes {
        &self.attributes
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Decide `flag_key` with the client's default options
    pub fn decide(&self, flag_key: &str) -> Decision {
        self.decide_with_options(flag_key, &DecideOptions::default())
    }

    /// Decide `flag_key`; `options` are combined with the client defaults
    pub fn decide_with_options(&self, flag_key: &str, options: &DecideOptions) -> Decision {
        let options = self.client.default_decide_options().merge(options);
        let mut reasons = Reasons::new(options.include_reasons);

        let Some(flag) = self.client.datafile().flag(flag_key) else {
            reasons.push(|| format!("No flag was found for key \"{flag_key}\"."));
            let mut decision = Decision::off(flag_key);
            decision.reasons = reasons.into_vec();
            return decision;
        };

        let selection = match self.experiment_selection(flag, &mut reasons) {
            Some(selection) => {
                if !options.disable_decision_event {
                    self.dispatch_decision(&selection);
                }
                Some(selection)
            }
            None => self.rollout_selection(flag, &mut reasons),
        };

        let mut decision = match &selection {
            Some(selection) => Decision {
                flag_key: flag.key.clone(),
                enabled: selection.variation.feature_enabled,
                variation_key: selection.variation.key.clone(),
                rule_key: Some(selection.rule.key.clone()),
                variables: Map::new(),
                reasons: Vec::new(),
            },
            None => {
                reasons.push(|| {
                    format!("User \"{}\" did not match any rule of flag \"{flag_key}\".", self.user_id)
                });
                Decision::off(flag_key)
            }
        };

        if !options.exclude_variables {
            let variation = selection
                .as_ref()
                .map(|selection| selection.variation)
                .filter(|variation| variation.feature_enabled);
            decision.variables = variables(flag, variation);
        }
        decision.reasons = reasons.into_vec();
        decision
    }

    /// Decide every flag in the datafile, keyed and ordered by flag key
    pub fn decide_all(&self, options: &DecideOptions) -> BTreeMap<String, Decision> {
        let keys: Vec<&str> = self
            .client
            .datafile()
            .flags()
            .into_iter()
            .map(|flag| flag.key.as_str())
            .collect();
        self.decide_for_keys(&keys, options)
    }

    pub fn decide_for_keys(&self, keys: &[&str], options: &DecideOptions) -> BTreeMap<String, Decision> {
        let enabled_only = self.client.default_decide_options().merge(options).enabled_flags_only;
        keys.iter()
            .map(|key| self.decide_with_options(key, options))
            .filter(|decision| !enabled_only || decision.enabled)
            .map(|decision| (decision.flag_key.clone(), decision))
            .collect()
    }

    /// Dispatch a conversion event for `event_key`; unknown keys are ignored
    pub fn track_event(&self, event_key: &str) {
        let datafile = self.client.datafile();
        let Some(event) = datafile.event(event_key) else {
            tracing::warn!(event = %event_key, "event key not found in datafile, not tracking");
            return;
        };
        self.client.dispatch(Event::conversion(
            datafile.account_id(),
            &self.user_id,
            &event.id,
            &event.key,
        ));
    }

    fn experiment_selection(&self, flag: &'a FeatureFlag, reasons: &mut Reasons) -> Option<Selection<'a>> {
        let datafile = self.client.datafile();

        for experiment_id in &flag.experiment_ids {
            let Some(experiment) = datafile.experiment(experiment_id) else {
                continue;
            };
            if !experiment.is_running() {
                reasons.push(|| format!("Experiment \"{}\" is not running.", experiment.key));
                continue;
            }
            if let Some(variation) = experiment.forced_variation(&self.user_id) {
                reasons.push(|| {
                    format!(
                        "User \"{}\" is forced into variation \"{}\" of experiment \"{}\".",
                        self.user_id, variation.key, experiment.key
                    )
                });
                return Some(Selection {
                    rule: experiment,
                    variation,
                });
            }
            if !datafile.audiences_match(experiment, &self.attributes) {
                reasons.push(|| {
                    format!(
                        "User \"{}\" does not meet the audience conditions of experiment \"{}\".",
                        self.user_id, experiment.key
                    )
                });
                continue;
            }
            if let Some(variation) = self.bucket(experiment) {
                reasons.push(|| {
                    format!(
                        "User \"{}\" is in variation \"{}\" of experiment \"{}\".",
                        self.user_id, variation.key, experiment.key
                    )
                });
                return Some(Selection {
                    rule: experiment,
                    variation,
                });
            }
            reasons.push(|| {
                format!(
                    "User \"{}\" is not in any variation of experiment \"{}\".",
                    self.user_id, experiment.key
                )
            });
        }
        None
    }

    fn rollout_selection(&self, flag: &'a FeatureFlag, reasons: &mut Reasons) -> Option<Selection<'a>> {
        let datafile = self.client.datafile();
        let rollout = datafile.rollout(flag.rollout_id()?)?;
        let (everyone_else, targeted) = rollout.experiments.split_last()?;

        for rule in targeted {
            if !datafile.audiences_match(rule, &self.attributes) {
                reasons.push(|| {
                    format!(
                        "User \"{}\" does not meet the audience conditions of rule \"{}\".",
                        self.user_id, rule.key
                    )
                });
                continue;
            }
            if let Some(variation) = self.bucket(rule) {
                reasons.push(|| format!("User \"{}\" is bucketed into rule \"{}\".", self.user_id, rule.key));
                return Some(Selection { rule, variation });
            }
            // Audience matched but traffic did not: skip straight to everyone else
            reasons.push(|| {
                format!(
                    "User \"{}\" is not bucketed into rule \"{}\", falling back to everyone else.",
                    self.user_id, rule.key
                )
            });
            break;
        }

        if !datafile.audiences_match(everyone_else, &self.attributes) {
            reasons.push(|| {
                format!(
                    "User \"{}\" does not meet the audience conditions of rule \"{}\".",
                    self.user_id, everyone_else.key
                )
            });
            return None;
        }
        let variation = self.bucket(everyone_else)?;
        reasons.push(|| {
            format!(
                "User \"{}\" is bucketed into rule \"{}\".",
                self.user_id, everyone_else.key
            )
        });
        Some(Selection {
            rule: everyone_else,
            variation,
        })
    }

    fn bucket(&self, experiment: &'a Experiment) -> Option<&'a Variation> {
        let bucket = bucket_value(&self.user_id, &experiment.id);
        let variation_id = experiment.traffic_allocation.variation(bucket)?;
        let variation = experiment.variation(variation_id);
        if variation.is_none() {
            tracing::warn!(
                experiment = %experiment.key,
                variation = %variation_id,
                "traffic allocated to unknown variation"
            );
        }
        variation
    }

    fn dispatch_decision(&self, selection: &Selection<'_>) {
        tracing::debug!(
            user = %self.user_id,
            experiment = %selection.rule.key,
            variation = %selection.variation.key,
            "dispatching decision event"
        );
        self.client.dispatch(Event::decision(
            self.client.datafile().account_id(),
            &self.user_id,
            &selection.rule.layer_id,
            &selection.rule.id,
            &selection.variation.id,
        ));
    }
}

/// Typed variable values: flag defaults, overridden by the variation when it
/// has the feature enabled
fn variables(flag: &FeatureFlag, variation: Option<&Variation>) -> Map<String, Value> {
    let mut values = Map::new();
    for variable in &flag.variables {
        let raw = variation
            .and_then(|variation| variation.variable_value(&variable.id))
            .unwrap_or(variable.default_value.as_str());
        let value = variable.parse(raw).or_else(|| {
            tracing::warn!(flag = %flag.key, variable = %variable.key, value = %raw, "unparsable variable value");
            variable.default()
        });
        if let Some(value) = value {
            values.insert(variable.key.clone(), value);
        }
    }
    values
}
