//! Parsed and indexed datafile

use crate::attributes::UserAttributes;
use crate::audience::Audience;
use crate::error::DatafileError;
use crate::event::Event;
use crate::experiment::{Experiment, Rollout};
use crate::flag::FeatureFlag;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Wire shape of a datafile, before indexing
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDatafile {
    account_id: String,
    #[serde(default)]
    project_id: String,
    #[serde(default)]
    environment_key: String,
    #[serde(default)]
    sdk_key: String,
    revision: String,
    #[serde(default)]
    bot_filtering: bool,
    #[serde(default)]
    typed_audiences: Vec<Audience>,
    #[serde(default)]
    audiences: Vec<Audience>,
    #[serde(default)]
    events: Vec<Event>,
    experiments: Vec<Experiment>,
    rollouts: Vec<Rollout>,
    feature_flags: Vec<FeatureFlag>,
    #[serde(default)]
    groups: Vec<RawGroup>,
}

/// Mutual-exclusion group; only member ids are read
#[derive(Deserialize)]
struct RawGroup {
    #[serde(default)]
    experiments: Vec<GroupMember>,
}

#[derive(Deserialize)]
struct GroupMember {
    id: String,
}

/// Flags, experiments, rollouts, audiences and events of one project revision
#[derive(Debug, Clone)]
pub struct Datafile {
    account_id: String,
    project_id: String,
    environment_key: String,
    sdk_key: String,
    revision: u32,
    bot_filtering: bool,
    flags: HashMap<String, FeatureFlag>,
    experiments: HashMap<String, Experiment>,
    rollouts: HashMap<String, Rollout>,
    audiences: HashMap<String, Audience>,
    events: HashMap<String, Event>,
}

impl Datafile {
    /// Parse a JSON datafile, index its collections and validate that every
    /// flag references known experiments and rollouts
    pub fn build(content: &str) -> Result<Datafile, DatafileError> {
        let raw: RawDatafile = serde_json::from_str(content)?;

        let revision = raw
            .revision
            .parse::<u32>()
            .map_err(|_| DatafileError::InvalidRevision(raw.revision.clone()))?;

        let mut audiences = HashMap::new();
        for audience in raw.typed_audiences.into_iter().chain(raw.audiences) {
            audiences.entry(audience.id.clone()).or_insert(audience);
        }

        let experiments: HashMap<_, _> = raw
            .experiments
            .into_iter()
            .map(|experiment| (experiment.id.clone(), experiment))
            .collect();
        let rollouts: HashMap<_, _> = raw
            .rollouts
            .into_iter()
            .map(|rollout| (rollout.id.clone(), rollout))
            .collect();
        let events = raw
            .events
            .into_iter()
            .map(|event| (event.key.clone(), event))
            .collect();

        let grouped: HashSet<String> = raw
            .groups
            .into_iter()
            .flat_map(|group| group.experiments)
            .map(|member| member.id)
            .filter(|id| !experiments.contains_key(id))
            .collect();

        let mut flags = HashMap::new();
        for mut flag in raw.feature_flags {
            if let Some(rollout_id) = flag.rollout_id() {
                if !rollouts.contains_key(rollout_id) {
                    let rollout = rollout_id.to_string();
                    return Err(DatafileError::UnknownRollout {
                        flag: flag.key,
                        rollout,
                    });
                }
            }
            flag.experiment_ids.retain(|id| {
                let keep = !grouped.contains(id);
                if !keep {
                    tracing::warn!(flag = %flag.key, experiment = %id, "skipping experiment in mutual-exclusion group");
                }
                keep
            });
            if let Some(missing) = flag
                .experiment_ids
                .iter()
                .find(|id| !experiments.contains_key(id.as_str()))
            {
                return Err(DatafileError::UnknownExperiment {
                    experiment: missing.clone(),
                    flag: flag.key,
                });
            }
            flags.insert(flag.key.clone(), flag);
        }

        tracing::debug!(
            revision,
            flags = flags.len(),
            experiments = experiments.len(),
            audiences = audiences.len(),
            "datafile loaded"
        );

        Ok(Datafile {
            account_id: raw.account_id,
            project_id: raw.project_id,
            environment_key: raw.environment_key,
            sdk_key: raw.sdk_key,
            revision,
            bot_filtering: raw.bot_filtering,
            flags,
            experiments,
            rollouts,
            audiences,
            events,
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn environment_key(&self) -> &str {
        &self.environment_key
    }

    pub fn sdk_key(&self) -> &str {
        &self.sdk_key
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn bot_filtering(&self) -> bool {
        self.bot_filtering
    }

    pub fn flag(&self, flag_key: &str) -> Option<&FeatureFlag> {
        self.flags.get(flag_key)
    }

    /// All flags, sorted by key
    pub fn flags(&self) -> Vec<&FeatureFlag> {
        let mut flags: Vec<_> = self.flags.values().collect();
        flags.sort_by(|a, b| a.key.cmp(&b.key));
        flags
    }

    pub fn experiment(&self, experiment_id: &str) -> Option<&Experiment> {
        self.experiments.get(experiment_id)
    }

    pub fn rollout(&self, rollout_id: &str) -> Option<&Rollout> {
        self.rollouts.get(rollout_id)
    }

    pub fn audience(&self, audience_id: &str) -> Option<&Audience> {
        self.audiences.get(audience_id)
    }

    pub fn event(&self, event_key: &str) -> Option<&Event> {
        self.events.get(event_key)
    }

    /// Whether a user with `attributes` belongs to the audiences of `experiment`.
    /// Unknown audience ids never match.
    pub fn audiences_match(&self, experiment: &Experiment, attributes: &UserAttributes) -> bool {
        experiment.audiences_match(|audience_id| match self.audience(audience_id) {
            Some(audience) => audience.evaluate(attributes),
            None => {
                tracing::warn!(audience = %audience_id, experiment = %experiment.key, "unknown audience");
                false
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeValue;
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({
            "accountId": "21537940595",
            "projectId": "21537940595",
            "revision": "73",
            "anonymizeIP": true,
            "typedAudiences": [{
                "id": "100",
                "name": "Employees",
                "conditions": ["or", {"type": "custom_attribute", "name": "is_employee", "match": "exact", "value": true}]
            }],
            "audiences": [
                {"id": "100", "name": "legacy shadow", "conditions": "[\"or\"]"},
                {"id": "$opt_dummy_audience", "name": "dummy", "conditions": "[\"or\", {\"type\": \"custom_attribute\", \"name\": \"$opt_dummy_attribute\", \"value\": \"x\"}]"}
            ],
            "events": [{"id": "21545560130", "key": "purchase", "experimentIds": []}],
            "experiments": [{
                "id": "9300000133039",
                "key": "buy_button_test",
                "layerId": "9300000101953",
                "audienceIds": ["100"],
                "trafficAllocation": [{"entityId": "87757", "endOfRange": 10000}],
                "variations": [{"id": "87757", "key": "primary_blue"}]
            }],
            "rollouts": [{"id": "9300000007569", "experiments": []}],
            "featureFlags": [
                {"id": "1", "key": "zeta", "rolloutId": "", "experimentIds": []},
                {"id": "2", "key": "buy_button", "rolloutId": "9300000007569", "experimentIds": ["9300000133039"]}
            ]
        })
    }

    fn build(value: serde_json::Value) -> Result<Datafile, DatafileError> {
        Datafile::build(&value.to_string())
    }

    #[test]
    fn test_build_indexes_collections() {
        let datafile = build(minimal()).unwrap();

        assert_eq!(datafile.account_id(), "21537940595");
        assert_eq!(datafile.revision(), 73);
        assert!(!datafile.bot_filtering());
        assert_eq!(datafile.flag("buy_button").unwrap().id, "2");
        assert_eq!(datafile.experiment("9300000133039").unwrap().key, "buy_button_test");
        assert!(datafile.rollout("9300000007569").is_some());
        assert_eq!(datafile.event("purchase").unwrap().id, "21545560130");
        assert!(datafile.flag("missing").is_none());
    }

    #[test]
    fn test_flags_sorted_by_key() {
        let datafile = build(minimal()).unwrap();
        let keys: Vec<_> = datafile.flags().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["buy_button", "zeta"]);
    }

    #[test]
    fn test_typed_audience_wins_over_legacy() {
        let datafile = build(minimal()).unwrap();
        assert_eq!(datafile.audience("100").unwrap().name, "Employees");
        assert!(datafile.audience("$opt_dummy_audience").is_some());
    }

    #[test]
    fn test_audiences_match() {
        let datafile = build(minimal()).unwrap();
        let experiment = datafile.experiment("9300000133039").unwrap();

        let mut attributes = UserAttributes::new();
        assert!(!datafile.audiences_match(experiment, &attributes));
        attributes.insert("is_employee".to_string(), AttributeValue::Bool(true));
        assert!(datafile.audiences_match(experiment, &attributes));
    }

    #[test]
    fn test_unknown_audience_never_matches() {
        let mut value = minimal();
        value["experiments"][0]["audienceIds"] = json!(["404"]);
        let datafile = build(value).unwrap();
        let experiment = datafile.experiment("9300000133039").unwrap();
        assert!(!datafile.audiences_match(experiment, &UserAttributes::new()));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Datafile::build("{not json"),
            Err(DatafileError::InvalidJson(_))
        ));
        assert!(matches!(Datafile::build("{}"), Err(DatafileError::InvalidJson(_))));
    }

    #[test]
    fn test_null_collection_is_invalid() {
        let mut value = minimal();
        value["featureFlags"] = serde_json::Value::Null;
        assert!(matches!(build(value), Err(DatafileError::InvalidJson(_))));
    }

    #[test]
    fn test_invalid_revision() {
        let mut value = minimal();
        value["revision"] = json!("seventy-three");
        assert!(matches!(
            build(value),
            Err(DatafileError::InvalidRevision(ref r)) if r == "seventy-three"
        ));
    }

    #[test]
    fn test_unknown_rollout() {
        let mut value = minimal();
        value["featureFlags"][1]["rolloutId"] = json!("404");
        assert!(matches!(
            build(value),
            Err(DatafileError::UnknownRollout { ref flag, ref rollout }) if flag == "buy_button" && rollout == "404"
        ));
    }

    #[test]
    fn test_unknown_experiment() {
        let mut value = minimal();
        value["featureFlags"][0]["experimentIds"] = json!(["404"]);
        assert!(matches!(
            build(value),
            Err(DatafileError::UnknownExperiment { ref flag, ref experiment }) if flag == "zeta" && experiment == "404"
        ));
    }

    #[test]
    fn test_grouped_experiments_are_skipped() {
        let mut value = minimal();
        value["groups"] = json!([{
            "id": "19228",
            "policy": "random",
            "experiments": [{"id": "9300000500001", "key": "grouped_test"}]
        }]);
        value["featureFlags"][0]["experimentIds"] = json!(["9300000500001"]);
        value["featureFlags"][1]["experimentIds"] = json!(["9300000500001", "9300000133039"]);

        let datafile = build(value).unwrap();
        assert!(datafile.flag("zeta").unwrap().experiment_ids.is_empty());
        assert_eq!(
            datafile.flag("buy_button").unwrap().experiment_ids,
            vec!["9300000133039".to_string()]
        );
        assert!(datafile.experiment("9300000500001").is_none());
    }

    #[test]
    fn test_groups_do_not_hide_unknown_experiments() {
        let mut value = minimal();
        value["groups"] = json!([{"id": "19228", "experiments": [{"id": "9300000500001"}]}]);
        value["featureFlags"][0]["experimentIds"] = json!(["404"]);
        assert!(matches!(
            build(value),
            Err(DatafileError::UnknownExperiment { ref experiment, .. }) if experiment == "404"
        ));
    }
}
