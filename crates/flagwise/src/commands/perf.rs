//! Sequential decision workload over generated user ids

use flagwise_core::{Client, DecideOptions, Decision};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};

/// Workload parameters
#[derive(Debug, Clone)]
pub struct PerfConfig {
    pub flag_key: String,
    pub users: u64,
    /// User ids are `{prefix}{i}` for `i` in `0..users`
    pub prefix: String,
}

impl PerfConfig {
    pub fn new() -> Self {
        Self {
            flag_key: "buy_button".to_string(),
            users: 1_000_000,
            prefix: "user".to_string(),
        }
    }
}

impl Default for PerfConfig {
    fn default() -> Self {
        Self::new()
    }
}

struct PerfReport {
    flag_key: String,
    decisions: u64,
    enabled: u64,
    variations: BTreeMap<String, u64>,
    elapsed: Duration,
}

/// Decide the configured flag once per user, in order, handing each result
/// to `on_decision`. Returns the number of decisions made.
pub fn run_decisions<F>(client: &Client, config: &PerfConfig, mut on_decision: F) -> u64
where
    F: FnMut(&str, Decision),
{
    let mut count = 0;
    for i in 0..config.users {
        let user_id = format!("{}{}", config.prefix, i);
        let decision = client.create_user_context(user_id.as_str()).decide(&config.flag_key);
        on_decision(&user_id, decision);
        count += 1;
    }
    count
}

fn measure(client: &Client, config: &PerfConfig) -> PerfReport {
    let mut enabled = 0;
    let mut variations = BTreeMap::new();

    let start = Instant::now();
    let decisions = run_decisions(client, config, |_, decision| {
        if decision.enabled {
            enabled += 1;
        }
        *variations.entry(decision.variation_key).or_insert(0) += 1;
    });
    let elapsed = start.elapsed();

    PerfReport {
        flag_key: config.flag_key.clone(),
        decisions,
        enabled,
        variations,
        elapsed,
    }
}

fn format_report(r: &PerfReport) -> String {
    let seconds = r.elapsed.as_secs_f64();
    let throughput = if seconds > 0.0 {
        r.decisions as f64 / seconds
    } else {
        0.0
    };

    let mut out = format!(
        "Flagwise Perf\n=============\n\
         Flag: {}\n\
         Decisions: {}\n\
         Enabled: {}\n\
         Elapsed: {:.3}s\n\
         Throughput: {:.0} decisions/s\n\n\
         Variations:",
        r.flag_key, r.decisions, r.enabled, seconds, throughput,
    );
    for (variation, count) in &r.variations {
        out.push_str(&format!("\n{:>10}  {}", count, variation));
    }
    out
}

pub fn run(datafile: &Path, sdk_key: Option<&str>, config: &PerfConfig) -> anyhow::Result<()> {
    let client = super::load_datafile(datafile, sdk_key)?
        .with_default_decide_options(DecideOptions {
            disable_decision_event: true,
            ..DecideOptions::default()
        })
        .build()?;

    tracing::info!(flag = %config.flag_key, users = config.users, "starting perf run");
    let report = measure(&client, config);
    println!("{}", format_report(&report));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flagwise_events::InMemoryEventDispatcher;

    const SANDBOX: &str = include_str!("../../../../datafiles/sandbox.json");

    fn client(dispatcher: &InMemoryEventDispatcher) -> Client {
        Client::builder()
            .with_datafile_str(SANDBOX)
            .unwrap()
            .with_event_dispatcher(dispatcher.clone())
            .with_default_decide_options(DecideOptions {
                disable_decision_event: true,
                ..DecideOptions::default()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_one_decision_per_user_in_order() {
        let dispatcher = InMemoryEventDispatcher::new();
        let client = client(&dispatcher);
        let config = PerfConfig {
            users: 25,
            ..PerfConfig::default()
        };

        let mut seen = Vec::new();
        let count = run_decisions(&client, &config, |user_id, decision| {
            assert_eq!(decision.flag_key, "buy_button");
            seen.push(user_id.to_string());
        });

        assert_eq!(count, 25);
        let expected: Vec<_> = (0..25).map(|i| format!("user{i}")).collect();
        assert_eq!(seen, expected);
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn test_zero_users() {
        let dispatcher = InMemoryEventDispatcher::new();
        let config = PerfConfig {
            users: 0,
            ..PerfConfig::default()
        };
        assert_eq!(run_decisions(&client(&dispatcher), &config, |_, _| {}), 0);
    }

    #[test]
    fn test_measure_counts_variations() {
        let dispatcher = InMemoryEventDispatcher::new();
        let config = PerfConfig {
            users: 12,
            ..PerfConfig::default()
        };
        let report = measure(&client(&dispatcher), &config);

        assert_eq!(report.decisions, 12);
        assert_eq!(report.enabled, 12);
        assert_eq!(report.variations.get("primary_blue"), Some(&4));
        assert_eq!(report.variations.get("secondary_gray"), Some(&4));
        assert_eq!(report.variations.get("on"), Some(&4));
    }

    #[test]
    fn test_missing_datafile_fails() {
        let result = run(Path::new("/nonexistent/datafile.json"), None, &PerfConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_report_format() {
        let report = PerfReport {
            flag_key: "buy_button".to_string(),
            decisions: 1_000_000,
            enabled: 1_000_000,
            variations: BTreeMap::from([("on".to_string(), 500_000), ("primary_blue".to_string(), 500_000)]),
            elapsed: Duration::from_secs(2),
        };
        let output = format_report(&report);
        assert!(output.contains("Decisions: 1000000"));
        assert!(output.contains("500000 decisions/s"));
        assert!(output.contains("primary_blue"));
    }
}
