mod common;

use common::{sandbox_client, sandbox_client_with_options, with_reasons, ACCOUNT_ID};
use flagwise_core::DecideOptions;
use flagwise_events::Event;
use serde_json::json;

#[test]
fn test_experiment_variations_by_bucket() {
    let (client, _) = sandbox_client();

    let expected = [
        ("user0", "primary_blue"),
        ("user1", "primary_blue"),
        ("user3", "secondary_gray"),
        ("user7", "secondary_gray"),
        ("user8", "primary_blue"),
        ("user9", "secondary_gray"),
    ];
    for (user_id, variation_key) in expected {
        let decision = client.create_user_context(user_id).decide("buy_button");
        assert!(decision.enabled, "{user_id} should be enabled");
        assert_eq!(decision.variation_key, variation_key, "{user_id}");
        assert_eq!(decision.rule_key.as_deref(), Some("buy_button_test"));
    }
}

#[test]
fn test_unallocated_traffic_falls_through_to_rollout() {
    let (client, dispatcher) = sandbox_client();

    for user_id in ["user4", "user5", "user6", "user10"] {
        let decision = client.create_user_context(user_id).decide("buy_button");
        assert!(decision.enabled);
        assert_eq!(decision.variation_key, "on");
        assert_eq!(decision.rule_key.as_deref(), Some("buy_button_everyone_else"));
    }
    // Rollouts never dispatch decision events
    assert!(dispatcher.is_empty());
}

#[test]
fn test_decision_event_dispatched() {
    let (client, dispatcher) = sandbox_client();

    client.create_user_context("user0").decide("buy_button");

    assert_eq!(
        dispatcher.events(),
        vec![Event::decision(
            ACCOUNT_ID,
            "user0",
            "9300000101953",
            "9300000133039",
            "87757"
        )]
    );
}

#[test]
fn test_disable_decision_event_per_call() {
    let (client, dispatcher) = sandbox_client();
    let options = DecideOptions {
        disable_decision_event: true,
        ..DecideOptions::default()
    };

    let decision = client
        .create_user_context("user0")
        .decide_with_options("buy_button", &options);
    assert_eq!(decision.variation_key, "primary_blue");
    assert!(dispatcher.is_empty());
}

#[test]
fn test_disable_decision_event_by_default() {
    let (client, dispatcher) = sandbox_client_with_options(DecideOptions {
        disable_decision_event: true,
        ..DecideOptions::default()
    });

    for i in 0..100 {
        client.create_user_context(format!("user{i}")).decide("buy_button");
    }
    assert!(dispatcher.is_empty());
}

#[test]
fn test_forced_variation_wins_over_bucketing() {
    let (client, dispatcher) = sandbox_client();

    let decision = client
        .create_user_context("forced_user")
        .decide_with_options("buy_button", &with_reasons());
    assert_eq!(decision.variation_key, "secondary_gray");
    assert!(decision.reasons.iter().any(|r| r.contains("forced")));

    let events = dispatcher.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], Event::Decision { variation_id, .. } if variation_id == "87758"));
}

#[test]
fn test_paused_experiment_is_skipped() {
    let (client, dispatcher) = sandbox_client();

    // The forced variation of a paused experiment does not apply either
    for user_id in ["user0", "forced_user"] {
        let decision = client
            .create_user_context(user_id)
            .decide_with_options("checkout_redesign", &with_reasons());
        assert!(!decision.enabled);
        assert_eq!(decision.variation_key, "off");
        assert_eq!(decision.rule_key, None);
        assert!(decision.reasons.iter().any(|r| r.contains("not running")));
    }
    assert!(dispatcher.is_empty());
}

#[test]
fn test_variation_variables_override_defaults() {
    let (client, _) = sandbox_client();

    let blue = client.create_user_context("user0").decide("buy_button");
    assert_eq!(blue.variable("color"), Some(&json!("blue")));

    let gray = client.create_user_context("user3").decide("buy_button");
    assert_eq!(gray.variable("color"), Some(&json!("gray")));

    // The rollout variation has no override
    let rollout = client.create_user_context("user4").decide("buy_button");
    assert_eq!(rollout.variable("color"), Some(&json!("green")));
}

#[test]
fn test_exclude_variables() {
    let (client, _) = sandbox_client();
    let options = DecideOptions {
        exclude_variables: true,
        ..DecideOptions::default()
    };

    let decision = client
        .create_user_context("user0")
        .decide_with_options("buy_button", &options);
    assert!(decision.variables.is_empty());
}

#[test]
fn test_unknown_flag_is_off() {
    let (client, dispatcher) = sandbox_client();

    let decision = client
        .create_user_context("user0")
        .decide_with_options("no_such_flag", &with_reasons());
    assert_eq!(decision.flag_key, "no_such_flag");
    assert!(!decision.enabled);
    assert_eq!(decision.variation_key, "off");
    assert_eq!(decision.reasons.len(), 1);
    assert!(dispatcher.is_empty());
}

#[test]
fn test_reasons_only_when_requested() {
    let (client, _) = sandbox_client();
    let user = client.create_user_context("user0");

    assert!(user.decide("buy_button").reasons.is_empty());
    assert!(!user
        .decide_with_options("buy_button", &with_reasons())
        .reasons
        .is_empty());
}

#[test]
fn test_decisions_are_deterministic() {
    let (client, _) = sandbox_client();

    for i in 0..50 {
        let user = client.create_user_context(format!("user{i}"));
        assert_eq!(user.decide("buy_button"), user.decide("buy_button"));
    }
}
