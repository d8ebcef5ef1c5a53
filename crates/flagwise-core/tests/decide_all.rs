mod common;

use common::{sandbox_client, ACCOUNT_ID};
use flagwise_core::DecideOptions;
use flagwise_events::Event;

fn enabled_only() -> DecideOptions {
    DecideOptions {
        enabled_flags_only: true,
        ..DecideOptions::default()
    }
}

#[test]
fn test_decide_all_sorted_by_key() {
    let (client, _) = sandbox_client();

    let decisions = client
        .create_user_context("user0")
        .decide_all(&DecideOptions::default());
    let keys: Vec<_> = decisions.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["buy_button", "checkout_redesign", "desktop_banner", "qa_rollout"]
    );
}

#[test]
fn test_decide_all_enabled_flags_only() {
    let (client, _) = sandbox_client();

    let decisions = client.create_user_context("user0").decide_all(&enabled_only());
    let keys: Vec<_> = decisions.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["buy_button"]);
}

#[test]
fn test_decide_for_keys() {
    let (client, _) = sandbox_client();
    let user = client.create_user_context("user2");

    let decisions = user.decide_for_keys(
        &["qa_rollout", "no_such_flag", "buy_button"],
        &DecideOptions::default(),
    );
    assert_eq!(decisions.len(), 3);
    assert!(decisions["qa_rollout"].enabled);
    assert!(!decisions["no_such_flag"].enabled);

    let enabled = user.decide_for_keys(&["qa_rollout", "no_such_flag"], &enabled_only());
    assert_eq!(enabled.len(), 1);
    assert!(enabled.contains_key("qa_rollout"));
}

#[test]
fn test_track_known_event() {
    let (client, dispatcher) = sandbox_client();

    client.create_user_context("user0").track_event("purchase");

    assert_eq!(
        dispatcher.events(),
        vec![Event::conversion(ACCOUNT_ID, "user0", "21545560130", "purchase")]
    );
}

#[test]
fn test_track_unknown_event_is_ignored() {
    let (client, dispatcher) = sandbox_client();

    client.create_user_context("user0").track_event("refund");
    assert!(dispatcher.is_empty());
}
