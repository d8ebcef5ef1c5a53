use flagwise_core::{AttributeValue, Client, DecideOptions, Decision, UserAttributes};
use flagwise_events::{Event, InMemoryEventDispatcher, Payload};
use serde_json::{json, Value};
use std::path::Path;

/// Decision plus the Event API body its events would produce
fn render(decision: &Decision, account_id: &str, events: Vec<Event>) -> anyhow::Result<Value> {
    let payload = if events.is_empty() {
        Value::Null
    } else {
        let mut payload = Payload::new(account_id);
        for event in events {
            payload.add_event(event)?;
        }
        serde_json::to_value(&payload)?
    };
    Ok(json!({
        "decision": decision,
        "payload": payload,
    }))
}

fn decide(client: &Client, flag: &str, user: &str, attributes: UserAttributes, reasons: bool) -> Decision {
    let options = DecideOptions {
        include_reasons: reasons,
        ..DecideOptions::default()
    };
    client
        .create_user_context_with_attributes(user, attributes)
        .decide_with_options(flag, &options)
}

pub fn run(
    datafile: &Path,
    flag: &str,
    user: &str,
    attributes: Vec<(String, AttributeValue)>,
    reasons: bool,
) -> anyhow::Result<()> {
    // Events are recorded, never sent
    let dispatcher = InMemoryEventDispatcher::new();
    let client = super::load_datafile(datafile, None)?
        .with_event_dispatcher(dispatcher.clone())
        .build()?;

    let decision = decide(&client, flag, user, attributes.into_iter().collect(), reasons);
    let output = render(&decision, client.datafile().account_id(), dispatcher.events())?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
