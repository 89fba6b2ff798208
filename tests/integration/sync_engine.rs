//! Conversation sync engine against the in-memory backend
//!
//! Runs on a paused clock: poll ticks fire every 2 s after a selection, the
//! delivered timer 1 s after a confirmed send.

use pretty_assertions::assert_eq;
use std::sync::Arc;

use wachat::egui_app::api::MessagingApi;
use wachat::egui_app::messaging::conversation_sync::SEND_FAILED_MESSAGE;
use wachat::egui_app::messaging::{ConversationSync, SyncPhase, ViewEvent};
use wachat::egui_app::ClientError;
use wachat::shared::messaging::{DeliveryState, Message, MessageId};
use wachat::shared::ValidationError;

use crate::common::*;
use crate::{assert_err, assert_ok};

fn ids(messages: &[Message]) -> Vec<&str> {
    messages.iter().map(|m| m.id.as_str()).collect()
}

fn seeded_api() -> Arc<FakeApi> {
    let api = FakeApi::new();
    api.add_message(message("m1", "42", ME, "salut", 10));
    api.add_message(message("m2", ME, "42", "ça va ?", 20));
    api.add_message(message("m3", "42", ME, "oui", 30));
    api.add_message(message("b1", "43", ME, "hey", 15));
    api.add_message(message("x1", "42", "8", "not for me", 12));
    api
}

async fn engine_for(api: &Arc<FakeApi>) -> ConversationSync {
    let engine = ConversationSync::new(&context(api.clone()));
    engine.attach_user(ME.into()).await;
    engine
}

async fn live_engine(api: &Arc<FakeApi>, peer: &str) -> ConversationSync {
    let engine = engine_for(api).await;
    assert_ok!(engine.select(peer.into()).await);
    engine
}

#[tokio::test(start_paused = true)]
async fn test_select_loads_both_directions_in_time_order() {
    let api = seeded_api();
    let engine = live_engine(&api, "42").await;

    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.phase, SyncPhase::Live);
    assert_eq!(snapshot.active_contact, Some("42".into()));
    assert_eq!(ids(&snapshot.messages), vec!["m1", "m2", "m3"]);
    assert!(engine.is_polling());

    let listed = api.count(|c| matches!(c, Call::ListMessages { .. }));
    assert_eq!(listed, 2);
}

#[tokio::test(start_paused = true)]
async fn test_select_marks_peer_messages_read() {
    let api = seeded_api();
    let engine = live_engine(&api, "42").await;

    let marked: Vec<Call> = api
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::UpdateDeliveryState(..)))
        .collect();
    assert_eq!(
        marked,
        vec![
            Call::UpdateDeliveryState("m1".into(), DeliveryState::Read),
            Call::UpdateDeliveryState("m3".into(), DeliveryState::Read),
        ]
    );

    let snapshot = engine.snapshot().await;
    let states: Vec<DeliveryState> = snapshot.messages.iter().map(|m| m.delivery_state).collect();
    assert_eq!(
        states,
        vec![DeliveryState::Read, DeliveryState::Sent, DeliveryState::Read]
    );
}

#[tokio::test(start_paused = true)]
async fn test_send_lifecycle_sending_sent_delivered() {
    let api = FakeApi::new();
    api.set_post_delay(ms(500));
    api.set_next_message_id("m100");
    let engine = live_engine(&api, "42").await;
    let mut events = engine.subscribe();

    let sender = engine.clone();
    let send = tokio::spawn(async move { sender.send("hello").await });

    tokio::time::sleep(ms(100)).await;
    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.messages.len(), 1);
    let bubble = &snapshot.messages[0];
    assert!(bubble.id.is_temporary());
    assert_eq!(bubble.delivery_state, DeliveryState::Sending);
    assert_eq!(bubble.body, "hello");
    assert_eq!(bubble.sender_id, ME.into());
    assert_eq!(bubble.recipient_id, "42".into());
    let temp_id = bubble.id.clone();

    let sent = assert_ok!(send.await.unwrap());
    assert_eq!(sent.id, MessageId::from("m100"));
    assert_eq!(sent.delivery_state, DeliveryState::Sent);

    let snapshot = engine.snapshot().await;
    assert_eq!(ids(&snapshot.messages), vec!["m100"]);
    assert_eq!(snapshot.messages[0].delivery_state, DeliveryState::Sent);
    assert_eq!(engine.pending_timers(), 1);

    tokio::time::sleep(ms(1_100)).await;
    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.messages[0].delivery_state, DeliveryState::Delivered);
    assert_eq!(engine.pending_timers(), 0);

    // the backend still stores "sending"; the poll must not move it back
    tokio::time::sleep(ms(600)).await;
    let snapshot = engine.snapshot().await;
    assert_eq!(ids(&snapshot.messages), vec!["m100"]);
    assert_eq!(snapshot.messages[0].delivery_state, DeliveryState::Delivered);

    let events = drain(&mut events);
    assert!(events.contains(&ViewEvent::Rebound {
        from: temp_id,
        to: "m100".into(),
    }));
    assert!(events.contains(&ViewEvent::StateChanged {
        id: "m100".into(),
        state: DeliveryState::Delivered,
    }));
    let rendered = events
        .iter()
        .filter(|e| matches!(e, ViewEvent::Rendered { .. }))
        .count();
    assert_eq!(rendered, 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_post_keeps_bubble_and_shows_inline_error() {
    let api = FakeApi::new();
    api.set_fail_posts(true);
    let engine = live_engine(&api, "42").await;

    let result = engine.send("hello").await;
    assert_err!(result, ClientError::Server { status: 500, .. });

    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.messages.len(), 1);
    assert!(snapshot.messages[0].id.is_temporary());
    assert_eq!(snapshot.messages[0].delivery_state, DeliveryState::Failed);
    assert_eq!(snapshot.inline_error.as_deref(), Some(SEND_FAILED_MESSAGE));
    assert_eq!(engine.pending_timers(), 0);

    tokio::time::sleep(ms(5_100)).await;
    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.inline_error, None);
    assert_eq!(snapshot.messages[0].delivery_state, DeliveryState::Failed);
}

#[tokio::test(start_paused = true)]
async fn test_resend_replaces_failed_bubble() {
    let api = FakeApi::new();
    api.set_fail_posts(true);
    let engine = live_engine(&api, "42").await;
    assert_err!(engine.send("hello").await);
    let failed = engine.snapshot().await.messages[0].id.clone();

    api.set_fail_posts(false);
    api.set_next_message_id("m100");
    let sent = assert_ok!(engine.resend(&failed).await);
    assert_eq!(sent.id, MessageId::from("m100"));

    let snapshot = engine.snapshot().await;
    assert_eq!(ids(&snapshot.messages), vec!["m100"]);
    assert_eq!(snapshot.messages[0].body, "hello");

    assert_err!(
        engine.resend(&"m100".into()).await,
        ClientError::Validation(ValidationError::NotResendable)
    );
}

#[tokio::test(start_paused = true)]
async fn test_send_validation_happens_before_any_request() {
    let api = FakeApi::new();
    let engine = engine_for(&api).await;

    assert_err!(
        engine.send("hi").await,
        ClientError::Validation(ValidationError::NoActiveContact)
    );

    assert_ok!(engine.select("42".into()).await);
    assert_err!(
        engine.send("   ").await,
        ClientError::Validation(ValidationError::EmptyBody)
    );
    assert_eq!(
        engine.snapshot().await.inline_error.as_deref(),
        Some("Veuillez saisir un message")
    );
    assert!(engine.snapshot().await.messages.is_empty());
    assert_eq!(api.count(|c| matches!(c, Call::CreateMessage(_))), 0);
}

#[tokio::test(start_paused = true)]
async fn test_switching_contact_clears_view_and_cancels_timers() {
    let api = seeded_api();
    let engine = live_engine(&api, "42").await;
    let sent = assert_ok!(engine.send("hello").await);
    assert_eq!(engine.pending_timers(), 1);

    let mut events = engine.subscribe();
    assert_ok!(engine.select("43".into()).await);
    assert_eq!(engine.pending_timers(), 0);

    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.active_contact, Some("43".into()));
    assert_eq!(ids(&snapshot.messages), vec!["b1"]);

    tokio::time::sleep(ms(3_000)).await;
    let events = drain(&mut events);
    assert_eq!(
        events.first(),
        Some(&ViewEvent::Cleared {
            contact: Some("43".into())
        })
    );
    for event in &events {
        match event {
            ViewEvent::Rendered { message, .. } => {
                assert!(message.is_between(&ME.into(), &"43".into()));
            }
            ViewEvent::StateChanged { id, .. } => assert_ne!(id, &sent.id),
            _ => {}
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_stale_load_is_discarded() {
    let api = seeded_api();
    api.set_read_delay(ms(500));
    let engine = engine_for(&api).await;

    let first = engine.clone();
    let stale = tokio::spawn(async move { first.select("42".into()).await });
    tokio::time::sleep(ms(100)).await;
    assert_ok!(engine.select("43".into()).await);
    assert_ok!(stale.await.unwrap());

    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.active_contact, Some("43".into()));
    assert_eq!(ids(&snapshot.messages), vec!["b1"]);
}

#[tokio::test(start_paused = true)]
async fn test_poll_renders_each_new_id_once_in_time_order() {
    let api = seeded_api();
    let engine = live_engine(&api, "42").await;
    let mut events = engine.subscribe();

    api.add_message(message("m4", "42", ME, "encore", 40));
    api.add_message(message("m0", "42", ME, "en retard", 5));
    tokio::time::sleep(ms(2_100)).await;
    assert_eq!(
        ids(&engine.snapshot().await.messages),
        vec!["m0", "m1", "m2", "m3", "m4"]
    );

    tokio::time::sleep(ms(4_000)).await;
    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.messages.len(), 5);

    let rendered: Vec<(String, usize)> = drain(&mut events)
        .into_iter()
        .filter_map(|e| match e {
            ViewEvent::Rendered { message, index } => Some((message.id.to_string(), index)),
            _ => None,
        })
        .collect();
    assert_eq!(
        rendered,
        vec![("m0".to_string(), 0), ("m4".to_string(), 4)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_poll_advances_known_messages_forward_only() {
    let api = seeded_api();
    let engine = live_engine(&api, "42").await;
    assert_ok!(engine.send("hello").await);
    tokio::time::sleep(ms(1_500)).await;

    let own = engine.snapshot().await.messages[3].clone();
    assert_eq!(own.delivery_state, DeliveryState::Delivered);

    // peer read it: the next tick picks the new state up
    assert_ok!(api.update_delivery_state(&own.id, DeliveryState::Read).await);
    tokio::time::sleep(ms(1_000)).await;
    assert_eq!(
        engine.snapshot().await.messages[3].delivery_state,
        DeliveryState::Read
    );
}

#[tokio::test(start_paused = true)]
async fn test_own_message_is_deferred_while_its_send_is_pending() {
    let api = FakeApi::new();
    api.set_post_delay(ms(2_500));
    api.set_next_message_id("m100");
    let engine = live_engine(&api, "42").await;

    let sender = engine.clone();
    let send = tokio::spawn(async move { sender.send("hello").await });

    // the 2 s tick sees m100 on the server before the POST has answered
    tokio::time::sleep(ms(2_200)).await;
    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.messages.len(), 1);
    assert!(snapshot.messages[0].id.is_temporary());

    assert_ok!(send.await.unwrap());
    assert_eq!(ids(&engine.snapshot().await.messages), vec!["m100"]);

    tokio::time::sleep(ms(2_000)).await;
    let snapshot = engine.snapshot().await;
    assert_eq!(ids(&snapshot.messages), vec!["m100"]);
    assert!(snapshot.messages.iter().all(|m| !m.id.is_temporary()));
}

#[tokio::test(start_paused = true)]
async fn test_send_while_loading_shows_a_single_bubble() {
    let api = FakeApi::new();
    api.add_message(message("m2", ME, "42", "ça va ?", 20));
    api.set_read_delay(ms(1_000));
    api.set_post_delay(ms(3_000));
    api.set_next_message_id("m100");
    let engine = engine_for(&api).await;
    let mut events = engine.subscribe();

    let loader = engine.clone();
    let load = tokio::spawn(async move { loader.select("42".into()).await });
    tokio::time::sleep(ms(100)).await;
    assert_eq!(engine.phase().await, SyncPhase::Loading);

    let sender = engine.clone();
    let send = tokio::spawn(async move { sender.send("hello").await });

    // the load answers after the POST stored m100 but before it returned
    tokio::time::sleep(ms(1_100)).await;
    assert_ok!(load.await.unwrap());
    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.phase, SyncPhase::Live);
    assert_eq!(snapshot.messages.len(), 2);
    assert_eq!(snapshot.messages[0].id.as_str(), "m2");
    assert!(snapshot.messages[1].id.is_temporary());

    assert_ok!(send.await.unwrap());
    assert_eq!(ids(&engine.snapshot().await.messages), vec!["m2", "m100"]);
    let events = drain(&mut events);
    assert!(events.iter().any(|e| matches!(e, ViewEvent::Rebound { .. })));
    assert!(!events.iter().any(|e| matches!(e, ViewEvent::Removed { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_select_with_an_older_ticket_is_skipped() {
    let api = seeded_api();
    let engine = engine_for(&api).await;

    let first = engine.claim_selection();
    let second = engine.claim_selection();
    assert!(first < second);

    assert_ok!(engine.select_claimed("43".into(), second).await);
    assert_ok!(engine.select_claimed("42".into(), first).await);

    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.active_contact, Some("43".into()));
    assert_eq!(ids(&snapshot.messages), vec!["b1"]);

    // a deselect supersedes a select still waiting for the lock
    let late = engine.claim_selection();
    engine.deselect().await;
    assert_ok!(engine.select_claimed("42".into(), late).await);
    assert_eq!(engine.phase().await, SyncPhase::Closed);
    assert_eq!(engine.active_contact().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_load_failure_goes_live_and_recovers_on_poll() {
    let api = seeded_api();
    api.set_offline(true);
    let engine = engine_for(&api).await;

    assert_err!(engine.select("42".into()).await, ClientError::Network { .. });
    assert_eq!(engine.phase().await, SyncPhase::Live);
    assert!(engine.is_polling());
    assert!(engine.snapshot().await.messages.is_empty());

    api.set_offline(false);
    tokio::time::sleep(ms(2_100)).await;
    assert_eq!(
        ids(&engine.snapshot().await.messages),
        vec!["m1", "m2", "m3"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_deselect_and_close() {
    let api = seeded_api();
    let engine = live_engine(&api, "42").await;

    engine.deselect().await;
    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.phase, SyncPhase::Closed);
    assert_eq!(snapshot.active_contact, None);
    assert!(snapshot.messages.is_empty());
    assert!(!engine.is_polling());

    let polls = api.count(|c| matches!(c, Call::ListMessages { .. }));
    tokio::time::sleep(ms(5_000)).await;
    assert_eq!(api.count(|c| matches!(c, Call::ListMessages { .. })), polls);

    engine.close().await;
    assert_err!(
        engine.select("42".into()).await,
        ClientError::Validation(ValidationError::NotAuthenticated)
    );
}
