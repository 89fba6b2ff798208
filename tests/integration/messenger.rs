//! Session events driving the messaging components

use pretty_assertions::assert_eq;
use std::time::Duration;

use wachat::egui_app::messaging::{Messenger, SyncPhase};
use wachat::egui_app::notice::TransientNotice;
use wachat::egui_app::SessionManager;
use wachat::shared::messaging::ContactId;

use crate::assert_ok;
use crate::common::*;

#[tokio::test(start_paused = true)]
async fn test_login_and_logout_drive_messaging() {
    let api = FakeApi::new();
    api.add_user(user(ME, "awa", "771234567"));
    api.add_contact(contact("42", "Binta Fall", "781112233"));
    api.add_group(group("g1", "Famille", ME, &[ME, "42"]));
    api.add_message(message("m1", "42", ME, "salut", 10));
    let ctx = context(api.clone());

    let snackbar = TransientNotice::new(Duration::from_secs(3));
    let messenger = Messenger::new(&ctx, snackbar.clone());
    messenger.spawn_listeners();
    let session = SessionManager::new(&ctx, snackbar);

    let awa = assert_ok!(session.authenticate("awa", "771234567").await);
    settle().await;

    assert_eq!(messenger.current_user().await, Some(awa));
    assert_eq!(messenger.contacts.entries().await.len(), 1);
    assert_eq!(messenger.groups.groups().await.len(), 1);
    assert!(messenger.inbox.is_running());

    // activating a row opens the conversation
    messenger.contacts.select(&"42".into()).await;
    settle().await;
    assert_eq!(
        messenger.engine.active_contact().await,
        Some(ContactId::from("42"))
    );
    assert_eq!(messenger.engine.snapshot().await.messages.len(), 1);

    session.logout();
    settle().await;
    assert_eq!(messenger.current_user().await, None);
    assert!(!messenger.inbox.is_running());
    assert!(messenger.contacts.entries().await.is_empty());
    assert!(messenger.groups.groups().await.is_empty());
    assert_eq!(messenger.engine.phase().await, SyncPhase::Closed);
    assert!(!messenger.engine.is_polling());
}

/// Wait until the engine is live on `contact`, then check it stays there
async fn assert_settles_on(messenger: &Messenger, contact: &str) {
    let expected = Some(ContactId::from(contact));
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let snapshot = messenger.engine.snapshot().await;
        if snapshot.phase == SyncPhase::Live && snapshot.active_contact == expected {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "never settled on {}, last seen {:?}",
            contact,
            snapshot.active_contact
        );
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(messenger.engine.active_contact().await, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_last_picked_contact_wins_across_workers() {
    let api = FakeApi::new();
    api.add_contact(contact("42", "Binta Fall", "781112233"));
    api.add_contact(contact("43", "Cheikh Ndiaye", "761112233"));
    api.add_message(message("m1", "42", ME, "salut", 10));
    api.add_message(message("b1", "43", ME, "hey", 15));
    let ctx = context(api.clone());
    let messenger = Messenger::new(&ctx, TransientNotice::new(Duration::from_secs(3)));
    messenger.on_login(user(ME, "awa", "771234567")).await;

    for _ in 0..50 {
        messenger.contacts.activate(&"42".into());
        messenger.contacts.activate(&"43".into());
        assert_settles_on(&messenger, "43").await;

        messenger.contacts.activate(&"43".into());
        messenger.contacts.activate(&"42".into());
        assert_settles_on(&messenger, "42").await;
    }

    messenger.on_logout().await;
}
