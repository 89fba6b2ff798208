//! Archive, delete and block from the chat header menu

use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

use wachat::egui_app::messaging::{
    ContactDirectory, ConversationAction, ConversationActions, ConversationSync, SyncPhase,
};
use wachat::egui_app::notice::{NoticeKind, TransientNotice};
use wachat::egui_app::{AppContext, ClientError};
use wachat::shared::messaging::ContactId;
use wachat::shared::{AppEvent, ValidationError};

use crate::common::*;
use crate::{assert_err, assert_ok};

struct Harness {
    api: Arc<FakeApi>,
    ctx: AppContext,
    contacts: Arc<ContactDirectory>,
    engine: ConversationSync,
    snackbar: TransientNotice,
    actions: ConversationActions,
}

async fn harness() -> Harness {
    let api = FakeApi::new();
    api.add_contact(contact("42", "Awa Ndiaye", "771234567"));
    api.add_contact(contact("43", "Binta Fall", "781112233"));
    let ctx = context(api.clone());

    let contacts = Arc::new(ContactDirectory::new(&ctx));
    assert_ok!(contacts.fetch_all(&ME.into()).await);
    let engine = ConversationSync::new(&ctx);
    engine.attach_user(ME.into()).await;
    let snackbar = TransientNotice::new(Duration::from_secs(3));
    let actions = ConversationActions::new(&ctx, contacts.clone(), engine.clone(), snackbar.clone());

    Harness {
        api,
        ctx,
        contacts,
        engine,
        snackbar,
        actions,
    }
}

fn contact_ids(entries: &[wachat::egui_app::messaging::ContactEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.contact.id.as_str()).collect()
}

#[tokio::test]
async fn test_no_current_contact_shows_info_notice() {
    let h = harness().await;

    assert_err!(
        h.actions.archive(None).await,
        ClientError::Validation(ValidationError::NoCurrentContact)
    );
    let notice = h.snackbar.current().unwrap();
    assert_eq!(notice.text, "Aucun contact courant !");
    assert_eq!(notice.kind, NoticeKind::Info);
    assert!(h.api.calls().iter().all(|c| !matches!(c, Call::ArchiveConversation(_))));
}

#[tokio::test]
async fn test_archive_active_conversation() {
    let h = harness().await;
    assert_ok!(h.engine.select("42".into()).await);
    let mut events = h.ctx.events.subscribe();

    assert_ok!(h.actions.archive(Some("42".into())).await);

    assert!(h.api.calls().contains(&Call::ArchiveConversation("42".into())));
    assert_eq!(contact_ids(&h.contacts.entries().await), vec!["43"]);
    assert_eq!(h.engine.phase().await, SyncPhase::Closed);
    assert_eq!(h.engine.active_contact().await, None);
    assert_eq!(drain(&mut events), vec![AppEvent::ContactsChanged]);

    let notice = h.snackbar.current().unwrap();
    assert_eq!(notice.text, "Conversation archivée !");
    assert_eq!(notice.kind, NoticeKind::Success);
}

#[tokio::test]
async fn test_action_on_other_contact_keeps_open_conversation() {
    let h = harness().await;
    assert_ok!(h.engine.select("42".into()).await);

    assert_ok!(h.actions.delete(Some("43".into())).await);
    assert_eq!(h.engine.active_contact().await, Some(ContactId::from("42")));
    assert_eq!(h.engine.phase().await, SyncPhase::Live);
    assert_eq!(contact_ids(&h.contacts.entries().await), vec!["42"]);
    assert_eq!(h.snackbar.text().as_deref(), Some("Conversation supprimée !"));
}

#[tokio::test]
async fn test_block_marks_contact_blocked_on_server() {
    let h = harness().await;

    assert_ok!(h.actions.block(Some("43".into())).await);
    let stored = h.api.contacts();
    assert!(stored.iter().any(|c| c.id.as_str() == "43" && c.blocked));
    assert_eq!(h.snackbar.text().as_deref(), Some("Contact bloqué !"));

    // a refetch keeps it hidden
    assert_ok!(h.contacts.fetch_all(&ME.into()).await);
    assert_eq!(contact_ids(&h.contacts.entries().await), vec!["42"]);
}

#[tokio::test]
async fn test_network_failure_keeps_contact() {
    let h = harness().await;
    h.api.set_offline(true);

    assert_err!(
        h.actions.block(Some("42".into())).await,
        ClientError::Network { .. }
    );
    let notice = h.snackbar.current().unwrap();
    assert_eq!(notice.text, "Erreur réseau lors du blocage.");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(contact_ids(&h.contacts.entries().await), vec!["42", "43"]);
}

#[tokio::test]
async fn test_delete_permanently_sends_both_requests_even_on_failure() {
    let h = harness().await;
    h.api.set_fail_conversations(true);

    assert_err!(
        h.actions
            .run(ConversationAction::DeletePermanently, Some("42".into()))
            .await,
        ClientError::Server { status: 404, .. }
    );
    let calls = h.api.calls();
    assert!(calls.contains(&Call::DeleteConversation("42".into())));
    assert!(calls.contains(&Call::DeleteContact("42".into())));
    assert_eq!(
        h.snackbar.text().as_deref(),
        Some("Erreur lors de la suppression définitive.")
    );

    h.api.set_fail_conversations(false);
    assert_ok!(h.actions.delete_permanently(Some("43".into())).await);
    assert_eq!(
        h.snackbar.text().as_deref(),
        Some("Conversation et contact supprimés !")
    );
    assert!(h.api.contacts().iter().all(|c| c.id.as_str() != "43"));
}
