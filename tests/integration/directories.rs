//! Contact and group directories against the in-memory backend

use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

use wachat::egui_app::messaging::{ContactDirectory, GroupDirectory};
use wachat::egui_app::ClientError;
use wachat::shared::messaging::{Contact, ContactId, UserId};
use wachat::shared::{AppEvent, ValidationError};

use crate::common::*;
use crate::{assert_err, assert_ok};

fn names(entries: &[wachat::egui_app::messaging::ContactEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.contact.display_name.as_str()).collect()
}

fn seeded_api() -> Arc<FakeApi> {
    let api = FakeApi::new();
    api.add_contact(contact("42", "Awa Ndiaye", "771234567"));
    api.add_contact(contact("43", "Binta Fall", "781112233"));
    api.add_contact(Contact {
        blocked: true,
        ..contact("44", "Cheikh", "709998877")
    });
    api.add_contact(Contact {
        user_id: Some("8".into()),
        ..contact("45", "Someone else's", "770000000")
    });
    api
}

#[tokio::test]
async fn test_fetch_all_skips_blocked_and_foreign_contacts() {
    let api = seeded_api();
    let directory = ContactDirectory::new(&context(api.clone()));

    let contacts = assert_ok!(directory.fetch_all(&ME.into()).await);
    let ids: Vec<&str> = contacts.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["42", "43"]);
    assert_eq!(names(&directory.entries().await), vec!["Awa Ndiaye", "Binta Fall"]);
    assert!(directory.find_by_id(&"44".into()).await.is_none());
    assert_eq!(
        directory.find_by_id(&"43".into()).await.map(|c| c.phone_number),
        Some("781112233".to_string())
    );
}

#[tokio::test]
async fn test_filter_matches_name_or_phone_case_insensitively() {
    let api = seeded_api();
    let directory = ContactDirectory::new(&context(api.clone()));
    assert_ok!(directory.fetch_all(&ME.into()).await);

    assert_eq!(names(&directory.filter("awa").await), vec!["Awa Ndiaye"]);
    assert_eq!(names(&directory.filter("FALL").await), vec!["Binta Fall"]);
    assert_eq!(names(&directory.filter("78111").await), vec!["Binta Fall"]);
    assert_eq!(directory.filter("").await.len(), 2);
    assert!(directory.filter("zzz").await.is_empty());
}

#[tokio::test]
async fn test_add_validates_then_inserts_at_top() {
    let api = seeded_api();
    let ctx = context(api.clone());
    let directory = ContactDirectory::new(&ctx);

    assert_err!(
        directory.add("Fatou", "771231231", None).await,
        ClientError::Validation(ValidationError::NotAuthenticated)
    );
    assert_ok!(directory.fetch_all(&ME.into()).await);

    let result = directory.add("  ", "771231231", None).await;
    assert_err!(
        result,
        ClientError::Validation(ValidationError::ContactFieldsRequired)
    );
    assert_eq!(
        ValidationError::ContactFieldsRequired.to_string(),
        "Nom et numéro obligatoires !"
    );
    assert_eq!(api.count(|c| matches!(c, Call::CreateContact(_))), 0);

    let mut events = ctx.events.subscribe();
    let created = assert_ok!(directory.add(" Fatou ", "771231231", Some(" ")).await);
    assert_eq!(created.display_name, "Fatou");
    assert_eq!(created.avatar_url, None);
    assert_eq!(created.user_id, Some(UserId::from(ME)));
    assert_eq!(
        names(&directory.entries().await),
        vec!["Fatou", "Awa Ndiaye", "Binta Fall"]
    );
    assert_eq!(drain(&mut events), vec![AppEvent::ContactsChanged]);
}

#[tokio::test]
async fn test_add_failure_leaves_list_unchanged() {
    let api = seeded_api();
    let directory = ContactDirectory::new(&context(api.clone()));
    assert_ok!(directory.fetch_all(&ME.into()).await);

    api.set_fail_posts(true);
    assert_err!(
        directory.add("Fatou", "771231231", None).await,
        ClientError::Server { status: 500, .. }
    );
    assert_eq!(directory.entries().await.len(), 2);
}

#[tokio::test]
async fn test_record_message_moves_contact_up_with_preview() {
    let api = seeded_api();
    let directory = ContactDirectory::new(&context(api.clone()));
    assert_ok!(directory.fetch_all(&ME.into()).await);

    directory
        .record_message(&message("m1", "43", ME, "salut !", 10))
        .await;
    let entries = directory.entries().await;
    assert_eq!(names(&entries), vec!["Binta Fall", "Awa Ndiaye"]);
    assert_eq!(entries[0].last_message.as_deref(), Some("salut !"));
    assert_eq!(entries[0].last_activity, Some(at(10)));

    let long = "a".repeat(40);
    directory
        .record_message(&message("m2", ME, "42", &long, 20))
        .await;
    let entries = directory.entries().await;
    assert_eq!(names(&entries), vec!["Awa Ndiaye", "Binta Fall"]);
    assert_eq!(
        entries[0].last_message,
        Some(format!("Vous: {}...", "a".repeat(30)))
    );

    // unknown peers are ignored
    directory
        .record_message(&message("m3", "99", ME, "?", 30))
        .await;
    assert_eq!(directory.entries().await.len(), 2);
}

#[tokio::test]
async fn test_unread_counters_reset_on_select_and_survive_refetch() {
    let api = seeded_api();
    let directory = ContactDirectory::new(&context(api.clone()));
    assert_ok!(directory.fetch_all(&ME.into()).await);

    let selected: Arc<Mutex<Vec<ContactId>>> = Arc::default();
    let sink = selected.clone();
    directory.on_select(move |id| sink.lock().unwrap().push(id));

    directory.bump_unread(&"42".into()).await;
    directory.bump_unread(&"42".into()).await;
    assert_eq!(directory.unread(&"42".into()).await, 2);

    assert_ok!(directory.fetch_all(&ME.into()).await);
    assert_eq!(directory.unread(&"42".into()).await, 2);

    directory.select(&"42".into()).await;
    assert_eq!(directory.unread(&"42".into()).await, 0);
    assert_eq!(*selected.lock().unwrap(), vec![ContactId::from("42")]);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let api = seeded_api();
    let directory = ContactDirectory::new(&context(api.clone()));
    assert_ok!(directory.fetch_all(&ME.into()).await);

    assert!(directory.remove(&"42".into()).await);
    assert!(!directory.remove(&"42".into()).await);
    assert_eq!(names(&directory.entries().await), vec!["Binta Fall"]);

    directory.clear().await;
    assert!(directory.entries().await.is_empty());
    assert_err!(
        directory.add("Fatou", "771231231", None).await,
        ClientError::Validation(ValidationError::NotAuthenticated)
    );
}

fn members(ids: &[&str]) -> Vec<UserId> {
    ids.iter().map(|id| UserId::from(*id)).collect()
}

#[tokio::test]
async fn test_create_group_adds_admin_and_publishes() {
    let api = FakeApi::new();
    let ctx = context(api.clone());
    let groups = GroupDirectory::new(&ctx);
    let mut events = ctx.events.subscribe();

    let group = assert_ok!(groups.create(&ME.into(), " Famille ", members(&["8", "8"])).await);
    assert_eq!(group.name, "Famille");
    assert_eq!(group.members, members(&[ME, "8"]));
    assert_eq!(group.admin_id, UserId::from(ME));
    assert_eq!(drain(&mut events), vec![AppEvent::GroupModified]);
}

#[tokio::test]
async fn test_create_group_validation() {
    let api = FakeApi::new();
    let groups = GroupDirectory::new(&context(api.clone()));

    assert_err!(
        groups.create(&ME.into(), "Solo", members(&[ME])).await,
        ClientError::Validation(ValidationError::GroupTooSmall)
    );
    assert_err!(
        groups.create(&ME.into(), "   ", members(&["8"])).await,
        ClientError::Validation(ValidationError::GroupNameRequired)
    );
    assert_eq!(api.count(|c| matches!(c, Call::CreateGroup(_))), 0);
}

#[tokio::test]
async fn test_membership_changes() {
    let api = FakeApi::new();
    api.add_group(group("g1", "Famille", ME, &[ME, "8", "9"]));
    let groups = GroupDirectory::new(&context(api.clone()));
    assert_ok!(groups.fetch().await);

    assert_err!(
        groups.remove_member(&"g1".into(), &ME.into()).await,
        ClientError::Validation(ValidationError::CannotRemoveAdmin)
    );
    let updated = assert_ok!(groups.remove_member(&"g1".into(), &"9".into()).await);
    assert_eq!(updated.members, members(&[ME, "8"]));

    assert_ok!(groups.fetch().await);
    assert_eq!(assert_ok!(groups.add_member(&"g1".into(), &"8".into()).await), None);
    let updated = assert_ok!(groups.add_member(&"g1".into(), &"10".into()).await);
    assert_eq!(updated.map(|g| g.members), Some(members(&[ME, "8", "10"])));

    assert_ok!(groups.fetch().await);
    assert_err!(
        groups.edit(&"g1".into(), None, Some(Vec::new())).await,
        ClientError::Validation(ValidationError::GroupTooSmall)
    );
    let renamed = assert_ok!(groups.edit(&"g1".into(), Some(" Cousins "), None).await);
    assert_eq!(renamed.name, "Cousins");
    assert_err!(
        groups.edit(&"nope".into(), Some("x"), None).await,
        ClientError::Validation(ValidationError::GroupNotFound)
    );
}

#[tokio::test]
async fn test_refresh_listener_refetches_on_group_modified() {
    let api = FakeApi::new();
    let groups = Arc::new(GroupDirectory::new(&context(api.clone())));
    let listener = groups.spawn_refresh_listener();

    assert_ok!(groups.create(&ME.into(), "Famille", members(&["8"])).await);
    settle().await;
    let cached = groups.groups().await;
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].name, "Famille");

    listener.abort();
    groups.clear().await;
    assert!(groups.groups().await.is_empty());
}
