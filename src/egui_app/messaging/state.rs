//! Messaging State
//!
//! Per-frame state of the messaging view: form inputs, dialog toggles, the
//! latest copies of what the async components hold, and receivers for
//! operations still in flight. Async work runs on the tokio runtime; results
//! come back through `std::sync::mpsc` and are picked up with `try_recv` on
//! the next frame.

use std::collections::BTreeSet;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use tokio::runtime::Handle;

use super::contacts::{filter_entries, ContactEntry, ADD_CONTACT_FAILED_MESSAGE};
use super::conversation_actions::ConversationAction;
use super::conversation_sync::ViewSnapshot;
use super::groups::GROUP_SAVE_FAILED_MESSAGE;
use super::messenger::Messenger;
use crate::egui_app::error::ClientError;
use crate::egui_app::notice::TransientNotice;
use crate::shared::messaging::{Contact, ContactId, Group, GroupId, MessageId, User, UserId};

pub type AddContactResult = Result<Contact, ClientError>;
pub type GroupResult = Result<Group, ClientError>;

/// Group dialog form
#[derive(Debug, Clone, Default)]
pub struct GroupForm {
    /// `None` creates a new group
    pub editing: Option<GroupId>,
    pub name: String,
    pub members: BTreeSet<UserId>,
    pub error: Option<String>,
}

impl GroupForm {
    pub fn for_group(group: &Group) -> Self {
        Self {
            editing: Some(group.id.clone()),
            name: group.name.clone(),
            members: group.members.iter().cloned().collect(),
            error: None,
        }
    }
}

pub struct MessagingState {
    runtime: Handle,
    pub messenger: Arc<Messenger>,
    pub snackbar: TransientNotice,

    /// Latest copies, refreshed every frame when the locks are free
    pub snapshot: ViewSnapshot,
    pub contacts: Vec<ContactEntry>,
    pub groups: Vec<Group>,

    pub search_query: String,
    pub message_input: String,

    pub show_add_contact_modal: bool,
    pub add_contact_name: String,
    pub add_contact_phone: String,
    pub add_contact_avatar: String,
    pub add_contact_error: Option<String>,

    pub show_group_panel: bool,
    pub group_form: GroupForm,

    pub show_chat_header_menu: bool,

    pub pending_add_contact: Option<Receiver<AddContactResult>>,
    pub pending_group: Option<Receiver<GroupResult>>,
}

impl std::fmt::Debug for MessagingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagingState")
            .field("snapshot", &self.snapshot)
            .field("contacts", &self.contacts.len())
            .finish_non_exhaustive()
    }
}

impl MessagingState {
    pub fn new(runtime: Handle, messenger: Arc<Messenger>, snackbar: TransientNotice) -> Self {
        Self {
            runtime,
            messenger,
            snackbar,
            snapshot: ViewSnapshot::default(),
            contacts: Vec::new(),
            groups: Vec::new(),
            search_query: String::new(),
            message_input: String::new(),
            show_add_contact_modal: false,
            add_contact_name: String::new(),
            add_contact_phone: String::new(),
            add_contact_avatar: String::new(),
            add_contact_error: None,
            show_group_panel: false,
            group_form: GroupForm::default(),
            show_chat_header_menu: false,
            pending_add_contact: None,
            pending_group: None,
        }
    }

    /// Copy the async components' state for this frame
    pub fn refresh(&mut self) {
        if let Some(snapshot) = self.messenger.engine.try_snapshot() {
            self.snapshot = snapshot;
        }
        if let Some(entries) = self.messenger.contacts.try_entries() {
            self.contacts = entries;
        }
        if let Some(groups) = self.messenger.groups.try_groups() {
            self.groups = groups;
        }
    }

    pub fn check_pending_operations(&mut self) {
        if let Some(rx) = &self.pending_add_contact {
            if let Ok(result) = rx.try_recv() {
                self.pending_add_contact = None;
                match result {
                    Ok(_) => self.close_add_contact_modal(),
                    Err(ClientError::Validation(e)) => self.add_contact_error = Some(e.to_string()),
                    Err(e) => {
                        tracing::warn!("Adding contact failed: {}", e);
                        self.add_contact_error = Some(ADD_CONTACT_FAILED_MESSAGE.to_string());
                    }
                }
            }
        }

        if let Some(rx) = &self.pending_group {
            if let Ok(result) = rx.try_recv() {
                self.pending_group = None;
                match result {
                    Ok(group) => {
                        self.snackbar.success(format!("Groupe « {} » enregistré", group.name));
                        self.group_form = GroupForm::default();
                    }
                    Err(ClientError::Validation(e)) => self.group_form.error = Some(e.to_string()),
                    Err(e) => {
                        tracing::warn!("Saving group failed: {}", e);
                        self.group_form.error = Some(GROUP_SAVE_FAILED_MESSAGE.to_string());
                    }
                }
            }
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.messenger.try_current_user()
    }

    pub fn filtered_contacts(&self) -> Vec<ContactEntry> {
        filter_entries(&self.contacts, &self.search_query)
    }

    pub fn active_contact(&self) -> Option<&Contact> {
        let active = self.snapshot.active_contact.as_ref()?;
        self.contacts
            .iter()
            .map(|e| &e.contact)
            .find(|c| &c.id == active)
    }

    pub fn select_contact(&mut self, id: ContactId) {
        self.show_chat_header_menu = false;
        let _runtime = self.runtime.enter();
        self.messenger.contacts.activate(&id);
        let contacts = self.messenger.contacts.clone();
        self.runtime.spawn(async move { contacts.mark_seen(&id).await });
    }

    pub fn send_message(&mut self) {
        let body = std::mem::take(&mut self.message_input);
        let engine = self.messenger.engine.clone();
        let contacts = self.messenger.contacts.clone();
        self.runtime.spawn(async move {
            // failures are shown by the engine's inline error
            if let Ok(sent) = engine.send(&body).await {
                contacts.record_message(&sent).await;
            }
        });
    }

    pub fn resend(&mut self, id: MessageId) {
        let engine = self.messenger.engine.clone();
        self.runtime.spawn(async move {
            if let Err(e) = engine.resend(&id).await {
                tracing::warn!("Resend of {} failed: {}", id, e);
            }
        });
    }

    pub fn run_action(&mut self, action: ConversationAction) {
        self.show_chat_header_menu = false;
        let target = self.snapshot.active_contact.clone();
        let messenger = self.messenger.clone();
        self.runtime.spawn(async move {
            let _ = messenger.actions.run(action, target).await;
        });
    }

    pub fn open_add_contact_modal(&mut self) {
        self.show_add_contact_modal = true;
        self.add_contact_error = None;
    }

    pub fn close_add_contact_modal(&mut self) {
        self.show_add_contact_modal = false;
        self.add_contact_name.clear();
        self.add_contact_phone.clear();
        self.add_contact_avatar.clear();
        self.add_contact_error = None;
    }

    pub fn submit_add_contact(&mut self) {
        self.add_contact_error = None;
        let name = self.add_contact_name.clone();
        let phone = self.add_contact_phone.clone();
        let avatar = self.add_contact_avatar.clone();
        let contacts = self.messenger.contacts.clone();

        let (tx, rx) = channel();
        self.runtime.spawn(async move {
            let result = contacts.add(&name, &phone, Some(&avatar)).await;
            let _ = tx.send(result);
        });
        self.pending_add_contact = Some(rx);
    }

    pub fn submit_group(&mut self) {
        self.group_form.error = None;
        let Some(user) = self.current_user() else {
            return;
        };
        let form = self.group_form.clone();
        let groups = self.messenger.groups.clone();

        let (tx, rx) = channel();
        self.runtime.spawn(async move {
            let members: Vec<UserId> = form.members.into_iter().collect();
            let result = match form.editing {
                Some(id) => groups.edit(&id, Some(&form.name), Some(members)).await,
                None => groups.create(&user.id, &form.name, members).await,
            };
            let _ = tx.send(result);
        });
        self.pending_group = Some(rx);
    }

    pub fn remove_group_member(&mut self, group: GroupId, member: UserId) {
        let groups = self.messenger.groups.clone();
        let snackbar = self.snackbar.clone();
        self.runtime.spawn(async move {
            if let Err(e) = groups.remove_member(&group, &member).await {
                snackbar.error(e.to_string());
            }
        });
    }

    pub fn is_busy(&self) -> bool {
        self.pending_add_contact.is_some() || self.pending_group.is_some()
    }

    /// Forget every input (logout)
    pub fn reset(&mut self) {
        self.snapshot = ViewSnapshot::default();
        self.contacts.clear();
        self.groups.clear();
        self.search_query.clear();
        self.message_input.clear();
        self.close_add_contact_modal();
        self.show_group_panel = false;
        self.group_form = GroupForm::default();
        self.show_chat_header_menu = false;
        self.pending_add_contact = None;
        self.pending_group = None;
    }
}
