//! Contact Directory
//!
//! Cache of the logged-in user's contacts with the per-row extras the sidebar
//! shows: unread counter and last-message preview. Rows are ordered by most
//! recent activity; a contact that sends or receives a message moves to the
//! top.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

use crate::egui_app::api::MessagingApi;
use crate::egui_app::context::AppContext;
use crate::egui_app::error::ClientError;
use crate::shared::messaging::{Contact, ContactId, Message, NewContact, UserId};
use crate::shared::{AppEvent, EventBus, ValidationError};

/// Preview length before truncation
const PREVIEW_MAX_CHARS: usize = 30;
/// Prefix of previews for messages the user sent
const OWN_PREVIEW_PREFIX: &str = "Vous: ";

/// Shown when `POST /contacts` fails
pub const ADD_CONTACT_FAILED_MESSAGE: &str = "Erreur lors de l'ajout du contact.";

/// A sidebar row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEntry {
    pub contact: Contact,
    pub unread: usize,
    pub last_message: Option<String>,
    pub last_activity: Option<DateTime<Utc>>,
}

impl ContactEntry {
    fn new(contact: Contact) -> Self {
        Self {
            contact,
            unread: 0,
            last_message: None,
            last_activity: None,
        }
    }
}

type SelectHook = Box<dyn Fn(ContactId) + Send + Sync>;

#[derive(Debug, Default)]
struct DirectoryState {
    owner: Option<UserId>,
    entries: Vec<ContactEntry>,
}

pub struct ContactDirectory {
    api: Arc<dyn MessagingApi>,
    events: EventBus,
    state: RwLock<DirectoryState>,
    on_select: Mutex<Option<SelectHook>>,
}

impl std::fmt::Debug for ContactDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactDirectory")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ContactDirectory {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            api: ctx.api.clone(),
            events: ctx.events.clone(),
            state: RwLock::new(DirectoryState::default()),
            on_select: Mutex::new(None),
        }
    }

    /// Load the contacts owned by `owner`
    ///
    /// Blocked contacts are left out. Unread counters and previews survive
    /// a refetch for contacts that are still present.
    pub async fn fetch_all(&self, owner: &UserId) -> Result<Vec<Contact>, ClientError> {
        let contacts = self.api.list_contacts(owner).await?;
        let visible: Vec<Contact> = contacts.into_iter().filter(|c| !c.blocked).collect();

        let mut state = self.state.write().await;
        let previous = std::mem::take(&mut state.entries);
        state.entries = visible
            .iter()
            .map(|contact| {
                previous
                    .iter()
                    .find(|e| e.contact.id == contact.id)
                    .map(|e| ContactEntry {
                        contact: contact.clone(),
                        ..e.clone()
                    })
                    .unwrap_or_else(|| ContactEntry::new(contact.clone()))
            })
            .collect();
        sort_by_activity(&mut state.entries);
        state.owner = Some(owner.clone());
        tracing::info!("Loaded {} contacts for {}", state.entries.len(), owner);
        Ok(visible)
    }

    pub async fn find_by_id(&self, id: &ContactId) -> Option<Contact> {
        let state = self.state.read().await;
        state
            .entries
            .iter()
            .find(|e| &e.contact.id == id)
            .map(|e| e.contact.clone())
    }

    pub async fn entries(&self) -> Vec<ContactEntry> {
        self.state.read().await.entries.clone()
    }

    /// Rows for the UI thread; `None` while a writer holds the lock
    pub fn try_entries(&self) -> Option<Vec<ContactEntry>> {
        self.state.try_read().ok().map(|s| s.entries.clone())
    }

    /// Rows whose name or phone contains `query`, case-insensitively
    pub async fn filter(&self, query: &str) -> Vec<ContactEntry> {
        filter_entries(&self.state.read().await.entries, query)
    }

    /// Create a contact for the current owner and put it at the top
    pub async fn add(
        &self,
        name: &str,
        phone: &str,
        avatar: Option<&str>,
    ) -> Result<Contact, ClientError> {
        let (name, phone) = (name.trim(), phone.trim());
        if name.is_empty() || phone.is_empty() {
            return Err(ValidationError::ContactFieldsRequired.into());
        }
        let owner = self
            .state
            .read()
            .await
            .owner
            .clone()
            .ok_or(ValidationError::NotAuthenticated)?;

        let new_contact = NewContact {
            user_id: owner,
            display_name: name.to_string(),
            phone_number: phone.to_string(),
            avatar_url: avatar
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        };
        let created = self.api.create_contact(&new_contact).await?;

        self.state
            .write()
            .await
            .entries
            .insert(0, ContactEntry::new(created.clone()));
        self.events.publish(AppEvent::ContactsChanged);
        tracing::info!("Contact {} added", created.id);
        Ok(created)
    }

    /// Drop a contact from the cache
    pub async fn remove(&self, id: &ContactId) -> bool {
        let mut state = self.state.write().await;
        let before = state.entries.len();
        state.entries.retain(|e| &e.contact.id != id);
        before != state.entries.len()
    }

    /// Update the preview of the conversation `message` belongs to and move
    /// that contact to the top
    pub async fn record_message(&self, message: &Message) {
        let mut state = self.state.write().await;
        let Some(owner) = state.owner.clone() else {
            return;
        };
        let peer = if message.is_from(&owner) {
            &message.recipient_id
        } else {
            &message.sender_id
        };
        let Some(position) = state.entries.iter().position(|e| &e.contact.id == peer) else {
            return;
        };
        let mut entry = state.entries.remove(position);
        entry.last_message = Some(preview(message, &owner));
        entry.last_activity = Some(message.created_at);
        state.entries.insert(0, entry);
    }

    pub async fn bump_unread(&self, id: &ContactId) {
        let mut state = self.state.write().await;
        if let Some(entry) = state.entries.iter_mut().find(|e| &e.contact.id == id) {
            entry.unread += 1;
        }
    }

    pub async fn unread(&self, id: &ContactId) -> usize {
        let state = self.state.read().await;
        state
            .entries
            .iter()
            .find(|e| &e.contact.id == id)
            .map(|e| e.unread)
            .unwrap_or(0)
    }

    /// Register the callback run when a row is activated
    pub fn on_select<F>(&self, hook: F)
    where
        F: Fn(ContactId) + Send + Sync + 'static,
    {
        if let Ok(mut slot) = self.on_select.lock() {
            *slot = Some(Box::new(hook));
        }
    }

    /// Activate a row: run the select hook, then reset its unread counter
    pub async fn select(&self, id: &ContactId) {
        self.activate(id);
        self.mark_seen(id).await;
    }

    /// Run the select hook right away, in the caller's click order
    pub fn activate(&self, id: &ContactId) {
        if let Ok(slot) = self.on_select.lock() {
            if let Some(hook) = slot.as_ref() {
                hook(id.clone());
            }
        }
    }

    pub async fn mark_seen(&self, id: &ContactId) {
        let mut state = self.state.write().await;
        if let Some(entry) = state.entries.iter_mut().find(|e| &e.contact.id == id) {
            entry.unread = 0;
        }
    }

    /// Forget everything (logout)
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.owner = None;
    }
}

/// `"Vous: "` for own messages, body cut at 30 characters with `...`
pub fn preview(message: &Message, owner: &UserId) -> String {
    let prefix = if message.is_from(owner) {
        OWN_PREVIEW_PREFIX
    } else {
        ""
    };
    format!("{}{}", prefix, message.preview(PREVIEW_MAX_CHARS))
}

pub fn filter_entries(entries: &[ContactEntry], query: &str) -> Vec<ContactEntry> {
    entries
        .iter()
        .filter(|e| e.contact.matches(query))
        .cloned()
        .collect()
}

/// Most recent activity first; rows without activity keep their order
fn sort_by_activity(entries: &mut [ContactEntry]) {
    entries.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
}
