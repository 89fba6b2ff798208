//! Messenger
//!
//! Builds the messaging components around one [`AppContext`] and wires them
//! together: picking a contact opens its conversation, `LoggedIn` loads the
//! directories and starts the inbox watcher, `LoggedOut` stops every timer
//! and forgets the user's data.

use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::contacts::ContactDirectory;
use super::conversation_actions::ConversationActions;
use super::conversation_sync::ConversationSync;
use super::groups::GroupDirectory;
use super::inbox::InboxWatcher;
use crate::egui_app::context::AppContext;
use crate::egui_app::notice::TransientNotice;
use crate::shared::messaging::User;
use crate::shared::{AppEvent, EventBus};

pub struct Messenger {
    pub engine: ConversationSync,
    pub contacts: Arc<ContactDirectory>,
    pub groups: Arc<GroupDirectory>,
    pub actions: ConversationActions,
    pub inbox: InboxWatcher,
    events: EventBus,
    user: RwLock<Option<User>>,
    listeners: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for Messenger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Messenger")
            .field("engine", &self.engine)
            .field("inbox", &self.inbox)
            .finish_non_exhaustive()
    }
}

impl Messenger {
    /// `snackbar` receives the outcome of conversation actions
    pub fn new(ctx: &AppContext, snackbar: TransientNotice) -> Arc<Self> {
        let engine = ConversationSync::new(ctx);
        let contacts = Arc::new(ContactDirectory::new(ctx));
        let groups = Arc::new(GroupDirectory::new(ctx));
        let actions = ConversationActions::new(ctx, contacts.clone(), engine.clone(), snackbar);
        let inbox = InboxWatcher::new(ctx, contacts.clone(), engine.clone());

        // The ticket is taken before spawning so the last pick wins.
        // Must be called inside the runtime context.
        let selected = engine.clone();
        contacts.on_select(move |contact| {
            let engine = selected.clone();
            let ticket = engine.claim_selection();
            tokio::spawn(async move {
                if let Err(e) = engine.select_claimed(contact.clone(), ticket).await {
                    tracing::warn!("Opening conversation with {} failed: {}", contact, e);
                }
            });
        });

        Arc::new(Self {
            engine,
            contacts,
            groups,
            actions,
            inbox,
            events: ctx.events.clone(),
            user: RwLock::new(None),
            listeners: Mutex::new(Vec::new()),
        })
    }

    /// Follow login/logout and group changes until the messenger is dropped
    pub fn spawn_listeners(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let mut events = self.events.subscribe();
        let session = tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Session listener lagged by {} events", skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                let Some(messenger) = weak.upgrade() else {
                    break;
                };
                match event {
                    AppEvent::LoggedIn(user) => messenger.on_login(user).await,
                    AppEvent::LoggedOut => messenger.on_logout().await,
                    _ => {}
                }
            }
        });
        let groups = self.groups.spawn_refresh_listener();

        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(session);
            listeners.push(groups);
        }
    }

    pub async fn on_login(&self, user: User) {
        tracing::info!("Starting messaging for {}", user.username);
        *self.user.write().await = Some(user.clone());
        self.engine.attach_user(user.id.clone()).await;

        if let Err(e) = self.contacts.fetch_all(&user.id).await {
            tracing::warn!("Could not load contacts: {}", e);
        }
        if let Err(e) = self.groups.fetch().await {
            tracing::warn!("Could not load groups: {}", e);
        }
        self.inbox.start(user.id).await;
    }

    pub async fn on_logout(&self) {
        self.inbox.stop().await;
        self.engine.close().await;
        self.contacts.clear().await;
        self.groups.clear().await;
        *self.user.write().await = None;
        tracing::info!("Messaging stopped");
    }

    pub async fn current_user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    pub fn try_current_user(&self) -> Option<User> {
        self.user.try_read().ok().and_then(|u| u.clone())
    }
}

impl Drop for Messenger {
    fn drop(&mut self) {
        if let Ok(mut listeners) = self.listeners.lock() {
            for handle in listeners.drain(..) {
                handle.abort();
            }
        }
    }
}
