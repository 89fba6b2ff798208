//! Inbox Watcher
//!
//! Polls every message addressed to the logged-in user so the sidebar can
//! flag conversations that are not open. The first poll only records what is
//! already there; from the second one on, each unseen message moves its
//! contact to the top and, unless that contact is the open conversation,
//! bumps its unread counter and publishes [`AppEvent::NewMessage`].

use std::collections::HashSet;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;

use super::contacts::{preview, ContactDirectory};
use super::conversation_sync::ConversationSync;
use crate::egui_app::api::MessagingApi;
use crate::egui_app::context::AppContext;
use crate::egui_app::sync::PollScheduler;
use crate::shared::messaging::{Message, MessageId, UserId};
use crate::shared::{AppEvent, EventBus};

#[derive(Debug, Default)]
struct WatchState {
    user: Option<UserId>,
    generation: u64,
    primed: bool,
    seen: HashSet<MessageId>,
}

struct Inner {
    api: Arc<dyn MessagingApi>,
    events: EventBus,
    contacts: Arc<ContactDirectory>,
    engine: ConversationSync,
    interval: Duration,
    poller: PollScheduler,
    state: Mutex<WatchState>,
}

#[derive(Clone)]
pub struct InboxWatcher {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for InboxWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboxWatcher")
            .field("interval", &self.inner.interval)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl InboxWatcher {
    pub fn new(ctx: &AppContext, contacts: Arc<ContactDirectory>, engine: ConversationSync) -> Self {
        Self {
            inner: Arc::new(Inner {
                api: ctx.api.clone(),
                events: ctx.events.clone(),
                contacts,
                engine,
                interval: ctx.config.inbox_interval,
                poller: PollScheduler::new(),
                state: Mutex::new(WatchState::default()),
            }),
        }
    }

    /// Start watching `user`'s inbox, restarting from an empty seen set
    pub async fn start(&self, user: UserId) {
        let generation = {
            let mut state = self.inner.state.lock().await;
            state.generation += 1;
            state.user = Some(user.clone());
            state.primed = false;
            state.seen.clear();
            state.generation
        };
        tracing::info!("[Inbox] Watching messages for {}", user);

        let weak = Arc::downgrade(&self.inner);
        self.inner.poller.start(self.inner.interval, move || {
            let watcher = upgrade(&weak);
            async move {
                match watcher {
                    Some(watcher) => watcher.tick(generation).await,
                    None => false,
                }
            }
        });
    }

    pub async fn stop(&self) {
        self.inner.poller.stop();
        let mut state = self.inner.state.lock().await;
        state.generation += 1;
        state.user = None;
        state.primed = false;
        state.seen.clear();
        tracing::info!("[Inbox] Stopped");
    }

    pub fn is_running(&self) -> bool {
        self.inner.poller.is_running()
    }

    async fn tick(&self, generation: u64) -> bool {
        let user = {
            let state = self.inner.state.lock().await;
            match (&state.user, state.generation == generation) {
                (Some(user), true) => user.clone(),
                _ => return false,
            }
        };

        let inbox = match self.inner.api.list_inbox(&user).await {
            Ok(inbox) => inbox,
            Err(e) => {
                tracing::warn!("[Inbox] Poll failed, retrying next tick: {}", e);
                return true;
            }
        };

        let fresh = {
            let mut state = self.inner.state.lock().await;
            if state.generation != generation {
                return false;
            }
            let fresh = unseen(&mut state.seen, inbox);
            if !state.primed {
                state.primed = true;
                tracing::debug!("[Inbox] Primed with {} message(s)", state.seen.len());
                return true;
            }
            fresh
        };
        if fresh.is_empty() {
            return true;
        }

        let active = self.inner.engine.active_contact().await;
        for message in fresh {
            self.inner.contacts.record_message(&message).await;
            if active.as_ref() == Some(&message.sender_id) {
                continue;
            }
            self.inner.contacts.bump_unread(&message.sender_id).await;
            self.inner.events.publish(AppEvent::NewMessage {
                contact_id: message.sender_id.clone(),
                message_id: message.id.clone(),
                preview: preview(&message, &user),
            });
            tracing::debug!("[Inbox] New message {} from {}", message.id, message.sender_id);
        }
        true
    }
}

fn upgrade(weak: &Weak<Inner>) -> Option<InboxWatcher> {
    weak.upgrade().map(|inner| InboxWatcher { inner })
}

/// Record `inbox` in `seen`, returning the messages not seen before in time
/// order
fn unseen(seen: &mut HashSet<MessageId>, inbox: Vec<Message>) -> Vec<Message> {
    let mut fresh: Vec<Message> = inbox
        .into_iter()
        .filter(|m| seen.insert(m.id.clone()))
        .collect();
    fresh.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    fresh
}
