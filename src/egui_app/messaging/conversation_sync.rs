//! # Conversation Sync Engine
//!
//! Keeps the chat pane's view of the active conversation consistent with a
//! backend that only answers requests: no push, just periodic polling.
//!
//! ## Lifecycle
//!
//! ```text
//!            select(c)              load done
//! Idle ───────────────► Loading ─────────────► Live ◄─┐ poll tick
//!   ▲                     ▲ │                   │ │   │
//!   │                     │ └─── select(d) ─────┘ └───┘
//!   │                     │
//!   └── attach_user     Closed ◄── deselect / close
//! ```
//!
//! - `select` cancels every timer, clears the view, loads both directions of
//!   the conversation concurrently, renders them in time order, then polls.
//! - A poll tick renders only ids the view has not seen, each inserted at its
//!   place in time; known ids may only move their delivery state forward.
//! - `send` renders an optimistic bubble under a temporary id, posts it, and
//!   swaps in the server id once (see [`super::optimistic`]).
//!
//! Every transition bumps or checks a selection epoch under the state lock,
//! so a task started for a previous conversation can never write into the
//! current one. The lock is never held across a request.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wachat::egui_app::messaging::ConversationSync;
//! # async fn example(ctx: wachat::egui_app::AppContext) -> Result<(), wachat::egui_app::ClientError> {
//! let engine = ConversationSync::new(&ctx);
//! engine.attach_user("7".into()).await;
//! engine.select("42".into()).await?;
//! engine.send("hello").await?;
//! let snapshot = engine.snapshot().await;
//! # Ok(())
//! # }
//! ```

use futures_util::future::{join_all, try_join};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};

use super::optimistic::{PendingSend, PendingSends, Resolution};
use super::view::ConversationView;
use crate::egui_app::api::MessagingApi;
use crate::egui_app::context::AppContext;
use crate::egui_app::error::ClientError;
use crate::egui_app::notice::TransientNotice;
use crate::egui_app::sync::{PollScheduler, TimerSet};
use crate::shared::messaging::{
    ContactId, DeliveryState, Message, MessageId, NewMessage, UserId,
};
use crate::shared::{AppConfig, ValidationError};

/// Inline error shown when a POST fails
pub const SEND_FAILED_MESSAGE: &str = "Erreur lors de l'envoi du message";

const VIEW_EVENT_CAPACITY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    /// No conversation selected yet
    #[default]
    Idle,
    /// Initial fetch in flight
    Loading,
    /// Loaded and polling
    Live,
    /// Deselected or logged out
    Closed,
}

/// Change notifications for whoever renders the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The view was emptied; `contact` is the newly active one, if any
    Cleared { contact: Option<ContactId> },
    PhaseChanged(SyncPhase),
    Rendered { message: Message, index: usize },
    /// A temporary id was replaced by the server id
    Rebound { from: MessageId, to: MessageId },
    StateChanged { id: MessageId, state: DeliveryState },
    Removed { id: MessageId },
}

/// Point-in-time copy of everything the chat pane displays
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewSnapshot {
    pub phase: SyncPhase,
    pub active_contact: Option<ContactId>,
    pub messages: Vec<Message>,
    pub inline_error: Option<String>,
}

/// Place of a selection request in click order
///
/// Claimed synchronously when the user picks a contact, so the last click
/// wins even when the selects run on different worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SelectionTicket(u64);

/// Timer settings of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    pub poll_interval: Duration,
    pub delivered_delay: Duration,
    pub inline_error_duration: Duration,
}

impl From<&AppConfig> for SyncSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            poll_interval: config.poll_interval,
            delivered_delay: config.delivered_delay,
            inline_error_duration: config.inline_error_duration,
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

#[derive(Debug, Default)]
struct SyncState {
    phase: SyncPhase,
    epoch: u64,
    user: Option<UserId>,
    active: Option<ContactId>,
    view: ConversationView,
    pending: PendingSends,
}

impl SyncState {
    /// Empty the view and start a new epoch
    fn reset(&mut self, active: Option<ContactId>, phase: SyncPhase) -> u64 {
        self.epoch += 1;
        self.view.clear();
        self.pending.clear();
        self.active = active;
        self.phase = phase;
        self.epoch
    }
}

struct Inner {
    api: Arc<dyn MessagingApi>,
    settings: SyncSettings,
    state: RwLock<SyncState>,
    /// Last ticket handed out; only its holder may still switch the view
    requested: AtomicU64,
    poller: PollScheduler,
    timers: TimerSet,
    events: broadcast::Sender<ViewEvent>,
    inline_error: TransientNotice,
}

impl Inner {
    fn emit(&self, event: ViewEvent) {
        // no subscriber is fine: the snapshot API still reflects the change
        let _ = self.events.send(event);
    }

    fn cancel_timers(&self) {
        self.poller.stop();
        self.timers.cancel_all();
    }
}

/// Sync engine for the active conversation
///
/// Cheap to clone; clones drive the same engine.
#[derive(Clone)]
pub struct ConversationSync {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ConversationSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationSync")
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}

impl ConversationSync {
    pub fn new(ctx: &AppContext) -> Self {
        Self::with_settings(ctx.api.clone(), SyncSettings::from(ctx.config.as_ref()))
    }

    pub fn with_settings(api: Arc<dyn MessagingApi>, settings: SyncSettings) -> Self {
        let (events, _) = broadcast::channel(VIEW_EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                api,
                settings,
                state: RwLock::new(SyncState::default()),
                requested: AtomicU64::new(0),
                poller: PollScheduler::new(),
                timers: TimerSet::new(),
                events,
                inline_error: TransientNotice::new(settings.inline_error_duration),
            }),
        }
    }

    fn from_weak(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.inner.events.subscribe()
    }

    /// Scope the engine to a logged-in user
    pub async fn attach_user(&self, user: UserId) {
        let mut state = self.inner.state.write().await;
        tracing::info!("[Sync] Engine attached to user {}", user);
        state.user = Some(user);
    }

    /// Reserve the next place in selection order
    pub fn claim_selection(&self) -> SelectionTicket {
        SelectionTicket(self.inner.requested.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn is_superseded(&self, ticket: SelectionTicket) -> bool {
        ticket.0 != self.inner.requested.load(Ordering::SeqCst)
    }

    /// Open the conversation with `contact`
    ///
    /// A load failure still leaves the engine `Live`: the next poll tick
    /// retries the fetch. The error is returned for logging.
    pub async fn select(&self, contact: ContactId) -> Result<(), ClientError> {
        let ticket = self.claim_selection();
        self.select_claimed(contact, ticket).await
    }

    /// [`Self::select`] with a ticket claimed earlier; a no-op once a later
    /// ticket was claimed
    pub async fn select_claimed(
        &self,
        contact: ContactId,
        ticket: SelectionTicket,
    ) -> Result<(), ClientError> {
        let (epoch, user) = {
            let mut state = self.inner.state.write().await;
            if self.is_superseded(ticket) {
                tracing::debug!("[Sync] Skipping select of {}: a later one was requested", contact);
                return Ok(());
            }
            let user = state.user.clone().ok_or(ValidationError::NotAuthenticated)?;
            self.inner.cancel_timers();
            let epoch = state.reset(Some(contact.clone()), SyncPhase::Loading);
            self.inner.emit(ViewEvent::Cleared {
                contact: Some(contact.clone()),
            });
            self.inner.emit(ViewEvent::PhaseChanged(SyncPhase::Loading));
            (epoch, user)
        };
        tracing::info!("[Sync] Loading conversation with {} (epoch {})", contact, epoch);

        let fetched = self.fetch_conversation(&user, &contact).await;

        let unread = {
            let mut state = self.inner.state.write().await;
            if state.epoch != epoch {
                tracing::debug!("[Sync] Discarding load for {}: selection changed", contact);
                return Ok(());
            }
            let mut messages = match &fetched {
                Ok(messages) => messages.clone(),
                Err(e) => {
                    tracing::warn!("[Sync] Initial load for {} failed: {}", contact, e);
                    Vec::new()
                }
            };
            // a send made while loading owns its bubble until it settles
            messages.retain(|m| {
                let deferred = m.is_from(&user) && state.pending.may_confirm(&state.view, m);
                if deferred {
                    tracing::debug!("[Sync] Deferring {} until its send settles", m.id);
                }
                !deferred
            });
            for (id, index) in state.view.render_batch(messages) {
                if let Some(message) = state.view.get(&id).cloned() {
                    self.inner.emit(ViewEvent::Rendered { message, index });
                }
            }
            state.phase = SyncPhase::Live;
            self.inner.emit(ViewEvent::PhaseChanged(SyncPhase::Live));
            self.start_polling(epoch);

            state
                .view
                .messages()
                .iter()
                .filter(|m| m.is_from(&contact) && m.delivery_state != DeliveryState::Read)
                .map(|m| m.id.clone())
                .collect::<Vec<_>>()
        };

        self.mark_read(epoch, unread).await;
        fetched.map(|_| ())
    }

    /// Close the active conversation; the user stays attached
    pub async fn deselect(&self) {
        self.claim_selection();
        let mut state = self.inner.state.write().await;
        self.inner.cancel_timers();
        let epoch = state.reset(None, SyncPhase::Closed);
        self.inner.emit(ViewEvent::Cleared { contact: None });
        self.inner.emit(ViewEvent::PhaseChanged(SyncPhase::Closed));
        tracing::info!("[Sync] Conversation closed (epoch {})", epoch);
    }

    /// Logout: close the conversation and forget the user
    pub async fn close(&self) {
        self.deselect().await;
        self.inner.state.write().await.user = None;
        self.inner.inline_error.dismiss();
    }

    /// Send `body` to the active contact
    ///
    /// Validation failures are reported before anything is rendered or sent.
    /// On a failed POST the bubble stays, marked `failed`.
    pub async fn send(&self, body: &str) -> Result<Message, ClientError> {
        let body = body.trim();
        let (draft, temp_id, epoch) = {
            let mut guard = self.inner.state.write().await;
            let state = &mut *guard;
            let (user, peer) = match validate_send(body, state) {
                Ok(ids) => ids,
                Err(e) => {
                    drop(guard);
                    self.inner.inline_error.error(e.to_string());
                    return Err(e.into());
                }
            };

            let draft = NewMessage::new(user, peer.clone(), body);
            let temp_id = MessageId::temporary();
            state.pending.begin(
                temp_id.clone(),
                PendingSend {
                    peer,
                    epoch: state.epoch,
                },
            );
            let optimistic = draft.clone().with_id(temp_id.clone());
            if let Some(index) = state.view.render(optimistic.clone()) {
                self.inner.emit(ViewEvent::Rendered {
                    message: optimistic,
                    index,
                });
            }
            (draft, temp_id, state.epoch)
        };
        tracing::debug!("[Sync] Sending {} to {}", temp_id, draft.recipient_id);

        match self.inner.api.create_message(&draft).await {
            Ok(confirmed) => {
                let mut guard = self.inner.state.write().await;
                let state = &mut *guard;
                let resolution = state.pending.commit(&mut state.view, &temp_id, &confirmed);
                let server_id = confirmed.id.clone();
                match resolution {
                    Resolution::Rebound { from, to } => {
                        self.inner.emit(ViewEvent::Rebound { from, to });
                    }
                    Resolution::Merged { dropped, .. } => {
                        self.inner.emit(ViewEvent::Removed { id: dropped });
                    }
                    Resolution::Stale | Resolution::Failed(_) => {
                        tracing::debug!("[Sync] {} confirmed after selection changed", server_id);
                        return Ok(confirmed);
                    }
                }
                if let Some(current) = state.view.get(&server_id) {
                    self.inner.emit(ViewEvent::StateChanged {
                        id: server_id.clone(),
                        state: current.delivery_state,
                    });
                }
                self.schedule_delivered(epoch, server_id.clone());
                tracing::info!("[Sync] Message {} sent", server_id);

                let mut sent = confirmed;
                sent.delivery_state = DeliveryState::Sent;
                Ok(sent)
            }
            Err(e) => {
                tracing::error!("[Sync] Failed to send message: {}", e);
                {
                    let mut guard = self.inner.state.write().await;
                    let state = &mut *guard;
                    if let Resolution::Failed(id) = state.pending.abort(&mut state.view, &temp_id)
                    {
                        self.inner.emit(ViewEvent::StateChanged {
                            id,
                            state: DeliveryState::Failed,
                        });
                    }
                }
                self.inner.inline_error.error(SEND_FAILED_MESSAGE);
                Err(e)
            }
        }
    }

    /// Retry a failed message: the failed bubble is replaced by a new send
    pub async fn resend(&self, id: &MessageId) -> Result<Message, ClientError> {
        let body = {
            let mut state = self.inner.state.write().await;
            let body = match state.view.get(id) {
                Some(m) if m.delivery_state == DeliveryState::Failed => m.body.clone(),
                _ => return Err(ValidationError::NotResendable.into()),
            };
            state.view.remove(id);
            self.inner.emit(ViewEvent::Removed { id: id.clone() });
            body
        };
        tracing::info!("[Sync] Resending failed message {}", id);
        self.send(&body).await
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let state = self.inner.state.read().await;
        self.build_snapshot(&state)
    }

    /// Non-blocking snapshot for the UI thread; `None` while a writer holds
    /// the lock
    pub fn try_snapshot(&self) -> Option<ViewSnapshot> {
        let state = self.inner.state.try_read().ok()?;
        Some(self.build_snapshot(&state))
    }

    pub async fn phase(&self) -> SyncPhase {
        self.inner.state.read().await.phase
    }

    pub async fn active_contact(&self) -> Option<ContactId> {
        self.inner.state.read().await.active.clone()
    }

    pub fn inline_error(&self) -> &TransientNotice {
        &self.inner.inline_error
    }

    pub fn is_polling(&self) -> bool {
        self.inner.poller.is_running()
    }

    /// Delivered-state timers not yet fired
    pub fn pending_timers(&self) -> usize {
        self.inner.timers.pending()
    }

    fn build_snapshot(&self, state: &SyncState) -> ViewSnapshot {
        ViewSnapshot {
            phase: state.phase,
            active_contact: state.active.clone(),
            messages: state.view.messages().to_vec(),
            inline_error: self.inner.inline_error.text(),
        }
    }

    /// Fetch both directions concurrently and merge them in time order
    async fn fetch_conversation(
        &self,
        user: &UserId,
        peer: &ContactId,
    ) -> Result<Vec<Message>, ClientError> {
        let api = &self.inner.api;
        let (incoming, outgoing) =
            try_join(api.list_messages(peer, user), api.list_messages(user, peer)).await?;

        let mut messages = incoming;
        messages.extend(outgoing);
        messages.retain(|m| m.is_between(user, peer));
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }

    fn start_polling(&self, epoch: u64) {
        let weak = Arc::downgrade(&self.inner);
        self.inner
            .poller
            .start(self.inner.settings.poll_interval, move || {
                let engine = Self::from_weak(&weak);
                async move {
                    match engine {
                        Some(engine) => engine.tick(epoch).await,
                        None => false,
                    }
                }
            });
    }

    /// One poll cycle; returns `false` once the epoch is stale
    async fn tick(&self, epoch: u64) -> bool {
        let (user, peer) = {
            let state = self.inner.state.read().await;
            if state.epoch != epoch || state.phase != SyncPhase::Live {
                return false;
            }
            match (state.user.clone(), state.active.clone()) {
                (Some(user), Some(peer)) => (user, peer),
                _ => return false,
            }
        };

        let messages = match self.fetch_conversation(&user, &peer).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("[Sync] Poll for {} failed, retrying next tick: {}", peer, e);
                return true;
            }
        };

        let mut state = self.inner.state.write().await;
        if state.epoch != epoch {
            return false;
        }
        // An own message the view has not seen may be the server copy of a
        // send still in flight; the send's bubble takes its id once it settles.
        let mut added = 0;
        for message in messages {
            if state.view.contains(&message.id) {
                if state.view.advance(&message.id, message.delivery_state) {
                    self.inner.emit(ViewEvent::StateChanged {
                        id: message.id.clone(),
                        state: message.delivery_state,
                    });
                }
            } else if message.is_from(&user) && state.pending.may_confirm(&state.view, &message) {
                tracing::debug!("[Sync] Deferring {} until its send settles", message.id);
            } else if let Some(index) = state.view.render(message.clone()) {
                added += 1;
                self.inner.emit(ViewEvent::Rendered { message, index });
            }
        }
        tracing::debug!("[Sync] Poll for {}: {} new message(s)", peer, added);
        true
    }

    fn schedule_delivered(&self, epoch: u64, id: MessageId) {
        let weak = Arc::downgrade(&self.inner);
        self.inner
            .timers
            .schedule(self.inner.settings.delivered_delay, async move {
                if let Some(engine) = Self::from_weak(&weak) {
                    engine.apply_state(epoch, &id, DeliveryState::Delivered).await;
                }
            });
    }

    async fn apply_state(&self, epoch: u64, id: &MessageId, next: DeliveryState) {
        let mut state = self.inner.state.write().await;
        if state.epoch == epoch && state.view.advance(id, next) {
            self.inner.emit(ViewEvent::StateChanged {
                id: id.clone(),
                state: next,
            });
        }
    }

    /// PATCH the peer's unread messages to `read`; failures are only logged
    async fn mark_read(&self, epoch: u64, ids: Vec<MessageId>) {
        if ids.is_empty() {
            return;
        }
        let api = &self.inner.api;
        let results = join_all(
            ids.iter()
                .map(|id| api.update_delivery_state(id, DeliveryState::Read)),
        )
        .await;
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(_) => self.apply_state(epoch, id, DeliveryState::Read).await,
                Err(e) => tracing::warn!("[Sync] Could not mark {} as read: {}", id, e),
            }
        }
    }
}

/// Check the send preconditions, in the order the user sees them
fn validate_send(body: &str, state: &SyncState) -> Result<(UserId, ContactId), ValidationError> {
    if body.is_empty() {
        return Err(ValidationError::EmptyBody);
    }
    let peer = state.active.clone().ok_or(ValidationError::NoActiveContact)?;
    let user = state.user.clone().ok_or(ValidationError::NotAuthenticated)?;
    Ok((user, peer))
}
