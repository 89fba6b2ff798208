//! # Optimistic Sends
//!
//! Bookkeeping for messages shown before the backend confirmed them.
//!
//! Reconciliation is a two-phase commit keyed by the temporary id:
//!
//! 1. [`PendingSends::begin`] records the send and the view renders the bubble
//!    under its temporary id.
//! 2. When the request settles, [`PendingSends::commit`] or
//!    [`PendingSends::abort`] takes the entry out of the map and applies the
//!    outcome to the view. An entry can only be taken once, so a temporary id
//!    is replaced at most once.
//!
//! If the entry is gone (the conversation was switched or closed in between)
//! the outcome is [`Resolution::Stale`] and the view is left alone.

use std::collections::HashMap;

use super::view::ConversationView;
use crate::shared::messaging::{ContactId, DeliveryState, Message, MessageId};

/// A send awaiting the backend's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub peer: ContactId,
    /// Selection epoch the send was issued in
    pub epoch: u64,
}

/// Outcome of settling a pending send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The temporary entry now carries the server id
    Rebound { from: MessageId, to: MessageId },
    /// The server id was already rendered; the temporary entry was dropped
    Merged { dropped: MessageId, into: MessageId },
    /// The temporary entry was marked failed
    Failed(MessageId),
    /// Nothing was pending under that id
    Stale,
}

#[derive(Debug, Default)]
pub struct PendingSends {
    entries: HashMap<MessageId, PendingSend>,
}

impl PendingSends {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, temp_id: MessageId, send: PendingSend) {
        self.entries.insert(temp_id, send);
    }

    pub fn is_pending(&self, temp_id: &MessageId) -> bool {
        self.entries.contains_key(temp_id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether `message` may be the server copy of a send still in flight:
    /// same recipient and same body as one of the temporary bubbles
    pub fn may_confirm(&self, view: &ConversationView, message: &Message) -> bool {
        self.entries.iter().any(|(temp_id, send)| {
            send.peer == message.recipient_id
                && view.get(temp_id).is_some_and(|temp| temp.body == message.body)
        })
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Apply a successful response: swap the temporary id for the server's
    /// and advance the bubble to `sent`
    pub fn commit(
        &mut self,
        view: &mut ConversationView,
        temp_id: &MessageId,
        confirmed: &Message,
    ) -> Resolution {
        if self.entries.remove(temp_id).is_none() {
            return Resolution::Stale;
        }
        let server_id = confirmed.id.clone();

        let resolution = if view.rebind(temp_id, &server_id) {
            Resolution::Rebound {
                from: temp_id.clone(),
                to: server_id.clone(),
            }
        } else if view.contains(&server_id) {
            view.remove(temp_id);
            Resolution::Merged {
                dropped: temp_id.clone(),
                into: server_id.clone(),
            }
        } else {
            // temporary bubble no longer in the view; show the server copy
            let mut copy = confirmed.clone();
            copy.delivery_state = DeliveryState::Sending;
            view.render(copy);
            Resolution::Rebound {
                from: temp_id.clone(),
                to: server_id.clone(),
            }
        };
        view.advance(&server_id, DeliveryState::Sent);
        resolution
    }

    /// Apply a failed request: the bubble stays, marked `failed`
    pub fn abort(&mut self, view: &mut ConversationView, temp_id: &MessageId) -> Resolution {
        if self.entries.remove(temp_id).is_none() {
            return Resolution::Stale;
        }
        view.advance(temp_id, DeliveryState::Failed);
        Resolution::Failed(temp_id.clone())
    }
}
