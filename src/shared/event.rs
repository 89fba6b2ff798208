/**
 * Application Event Bus
 *
 * Typed events exchanged between the session, the directories, the inbox
 * watcher and the UI. Events are broadcast using `tokio::sync::broadcast`,
 * so every subscriber receives its own copy and publishing never blocks.
 */
use tokio::sync::broadcast;

use super::messaging::{ContactId, MessageId, User};

/// Capacity of the broadcast channel; slow subscribers see `Lagged`
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A user authenticated, or a persisted session was restored
    LoggedIn(User),
    LoggedOut,
    /// A group was created or its name/membership changed
    GroupModified,
    /// The contact list changed (added, blocked or removed)
    ContactsChanged,
    /// The inbox watcher saw a message for a conversation that is not open
    NewMessage {
        contact_id: ContactId,
        message_id: MessageId,
        preview: String,
    },
}

/// Cloneable handle over a broadcast channel of [`AppEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish an event
    ///
    /// Returns the number of subscribers that received it (0 if none).
    pub fn publish(&self, event: AppEvent) -> usize {
        match self.tx.send(event) {
            Ok(count) => {
                tracing::debug!("[EventBus] Event delivered to {} subscribers", count);
                count
            }
            Err(e) => {
                tracing::debug!("[EventBus] No subscribers for event: {:?}", e.0);
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }
}
