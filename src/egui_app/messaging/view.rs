//! Conversation View
//!
//! The ordered, duplicate-free list of messages shown in the chat pane,
//! together with its render cache (the set of ids already materialized).
//!
//! Entries are kept in `created_at` order. A new entry goes after every
//! existing entry whose timestamp is less than or equal to its own, so ties
//! keep arrival order and the list never decreases in time.

use std::collections::HashSet;

use crate::shared::messaging::{DeliveryState, Message, MessageId};

#[derive(Debug, Default, Clone)]
pub struct ConversationView {
    entries: Vec<Message>,
    rendered: HashSet<MessageId>,
}

impl ConversationView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.rendered.clear();
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.rendered.contains(id)
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.entries.iter().find(|m| &m.id == id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a message unless its id was already rendered
    ///
    /// Returns the index it was inserted at.
    pub fn render(&mut self, message: Message) -> Option<usize> {
        if !self.rendered.insert(message.id.clone()) {
            return None;
        }
        let index = self
            .entries
            .partition_point(|e| e.created_at <= message.created_at);
        self.entries.insert(index, message);
        Some(index)
    }

    /// Stable-sort a batch by `created_at` and render each new message
    ///
    /// Returns the ids actually added, in view order.
    pub fn render_batch(&mut self, mut batch: Vec<Message>) -> Vec<(MessageId, usize)> {
        batch.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let mut added = Vec::new();
        for message in batch {
            let id = message.id.clone();
            if let Some(index) = self.render(message) {
                added.push((id, index));
            }
        }
        added
    }

    /// Move an entry to `next` if that is a forward transition
    pub fn advance(&mut self, id: &MessageId, next: DeliveryState) -> bool {
        match self.entries.iter_mut().find(|m| &m.id == id) {
            Some(entry) if entry.delivery_state.can_advance_to(next) => {
                entry.delivery_state = next;
                true
            }
            _ => false,
        }
    }

    /// Re-key an entry from `from` to `to`, keeping its position
    ///
    /// Fails if `from` is unknown or `to` is already rendered.
    pub fn rebind(&mut self, from: &MessageId, to: &MessageId) -> bool {
        if self.rendered.contains(to) || !self.rendered.contains(from) {
            return false;
        }
        let Some(entry) = self.entries.iter_mut().find(|m| &m.id == from) else {
            return false;
        };
        entry.id = to.clone();
        self.rendered.remove(from);
        self.rendered.insert(to.clone());
        true
    }

    pub fn remove(&mut self, id: &MessageId) -> Option<Message> {
        let index = self.entries.iter().position(|m| &m.id == id)?;
        self.rendered.remove(id);
        Some(self.entries.remove(index))
    }
}
