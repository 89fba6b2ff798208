//! Chat Message Data Structure
//!
//! Represents a direct message between two users and its delivery lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::id::{MessageId, UserId};

/// Lifecycle of a message from creation to read receipt
///
/// States only move forward: `Sending -> Sent -> Delivered -> Read`, or
/// `Sending -> Failed`, which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryState {
    #[default]
    Sending,
    Sent,
    Delivered,
    Read,
    Failed,
}

impl DeliveryState {
    fn rank(self) -> u8 {
        match self {
            DeliveryState::Sending => 0,
            DeliveryState::Sent => 1,
            DeliveryState::Delivered => 2,
            DeliveryState::Read => 3,
            DeliveryState::Failed => u8::MAX,
        }
    }

    /// Whether moving from `self` to `next` respects the lifecycle ordering
    pub fn can_advance_to(self, next: DeliveryState) -> bool {
        match (self, next) {
            (DeliveryState::Failed, _) => false,
            (DeliveryState::Sending, DeliveryState::Failed) => true,
            (_, DeliveryState::Failed) => false,
            (current, next) => next.rank() > current.rank(),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DeliveryState::Read | DeliveryState::Failed)
    }

    /// Parse the wire name; anything unrecognized is treated as `Sent`,
    /// since the backend only stores messages it has accepted.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "sending" => DeliveryState::Sending,
            "sent" => DeliveryState::Sent,
            "delivered" => DeliveryState::Delivered,
            "read" => DeliveryState::Read,
            "failed" => DeliveryState::Failed,
            _ => DeliveryState::Sent,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryState::Sending => "sending",
            DeliveryState::Sent => "sent",
            DeliveryState::Delivered => "delivered",
            DeliveryState::Read => "read",
            DeliveryState::Failed => "failed",
        }
    }
}

impl fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeliveryState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(DeliveryState::from_wire(&raw))
    }
}

/// A message as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    #[serde(alias = "fromUserId", alias = "from", alias = "sender")]
    pub sender_id: UserId,
    #[serde(alias = "toUserId", alias = "to", alias = "receiverId")]
    pub recipient_id: UserId,
    #[serde(alias = "content", alias = "text")]
    pub body: String,
    #[serde(alias = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "status")]
    pub delivery_state: DeliveryState,
}

impl Message {
    /// Whether the message belongs to the conversation between `a` and `b`
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        (&self.sender_id == a && &self.recipient_id == b)
            || (&self.sender_id == b && &self.recipient_id == a)
    }

    pub fn is_from(&self, user: &UserId) -> bool {
        &self.sender_id == user
    }

    /// Get a preview of the message (first N characters)
    pub fn preview(&self, max_len: usize) -> String {
        if self.body.chars().count() <= max_len {
            self.body.clone()
        } else {
            let mut preview: String = self.body.chars().take(max_len).collect();
            preview.push_str("...");
            preview
        }
    }
}

/// Body of `POST /messages`: a message the backend has not assigned an id to yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub delivery_state: DeliveryState,
}

impl NewMessage {
    pub fn new(sender_id: UserId, recipient_id: UserId, body: impl Into<String>) -> Self {
        Self {
            sender_id,
            recipient_id,
            body: body.into(),
            created_at: Utc::now(),
            delivery_state: DeliveryState::Sending,
        }
    }

    pub fn with_id(self, id: MessageId) -> Message {
        Message {
            id,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            body: self.body,
            created_at: self.created_at,
            delivery_state: self.delivery_state,
        }
    }
}

/// Body of `PATCH /messages/:id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatePatch {
    pub delivery_state: DeliveryState,
}
