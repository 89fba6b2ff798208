//! Opaque Identifiers
//!
//! Every backend entity (user, contact, message, group) is identified by an
//! opaque string. Collection backends hand out either strings or integers,
//! so deserialization accepts both and normalizes to a string.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix of identifiers minted locally for optimistic messages
const TEMPORARY_PREFIX: &str = "local-";

/// Opaque entity identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

pub type UserId = Id;
pub type ContactId = Id;
pub type MessageId = Id;
pub type GroupId = Id;

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Mint a fresh client-side identifier for a message that the backend
    /// has not confirmed yet.
    pub fn temporary() -> Self {
        Self(format!("{}{}", TEMPORARY_PREFIX, Uuid::new_v4()))
    }

    /// Whether this id was minted by [`Id::temporary`]
    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMPORARY_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Id(s),
            RawId::Signed(n) => Id(n.to_string()),
            RawId::Unsigned(n) => Id(n.to_string()),
        })
    }
}
