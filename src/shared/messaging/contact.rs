//! Contact Data Structure
//!
//! Represents an entry in a user's address book.

use serde::{Deserialize, Serialize};

use super::id::{ContactId, UserId};

/// Represents a contact in the messaging system
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Unique contact ID, also the peer id used for conversations
    pub id: ContactId,
    /// The user who owns this contact entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Name shown in the contact list
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(alias = "phone")]
    pub phone_number: String,
    #[serde(default, alias = "avatar", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Set once the owner blocks this contact
    #[serde(default)]
    pub blocked: bool,
}

impl Contact {
    /// Get avatar initial (first letter of the display name)
    pub fn avatar_initial(&self) -> char {
        self.display_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('?')
    }

    /// Case-insensitive match on display name or phone number
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.display_name.to_lowercase().contains(&query)
            || self.phone_number.to_lowercase().contains(&query)
    }
}

/// Body of `POST /contacts`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub user_id: UserId,
    pub display_name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
