//! User account as stored in the backend's user collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Body of `POST /users`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub is_admin: bool,
    pub is_active: bool,
}

impl NewUser {
    pub fn new(username: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            phone: phone.into(),
            created_at: Utc::now(),
            is_admin: false,
            is_active: true,
        }
    }
}
