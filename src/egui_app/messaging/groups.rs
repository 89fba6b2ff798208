//! Group Directory
//!
//! CRUD over groups and their membership. The creator is the admin and is
//! always a member; a group needs at least two members. Every successful
//! mutation publishes [`AppEvent::GroupModified`], and the directory's
//! refresh listener refetches the list when it sees one.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::egui_app::api::MessagingApi;
use crate::egui_app::context::AppContext;
use crate::egui_app::error::ClientError;
use crate::shared::messaging::{Group, GroupId, GroupPatch, NewGroup, UserId};
use crate::shared::{AppEvent, EventBus, ValidationError};

/// Shown when creating or editing a group fails on the backend
pub const GROUP_SAVE_FAILED_MESSAGE: &str = "Erreur lors de l'enregistrement du groupe.";

const MIN_MEMBERS: usize = 2;

pub struct GroupDirectory {
    api: Arc<dyn MessagingApi>,
    events: EventBus,
    groups: RwLock<Vec<Group>>,
}

impl std::fmt::Debug for GroupDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupDirectory")
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

impl GroupDirectory {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            api: ctx.api.clone(),
            events: ctx.events.clone(),
            groups: RwLock::new(Vec::new()),
        }
    }

    pub async fn fetch(&self) -> Result<Vec<Group>, ClientError> {
        let groups = self.api.list_groups().await?;
        *self.groups.write().await = groups.clone();
        tracing::debug!("Loaded {} groups", groups.len());
        Ok(groups)
    }

    pub async fn groups(&self) -> Vec<Group> {
        self.groups.read().await.clone()
    }

    pub fn try_groups(&self) -> Option<Vec<Group>> {
        self.groups.try_read().ok().map(|g| g.clone())
    }

    pub async fn find(&self, id: &GroupId) -> Option<Group> {
        self.groups.read().await.iter().find(|g| &g.id == id).cloned()
    }

    /// Create a group administered by `admin`
    pub async fn create(
        &self,
        admin: &UserId,
        name: &str,
        members: Vec<UserId>,
    ) -> Result<Group, ClientError> {
        let name = name.trim();
        let members = with_admin(admin, members);
        validate_group(name, &members)?;

        let new_group = NewGroup {
            name: name.to_string(),
            members,
            admin_id: admin.clone(),
            created_at: Utc::now(),
        };
        let group = self.api.create_group(&new_group).await?;
        tracing::info!("Group {} created by {}", group.id, admin);
        self.events.publish(AppEvent::GroupModified);
        Ok(group)
    }

    /// Rename a group and/or replace its members
    pub async fn edit(
        &self,
        id: &GroupId,
        name: Option<&str>,
        members: Option<Vec<UserId>>,
    ) -> Result<Group, ClientError> {
        let current = self
            .find(id)
            .await
            .ok_or(ValidationError::GroupNotFound)?;

        let name = name.map(str::trim).map(str::to_string);
        let members = members.map(|m| with_admin(&current.admin_id, m));
        validate_group(
            name.as_deref().unwrap_or(&current.name),
            members.as_deref().unwrap_or(&current.members),
        )?;

        self.apply(id, GroupPatch { name, members }).await
    }

    /// Add `user` to a group; `Ok(None)` when already a member
    pub async fn add_member(
        &self,
        id: &GroupId,
        user: &UserId,
    ) -> Result<Option<Group>, ClientError> {
        let current = self
            .find(id)
            .await
            .ok_or(ValidationError::GroupNotFound)?;
        if current.is_member(user) {
            return Ok(None);
        }
        let mut members = current.members;
        members.push(user.clone());
        let patch = GroupPatch {
            name: None,
            members: Some(members),
        };
        self.apply(id, patch).await.map(Some)
    }

    /// Remove `user` from a group; the admin cannot be removed
    pub async fn remove_member(&self, id: &GroupId, user: &UserId) -> Result<Group, ClientError> {
        let current = self
            .find(id)
            .await
            .ok_or(ValidationError::GroupNotFound)?;
        if current.is_admin(user) {
            return Err(ValidationError::CannotRemoveAdmin.into());
        }
        let members: Vec<UserId> = current
            .members
            .into_iter()
            .filter(|m| m != user)
            .collect();
        let patch = GroupPatch {
            name: None,
            members: Some(members),
        };
        self.apply(id, patch).await
    }

    async fn apply(&self, id: &GroupId, patch: GroupPatch) -> Result<Group, ClientError> {
        let updated = self.api.update_group(id, &patch).await?;
        tracing::info!("Group {} updated", id);
        self.events.publish(AppEvent::GroupModified);
        Ok(updated)
    }

    /// Refetch on every `GroupModified`; runs until the handle is aborted
    pub fn spawn_refresh_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let directory = Arc::clone(self);
        let mut events = self.events.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AppEvent::GroupModified) => {
                        if let Err(e) = directory.fetch().await {
                            tracing::warn!("Group refresh failed: {}", e);
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Group listener lagged by {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    pub async fn clear(&self) {
        self.groups.write().await.clear();
    }
}

/// Put the admin first if missing and drop duplicates, keeping order
pub fn with_admin(admin: &UserId, members: Vec<UserId>) -> Vec<UserId> {
    let mut result = Vec::with_capacity(members.len() + 1);
    if !members.contains(admin) {
        result.push(admin.clone());
    }
    for member in members {
        if !result.contains(&member) {
            result.push(member);
        }
    }
    result
}

pub fn validate_group(name: &str, members: &[UserId]) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::GroupNameRequired);
    }
    if members.len() < MIN_MEMBERS {
        return Err(ValidationError::GroupTooSmall);
    }
    Ok(())
}
