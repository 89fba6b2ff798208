//! Conversation Actions
//!
//! The chat header menu: archive or delete the open conversation, delete it
//! together with the contact, or block the contact. On success the contact
//! leaves the sidebar, the chat pane closes if it showed that contact, and a
//! snackbar confirms; on failure the snackbar says what went wrong.

use std::sync::Arc;

use super::contacts::ContactDirectory;
use super::conversation_sync::ConversationSync;
use crate::egui_app::api::MessagingApi;
use crate::egui_app::context::AppContext;
use crate::egui_app::error::ClientError;
use crate::egui_app::notice::TransientNotice;
use crate::shared::messaging::ContactId;
use crate::shared::{AppEvent, EventBus, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationAction {
    Archive,
    Delete,
    /// Delete the conversation and the contact
    DeletePermanently,
    Block,
}

impl ConversationAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Archive => "Archiver",
            Self::Delete => "Supprimer la conversation",
            Self::DeletePermanently => "Supprimer définitivement",
            Self::Block => "Bloquer",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Self::Archive => "Conversation archivée !",
            Self::Delete => "Conversation supprimée !",
            Self::DeletePermanently => "Conversation et contact supprimés !",
            Self::Block => "Contact bloqué !",
        }
    }

    /// Transport failures and backend refusals read differently
    pub fn failure_message(self, error: &ClientError) -> &'static str {
        match (self, error.is_transport()) {
            (Self::Archive, true) => "Erreur réseau lors de l'archivage.",
            (Self::Archive, false) => "Erreur lors de l'archivage.",
            (Self::Delete, true) => "Erreur réseau lors de la suppression.",
            (Self::Delete, false) => "Erreur lors de la suppression de la conversation.",
            (Self::DeletePermanently, true) => "Erreur réseau lors de la suppression définitive.",
            (Self::DeletePermanently, false) => "Erreur lors de la suppression définitive.",
            (Self::Block, true) => "Erreur réseau lors du blocage.",
            (Self::Block, false) => "Erreur lors du blocage.",
        }
    }
}

pub struct ConversationActions {
    api: Arc<dyn MessagingApi>,
    events: EventBus,
    contacts: Arc<ContactDirectory>,
    engine: ConversationSync,
    snackbar: TransientNotice,
}

impl ConversationActions {
    pub fn new(
        ctx: &AppContext,
        contacts: Arc<ContactDirectory>,
        engine: ConversationSync,
        snackbar: TransientNotice,
    ) -> Self {
        Self {
            api: ctx.api.clone(),
            events: ctx.events.clone(),
            contacts,
            engine,
            snackbar,
        }
    }

    pub async fn archive(&self, contact: Option<ContactId>) -> Result<(), ClientError> {
        self.run(ConversationAction::Archive, contact).await
    }

    pub async fn delete(&self, contact: Option<ContactId>) -> Result<(), ClientError> {
        self.run(ConversationAction::Delete, contact).await
    }

    pub async fn delete_permanently(&self, contact: Option<ContactId>) -> Result<(), ClientError> {
        self.run(ConversationAction::DeletePermanently, contact).await
    }

    pub async fn block(&self, contact: Option<ContactId>) -> Result<(), ClientError> {
        self.run(ConversationAction::Block, contact).await
    }

    /// Run `action` against the current contact
    pub async fn run(
        &self,
        action: ConversationAction,
        contact: Option<ContactId>,
    ) -> Result<(), ClientError> {
        let Some(contact) = contact else {
            let error = ValidationError::NoCurrentContact;
            self.snackbar.info(error.to_string());
            return Err(error.into());
        };

        match self.perform(action, &contact).await {
            Ok(()) => {
                self.contacts.remove(&contact).await;
                if self.engine.active_contact().await.as_ref() == Some(&contact) {
                    self.engine.deselect().await;
                }
                self.events.publish(AppEvent::ContactsChanged);
                self.snackbar.success(action.success_message());
                tracing::info!("{:?} applied to {}", action, contact);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("{:?} failed for {}: {}", action, contact, e);
                self.snackbar.error(action.failure_message(&e));
                Err(e)
            }
        }
    }

    async fn perform(
        &self,
        action: ConversationAction,
        contact: &ContactId,
    ) -> Result<(), ClientError> {
        match action {
            ConversationAction::Archive => self.api.archive_conversation(contact).await,
            ConversationAction::Delete => self.api.delete_conversation(contact).await,
            ConversationAction::Block => self.api.block_contact(contact).await,
            ConversationAction::DeletePermanently => {
                // both requests go out even if the first one fails
                let conversation = self.api.delete_conversation(contact).await;
                let contact = self.api.delete_contact(contact).await;
                conversation.and(contact)
            }
        }
    }
}
