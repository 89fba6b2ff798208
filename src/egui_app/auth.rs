/**
 * Authentication Module
 *
 * Login by username + phone lookup, account creation, session restore and
 * logout. Successful logins and restores publish `AppEvent::LoggedIn`;
 * logout publishes `AppEvent::LoggedOut`. The rest of the app reacts to
 * those events rather than to this module.
 */

use std::sync::Arc;
use thiserror::Error;

use crate::egui_app::api::{MessagingApi, UserQuery};
use crate::egui_app::context::AppContext;
use crate::egui_app::error::ClientError;
use crate::egui_app::notice::TransientNotice;
use crate::egui_app::session_store::SessionStore;
use crate::shared::error::{validate_phone, validate_username};
use crate::shared::messaging::{NewUser, User};
use crate::shared::{AppEvent, EventBus, ValidationError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Nom d'utilisateur ou numéro incorrect.")]
    InvalidCredentials,

    /// Any failure talking to the backend
    #[error("Erreur de connexion au serveur.")]
    Server(#[source] ClientError),
}

impl From<ClientError> for AuthError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Validation(e) => Self::Validation(e),
            other => Self::Server(other),
        }
    }
}

/// Login/register form state
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub error: Option<String>,
    pub loading: bool,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
        self.loading = false;
    }
}

pub fn welcome_message(username: &str) -> String {
    format!("Compte créé avec succès ! Bienvenue {}", username)
}

pub struct SessionManager {
    api: Arc<dyn MessagingApi>,
    events: EventBus,
    store: Arc<SessionStore>,
    notices: TransientNotice,
}

impl SessionManager {
    pub fn new(ctx: &AppContext, notices: TransientNotice) -> Self {
        Self {
            api: ctx.api.clone(),
            events: ctx.events.clone(),
            store: ctx.session.clone(),
            notices,
        }
    }

    /// Log in with a username and phone number
    ///
    /// The first user matching both fields wins.
    pub async fn authenticate(&self, username: &str, phone: &str) -> Result<User, AuthError> {
        let (username, phone) = (username.trim(), phone.trim());
        if username.is_empty() || phone.is_empty() {
            return Err(ValidationError::MissingCredentials.into());
        }

        let users = self
            .api
            .find_users(&UserQuery::credentials(username, phone))
            .await
            .map_err(|e| {
                tracing::error!("Login request failed: {}", e);
                AuthError::Server(e)
            })?;
        let user = users.into_iter().next().ok_or_else(|| {
            tracing::info!("Login rejected for {}", username);
            AuthError::InvalidCredentials
        })?;

        if let Err(e) = self.store.save(&user) {
            tracing::warn!("Could not persist session: {}", e);
        }
        tracing::info!("User {} logged in", user.username);
        self.events.publish(AppEvent::LoggedIn(user.clone()));
        Ok(user)
    }

    /// Log back in from the persisted session, if there is one
    pub fn restore(&self) -> Option<User> {
        let user = match self.store.load() {
            Ok(user) => user?,
            Err(e) => {
                tracing::warn!("Ignoring unreadable session: {}", e);
                return None;
            }
        };
        tracing::info!("Session restored for {}", user.username);
        self.events.publish(AppEvent::LoggedIn(user.clone()));
        Some(user)
    }

    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Could not clear session: {}", e);
        }
        tracing::info!("User logged out");
        self.events.publish(AppEvent::LoggedOut);
    }

    /// Create an account; the user still has to log in afterwards
    pub async fn register(&self, username: &str, phone: &str) -> Result<User, AuthError> {
        let (username, phone) = (username.trim(), phone.trim());
        if username.is_empty() || phone.is_empty() {
            return Err(ValidationError::MissingRegistrationFields.into());
        }
        validate_username(username)?;
        validate_phone(phone)?;

        if !self.api.find_users(&UserQuery::username(username)).await?.is_empty() {
            return Err(ValidationError::UsernameTaken.into());
        }
        if !self.api.find_users(&UserQuery::phone(phone)).await?.is_empty() {
            return Err(ValidationError::PhoneTaken.into());
        }

        let created = self
            .api
            .create_user(&NewUser::new(username, phone))
            .await?;
        tracing::info!("Account {} created", created.username);
        self.notices.success(welcome_message(&created.username));
        Ok(created)
    }
}
