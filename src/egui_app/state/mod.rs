use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use tokio::runtime::Handle;

use crate::egui_app::auth::{AuthError, AuthState, SessionManager};
use crate::egui_app::messaging::{MessagingState, Messenger};
use crate::egui_app::notice::TransientNotice;
use crate::egui_app::AppContext;
use crate::shared::messaging::User;

/// Screen shown in the central panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Auth,
    Messaging,
}

pub type AuthResult = Result<User, AuthError>;

/// Central application state shared across egui views.
pub struct AppState {
    runtime: Handle,
    pub ctx: AppContext,
    pub session: Arc<SessionManager>,
    pub auth_state: AuthState,
    pub current_view: AppView,
    pub username_input: String,
    pub phone_input: String,
    pub is_register_mode: bool,
    pub auth_result: Option<Receiver<AuthResult>>,
    pub register_result: Option<Receiver<AuthResult>>,
    /// Bottom-of-window notices (actions, registration)
    pub snackbar: TransientNotice,
    pub messaging_state: MessagingState,
}

impl AppState {
    /// Build the app on `runtime`; background listeners start right away
    pub fn new(ctx: AppContext, runtime: Handle) -> Self {
        let _guard = runtime.enter();
        let snackbar = TransientNotice::new(ctx.config.snackbar_duration);
        let session = Arc::new(SessionManager::new(&ctx, snackbar.clone()));
        let messenger = Messenger::new(&ctx, snackbar.clone());
        messenger.spawn_listeners();
        let messaging_state = MessagingState::new(runtime.clone(), messenger, snackbar.clone());

        Self {
            runtime,
            ctx,
            session,
            auth_state: AuthState::new(),
            current_view: AppView::Auth,
            username_input: String::new(),
            phone_input: String::new(),
            is_register_mode: false,
            auth_result: None,
            register_result: None,
            snackbar,
            messaging_state,
        }
    }

    /// Reopen the persisted session, if any
    pub fn restore_session(&mut self) {
        let _guard = self.runtime.enter();
        if let Some(user) = self.session.restore() {
            self.enter_messaging(user);
        }
    }

    pub fn check_auth_result(&mut self) {
        if let Some(ref rx) = self.auth_result {
            if let Ok(result) = rx.try_recv() {
                self.auth_result = None;
                self.auth_state.loading = false;

                match result {
                    Ok(user) => {
                        tracing::info!("Authentication successful: {}", user.username);
                        self.enter_messaging(user);
                    }
                    Err(e) => {
                        tracing::debug!("Authentication failed: {}", e);
                        self.auth_state.set_error(e.to_string());
                    }
                }
            }
        }

        if let Some(ref rx) = self.register_result {
            if let Ok(result) = rx.try_recv() {
                self.register_result = None;
                self.auth_state.loading = false;

                match result {
                    Ok(_) => {
                        self.is_register_mode = false;
                        self.username_input.clear();
                        self.phone_input.clear();
                        self.auth_state.clear_error();
                    }
                    Err(e) => self.auth_state.set_error(e.to_string()),
                }
            }
        }
    }

    fn enter_messaging(&mut self, user: User) {
        self.auth_state.user = Some(user);
        self.auth_state.error = None;
        self.current_view = AppView::Messaging;
        self.username_input.clear();
        self.phone_input.clear();
    }

    pub fn handle_login(&mut self) {
        self.auth_state.loading = true;
        self.auth_state.error = None;

        let username = self.username_input.clone();
        let phone = self.phone_input.clone();
        let session = self.session.clone();

        let (tx, rx) = channel();
        self.runtime.spawn(async move {
            let result = session.authenticate(&username, &phone).await;
            let _ = tx.send(result);
        });

        self.auth_result = Some(rx);
    }

    pub fn handle_register(&mut self) {
        self.auth_state.loading = true;
        self.auth_state.error = None;

        let username = self.username_input.clone();
        let phone = self.phone_input.clone();
        let session = self.session.clone();

        let (tx, rx) = channel();
        self.runtime.spawn(async move {
            let result = session.register(&username, &phone).await;
            let _ = tx.send(result);
        });

        self.register_result = Some(rx);
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.auth_state = AuthState::new();
        self.current_view = AppView::Auth;
        self.username_input.clear();
        self.phone_input.clear();
        self.messaging_state.reset();
    }

    pub fn toggle_auth_mode(&mut self) {
        self.is_register_mode = !self.is_register_mode;
        self.auth_state.clear_error();
    }
}
