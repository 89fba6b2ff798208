//! Application Context
//!
//! The handles every component needs, bundled once and passed to each
//! constructor: configuration, the backend API, the event bus and the
//! session store. Cloning is cheap; all clones share the same handles.

use std::sync::Arc;

use crate::egui_app::api::{HttpApi, MessagingApi};
use crate::egui_app::config::Config;
use crate::egui_app::session_store::SessionStore;
use crate::shared::{AppConfig, EventBus};

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub api: Arc<dyn MessagingApi>,
    pub events: EventBus,
    pub session: Arc<SessionStore>,
}

impl AppContext {
    pub fn new(config: AppConfig, api: Arc<dyn MessagingApi>) -> Self {
        let session = SessionStore::from_path(config.session_path.as_deref());
        Self {
            config: Arc::new(config),
            api,
            events: EventBus::new(),
            session: Arc::new(session),
        }
    }

    /// Production wiring: reqwest client against the configured server
    pub fn http(config: Config) -> Self {
        let api = Arc::new(HttpApi::new(config.clone()));
        Self::new(config.app().clone(), api)
    }

    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = Arc::new(session);
        self
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
