//! egui Native Desktop App Module
//!
//! A WhatsApp-style client for a REST backend that only answers requests:
//! conversations are kept current by polling, and sends are shown
//! optimistically before the server confirms them.
//!
//! # Architecture
//!
//! - **`config`** - configuration loading (file, environment)
//! - **`api`** - the [`MessagingApi`](api::MessagingApi) trait and its reqwest implementation
//! - **`context`** - [`AppContext`], the handles every component is built from
//! - **`auth`** - login, registration, session restore and logout
//! - **`session_store`** - the persisted `currentUser` document
//! - **`messaging`** - sync engine, directories, inbox watcher and their views
//! - **`sync`** - poll loop and one-shot timers
//! - **`notice`** - self-clearing inline errors and snackbars
//! - **`state`**, **`views`**, **`theme`** - egui state and rendering
//!
//! # Module Structure
//!
//! ```text
//! egui_app/
//! ├── mod.rs           - Module exports and documentation
//! ├── main.rs          - Binary entry point
//! ├── config.rs        - Configuration management
//! ├── api.rs           - REST client
//! ├── auth.rs          - Session manager
//! ├── messaging/       - Conversation sync and messaging UI
//! ├── sync/            - Timers
//! ├── state/           - App state
//! ├── views/           - Screens
//! └── theme/           - Colors and frames
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! // Run the desktop app:
//! // cargo run --bin wachat
//! ```

pub mod config;
pub mod error;
pub mod api;
pub mod context;
pub mod session_store;
pub mod notice;
pub mod auth;
pub mod sync;
pub mod messaging;
pub mod state;
pub mod views;
pub mod theme;

// Re-export commonly used types
pub use auth::{AuthError, AuthState, SessionManager};
pub use config::Config;
pub use context::AppContext;
pub use error::ClientError;
pub use state::{AppState, AppView};
