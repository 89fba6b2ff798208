//! wachat - Main Library
//!
//! wachat is a WhatsApp-style desktop messaging client for a plain REST
//! backend. The backend never pushes anything, so the client polls: the
//! open conversation is refreshed on a short interval, the inbox on a longer
//! one, and every send is shown immediately under a temporary id that is
//! swapped for the server id once the POST returns.
//!
//! # Module Structure
//!
//! - **`shared`** - Types that do not depend on the UI
//!   - Messages, contacts, users, groups and their ids
//!   - Validation errors with the user-facing texts
//!   - Event bus and configuration
//!
//! - **`egui_app`** - Native desktop app (egui/eframe)
//!   - REST client, session persistence, login and registration
//!   - Conversation sync engine, contact and group directories
//!   - Inbox watcher and conversation actions
//!   - Views and theme
//!
//! # Usage
//!
//! ```rust,no_run
//! use wachat::egui_app::{AppContext, Config};
//! use wachat::egui_app::messaging::ConversationSync;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = AppContext::http(Config::load()?);
//! let engine = ConversationSync::new(&ctx);
//! engine.attach_user("7".into()).await;
//! engine.select("42".into()).await?;
//! engine.send("hello").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - **Sync components**: state behind `tokio::sync::RwLock`, never held
//!   across a request; background work in tokio tasks that are aborted on
//!   deselect or logout
//! - **Native**: egui is single-threaded immediate mode; results of async
//!   work reach it through `std::sync::mpsc` channels polled each frame
//!
//! # Error Handling
//!
//! - `shared::error::ValidationError` for rejected input
//! - `egui_app::error::ClientError` for transport, server, decode and storage
//!   failures
//! - `egui_app::auth::AuthError` for login and registration

/// Shared types and data structures
pub mod shared;

/// egui native desktop app
/// Only compiled for native targets (not WASM)
#[cfg(not(target_arch = "wasm32"))]
pub mod egui_app;
