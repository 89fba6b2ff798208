//! Shared Module
//!
//! Types that do not depend on the UI: the wire data model, validation
//! errors, the event bus and the application configuration.
//!
//! # Overview
//!
//! Everything in here is plain data plus small pure helpers, so it can be
//! exercised from unit tests without a runtime or a window.

/// Application event bus
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Messaging data model (messages, contacts, users, groups)
pub mod messaging;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError, FileConfig};
pub use error::ValidationError;
pub use event::{AppEvent, EventBus};
