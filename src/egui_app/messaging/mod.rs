//! Messaging Module
//!
//! The sync engine for the open conversation, the contact and group
//! directories, conversation actions, the inbox watcher, and the egui views
//! that draw them.

pub mod view;
pub mod optimistic;
pub mod conversation_sync;
pub mod contacts;
pub mod groups;
pub mod conversation_actions;
pub mod inbox;
pub mod messenger;

pub mod state;
pub mod main_layout;
pub mod sidebar;
pub mod chat_area;
pub mod components;

pub use contacts::{ContactDirectory, ContactEntry};
pub use conversation_actions::{ConversationAction, ConversationActions};
pub use conversation_sync::{
    ConversationSync, SelectionTicket, SyncPhase, SyncSettings, ViewEvent, ViewSnapshot,
};
pub use groups::GroupDirectory;
pub use inbox::InboxWatcher;
pub use main_layout::render_messaging_view;
pub use messenger::Messenger;
pub use state::MessagingState;
pub use view::ConversationView;
