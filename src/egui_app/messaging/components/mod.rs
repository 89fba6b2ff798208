//! Messaging UI Components
//!
//! Reusable pieces of the messaging view.

pub mod search_bar;
pub mod contact_list;
pub mod contact_item;
pub mod chat_header;
pub mod message_list;
pub mod message_bubble;
pub mod input_bar;
pub mod group_panel;
