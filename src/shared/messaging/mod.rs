//! Messaging Module
//!
//! This module contains all the data structures exchanged with the REST backend:
//!
//! - `Id` - Opaque identifier shared by every entity
//! - `Message` - A direct message and its `DeliveryState`
//! - `Contact` - An address book entry
//! - `User` - A registered account
//! - `Group` - A named set of members with an admin
//!
//! # Usage
//!
//! ```rust
//! use wachat::shared::messaging::{Contact, DeliveryState, Message, NewMessage};
//! ```

pub mod contact;
pub mod group;
pub mod id;
pub mod message;
pub mod user;

// Re-export all types
pub use contact::{Contact, NewContact};
pub use group::{Group, GroupPatch, NewGroup};
pub use id::{ContactId, GroupId, Id, MessageId, UserId};
pub use message::{DeliveryState, DeliveryStatePatch, Message, NewMessage};
pub use user::{NewUser, User};
