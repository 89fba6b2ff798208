//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - An in-memory backend implementing `MessagingApi`
//! - Fixtures for users, contacts, messages and groups
//! - Custom assertion macros

#![allow(dead_code)]


pub use fake_api::*;
pub use fixtures::*;
