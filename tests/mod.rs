//! Test suite for wachat
//!
//! This module organizes all tests

pub mod common;
