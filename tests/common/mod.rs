//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Engine, state and router fixtures
//! - HTTP request helpers for driving the router with `oneshot`
//! - A store wrapper that fails on demand
//! - Custom assertion macros

#![allow(dead_code)]

pub mod assertions;
pub mod failing_store;
pub mod fixtures;

// Re-export commonly used utilities
pub use failing_store::*;
pub use fixtures::*;
