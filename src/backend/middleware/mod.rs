//! Middleware Module
//!
//! HTTP middleware applied to every route.
//!
//! - **`request_log`** - one log line per request

pub mod request_log;

pub use request_log::log_request;
