//! Private drafts
//!
//! Per-nickname poems kept outside the forest until the author publishes
//! them.

pub mod handlers;
pub mod service;

pub use service::DraftService;
