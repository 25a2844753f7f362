//! Request handler module
//!
//! Routing dispatch and the canned responders behind it, plus the adapter that feeds
//! hyper requests into the dispatcher.

pub mod chat;
pub mod intent;
pub mod router;
pub mod service;
pub mod static_page;
pub mod webhook;

// Re-export main entry point
pub use service::handle_request;
