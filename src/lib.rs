//! Notification relay.

pub mod config;
pub mod directory;
pub mod error;
pub mod notifications;
pub mod responses;
