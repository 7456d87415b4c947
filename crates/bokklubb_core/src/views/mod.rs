//! View models
//!
//! Per-page components that pull data through the remote accessor and keep the in-memory state
//! the hosting webview renders from. Each view owns its own list copies; nothing here is shared
//! between pages.
pub mod auth;
pub mod catalog;
pub mod profile;
pub mod sorting;
