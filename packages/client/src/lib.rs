//! BG Chooser client library.
//!
//! This library provides the game/vote reconciliation model of a BG Chooser
//! room together with the HTTP and WebSocket plumbing to the backend and an
//! interactive terminal client.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry point
pub use ui::run_client;
