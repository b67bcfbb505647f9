//! Data transfer objects for the backend wire formats.

pub mod http;
pub mod websocket;
