//! Infrastructure layer
//!
//! バックエンドとの通信（HTTP / WebSocket）とワイヤーフォーマット（DTO）を扱うレイヤー。

pub mod dto;
pub mod error;
pub mod repository;
pub mod websocket;

pub use error::ChannelError;
pub use repository::HttpRoomRepository;
pub use websocket::{ImportProgressStream, PushChannel, PushEvent};
