//! Terminal UI of the client.

pub mod command;
pub mod error;
mod runner;
pub mod view;

pub use error::ClientError;
pub use runner::run_client;
