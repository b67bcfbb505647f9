//! Terminal client for a BG Chooser room.
//!
//! Joins (or creates) a room, shows its games and lets you vote, veto and
//! import collections while updates from other users stream in.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin bgchooser-client -- --user alice --room 04217
//! ```

use bgchooser_client::config::{Args, ClientConfig};
use bgchooser_shared::logger::setup_logger;
use clap::Parser;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = match ClientConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    // Run the client
    if let Err(e) = bgchooser_client::run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
