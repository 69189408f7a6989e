//! Logs in to a Showdown chat server and logs every room batch it receives.
//!
//! # Usage
//!
//! ```bash
//! # Credentials from the environment
//! SHOWDOWN_NAME=MyBot SHOWDOWN_PASS=hunter2 lobby-logger
//!
//! # Local server, slower sends, protocol detail
//! lobby-logger --name MyBot --pass hunter2 \
//!     --endpoint ws://localhost:8000/showdown/websocket \
//!     --throttle-ms 600 --log-level debug
//! ```

use std::time::Duration;

use clap::Parser;
use showdown_client::prelude::*;
use showdown_client::DEFAULT_ENDPOINT;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Showdown lobby logger
#[derive(Parser, Debug)]
#[command(name = "lobby-logger")]
#[command(about = "Log in to Pokémon Showdown and log everything the server sends")]
#[command(version)]
struct Args {
    /// Account name
    #[arg(short, long, env = "SHOWDOWN_NAME")]
    name: String,

    /// Account password
    #[arg(short, long, env = "SHOWDOWN_PASS", hide_env_values = true)]
    pass: String,

    /// Websocket URL of the chat server
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Minimum milliseconds between outbound lines
    #[arg(long, default_value = "100")]
    throttle_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Logs each batch; joins nothing and says nothing.
struct LobbyLogger {
    batches: u64,
}

impl MessageHandler for LobbyLogger {
    fn on_message(&mut self, room: &RoomId, lines: &[String]) {
        self.batches += 1;
        tracing::info!(%room, lines = lines.len(), batch = self.batches, "batch");
        for line in lines {
            tracing::debug!(%room, "{line}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!(name = %args.name, endpoint = %args.endpoint, "lobby logger starting");

    let client = ClientBuilder::new()
        .endpoint(args.endpoint)
        .throttle_interval(Duration::from_millis(args.throttle_ms))
        .build(Credentials::new(args.name, args.pass), HttpAuthenticator::new());

    let connected = client.connect(&WebSocketConnector).await?;
    connected.run(LobbyLogger { batches: 0 }).await?;

    Ok(())
}
