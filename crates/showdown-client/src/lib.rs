//! # showdown-client
//!
//! Chat client for Pokémon Showdown.
//!
//! The client opens one websocket to a chat server, logs a single account
//! in, and relays everything the server sends afterwards, grouped by room,
//! to a [`MessageHandler`]. Everything it writes goes through a throttled
//! queue so the server never sees a burst.
//!
//! ## Layers
//!
//! | Crate | Role |
//! |---|---|
//! | `showdown-transport` | websocket connection |
//! | `showdown-protocol` | frames, lines, identities, commands |
//! | `showdown-session` | login handshake and session state |
//! | `showdown-throttle` | rate-limited send pipeline |
//! | `showdown-client` (this crate) | wires them together |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use showdown_client::prelude::*;
//!
//! # async fn demo() -> Result<(), ClientError> {
//! let client = ClientBuilder::new()
//!     .build(Credentials::new("Bot", "hunter2"), HttpAuthenticator::new());
//!
//! let connected = client.connect(&WebSocketConnector).await?;
//! connected
//!     .run(|room: &RoomId, lines: &[String]| {
//!         for line in lines {
//!             println!("[{room}] {line}");
//!         }
//!     })
//!     .await
//! # }
//! ```

mod client;
mod config;
mod error;
mod handler;

pub use client::{Client, ClientBuilder, ClientHandle, ConnectedClient};
pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use error::ClientError;
pub use handler::MessageHandler;

/// Everything needed to build and run a client.
pub mod prelude {
    pub use crate::{
        Client, ClientBuilder, ClientConfig, ClientError, ClientHandle, ConnectedClient,
        MessageHandler,
    };
    pub use showdown_protocol::{OutboundMessage, RoomId, to_id};
    pub use showdown_session::{Assertion, Authenticator, Credentials, HttpAuthenticator, SessionState};
    pub use showdown_transport::WebSocketConnector;
}
