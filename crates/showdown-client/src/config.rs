//! Client configuration.

use std::time::Duration;

use showdown_throttle::ThrottleConfig;

/// The public Showdown chat server.
pub const DEFAULT_ENDPOINT: &str = "wss://sim3.psim.us:443/showdown/websocket";

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Configuration for one client.
///
/// Credentials are not part of it: they are passed to
/// [`ClientBuilder::build`](crate::ClientBuilder::build) and never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Websocket URL of the chat server.
    pub endpoint: String,

    /// Spacing of outbound writes.
    pub throttle: ThrottleConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            throttle: ThrottleConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Convenience for the common override.
    pub fn with_throttle_interval(mut self, interval: Duration) -> Self {
        self.throttle = ThrottleConfig::with_interval(interval);
        self
    }
}
