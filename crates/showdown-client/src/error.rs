//! Unified error type for the Showdown client.

use showdown_protocol::ProtocolError;
use showdown_session::SessionError;
use showdown_throttle::ThrottleError;
use showdown_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Every variant ends the session: [`ConnectedClient::run`] returns it and
/// the connection is not retried.
///
/// [`ConnectedClient::run`]: crate::ConnectedClient::run
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A transport-level error (connect, send, recv, close).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (a line that can't be framed).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (missing challenge, login rejected).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The send pipeline stopped.
    #[error(transparent)]
    Throttle(#[from] ThrottleError),

    /// A send was attempted on a client whose connection is gone.
    #[error("client is not connected")]
    NotConnected,

    /// The login task panicked.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
