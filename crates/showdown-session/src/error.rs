//! Error types for the session layer.

use showdown_protocol::ProtocolError;

/// Errors that can occur while logging in.
///
/// Every variant is fatal for the session. Login is never retried: the
/// challenge it was built on is single-use.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A login was attempted before the server sent a challenge.
    /// This is a sequencing bug in the caller, not a runtime condition.
    #[error("cannot log in without a challenge string")]
    MissingChallenge,

    /// The login server rejected the credentials (or answered without an
    /// assertion).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The login server's reply could not be parsed.
    #[error("malformed login response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// The HTTP exchange with the login server failed.
    #[cfg(feature = "http")]
    #[error("login request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The login command could not be framed (e.g. the assertion contained
    /// a newline).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
