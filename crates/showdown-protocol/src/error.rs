//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. When you see a
//! `ProtocolError`, you know the problem is in how a line is shaped, not in
//! networking or login.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The message is invalid at the protocol level.
    ///
    /// Raised for outbound text that would break the line framing, e.g. a
    /// chat message containing a newline (which the server would read as a
    /// second command).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
