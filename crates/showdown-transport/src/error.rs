/// Errors that can occur in the transport layer.
///
/// Every variant is fatal for the connection it came from: the client does
/// not reconnect on its own.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Opening the connection failed.
    #[error("connect to {endpoint} failed: {source}")]
    ConnectFailed {
        /// The endpoint we tried to reach.
        endpoint: String,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The connection was closed by the remote end.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}
