//! `Client` builder, connected client, and send handle.
//!
//! This is the entry point for running a Showdown client. It ties together
//! all the layers: transport → protocol → session → throttle.
//!
//! ```text
//! ClientBuilder ──build()──→ Client ──connect()──→ ConnectedClient ──run()──→ Result
//!                                                         │
//!                                                      handle()
//!                                                         ▼
//!                                                   ClientHandle (clone freely)
//! ```

use std::sync::Arc;
use std::time::Duration;

use showdown_protocol::{OutboundMessage, RoomId};
use showdown_session::{Authenticator, Credentials, Session, SessionState};
use showdown_throttle::{SendQueue, SendWorker, ThrottleConfig, ThrottleError};
use showdown_transport::{Connection, ConnectionId, Connector};

use crate::handler::{MessageHandler, PendingLogin};
use crate::{ClientConfig, ClientError};

// ---------------------------------------------------------------------------
// ClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring a client.
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// use showdown_client::prelude::*;
///
/// let client = ClientBuilder::new()
///     .throttle_interval(Duration::from_millis(600))
///     .build(Credentials::new("Bot", "hunter2"), HttpAuthenticator::new());
/// let connected = client.connect(&WebSocketConnector).await?;
/// connected.run(|room: &RoomId, lines: &[String]| {
///     println!("{room}: {} lines", lines.len());
/// }).await
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the websocket URL of the chat server.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Sets the minimum spacing between outbound writes.
    pub fn throttle_interval(mut self, interval: Duration) -> Self {
        self.config.throttle = ThrottleConfig::with_interval(interval);
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds a disconnected client for `credentials`, logging in through
    /// `auth`.
    pub fn build<A: Authenticator>(self, credentials: Credentials, auth: A) -> Client<A> {
        Client {
            config: self.config,
            credentials,
            auth: Arc::new(auth),
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// A configured client that has not connected yet.
#[derive(Debug)]
pub struct Client<A: Authenticator> {
    config: ClientConfig,
    credentials: Credentials,
    auth: Arc<A>,
}

impl<A: Authenticator> Client<A> {
    /// The configuration this client will connect with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Opens the connection and starts the send pipeline.
    ///
    /// The session is `Connected` (a guest) when this returns. Login
    /// starts once [`ConnectedClient::run`] sees the server's challenge.
    ///
    /// # Errors
    /// [`ClientError::Transport`] if the connection can't be opened.
    pub async fn connect<K: Connector>(
        self,
        connector: &K,
    ) -> Result<ConnectedClient<A, K::Connection>, ClientError> {
        let mut session = Session::new(self.credentials);
        session.on_connecting();
        tracing::info!(endpoint = %self.config.endpoint, "connecting");

        let conn = Arc::new(connector.connect(&self.config.endpoint).await?);
        let (queue, worker) = SendQueue::spawn(Arc::clone(&conn), self.config.throttle.clone());
        session.on_connected();
        tracing::info!(conn = %conn.id(), "connected");

        Ok(ConnectedClient {
            conn,
            session,
            auth: self.auth,
            queue,
            worker,
            login: None,
        })
    }
}

// ---------------------------------------------------------------------------
// ConnectedClient
// ---------------------------------------------------------------------------

/// A client with a live connection.
///
/// Call [`run()`](Self::run) to process frames until the session ends.
#[derive(Debug)]
pub struct ConnectedClient<A: Authenticator, C: Connection> {
    pub(crate) conn: Arc<C>,
    pub(crate) session: Session,
    pub(crate) auth: Arc<A>,
    pub(crate) queue: SendQueue,
    pub(crate) worker: SendWorker,
    pub(crate) login: Option<PendingLogin>,
}

impl<A: Authenticator, C: Connection> ConnectedClient<A, C> {
    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// The most recent challenge string, if one has arrived.
    pub fn challenge(&self) -> Option<&str> {
        self.session.challenge()
    }

    /// The identifier of the underlying connection.
    pub fn connection_id(&self) -> ConnectionId {
        self.conn.id()
    }

    /// A cloneable handle for sending on this connection.
    pub fn handle(&self) -> ClientHandle {
        ClientHandle {
            queue: self.queue.clone(),
        }
    }

    /// Runs the session until it ends.
    ///
    /// Calls [`MessageHandler::on_connect`] once, then reads frames in
    /// order, logs in when challenged, and hands every frame received
    /// after login to [`MessageHandler::on_message`].
    ///
    /// Never returns `Ok`: a session only ends by failing. A server close
    /// is a `TransportError::ConnectionClosed`.
    ///
    /// # Errors
    /// Whatever ended the session: transport failure or close, a rejected
    /// login, a failed write.
    pub async fn run<H: MessageHandler>(mut self, mut handler: H) -> Result<(), ClientError> {
        handler.on_connect(&self.handle());

        let result = self.event_loop(&mut handler).await;

        if let Err(e) = &result {
            tracing::info!(conn = %self.conn.id(), error = %e, "session ended");
        }
        self.login = None;
        if let Err(e) = self.conn.close().await {
            tracing::debug!(conn = %self.conn.id(), error = %e, "close failed");
        }
        result
    }
}

// ---------------------------------------------------------------------------
// ClientHandle
// ---------------------------------------------------------------------------

/// Sends lines through a client's throttled pipeline.
///
/// Cheap to clone and usable from any task. Once the client's session has
/// ended every call fails with [`ClientError::NotConnected`].
#[derive(Debug, Clone)]
pub struct ClientHandle {
    queue: SendQueue,
}

impl ClientHandle {
    /// Queues an already formatted `<roomid>|<text>` line.
    ///
    /// The line is written as is. Use [`send`](Self::send) or
    /// [`say`](Self::say) to have it checked and framed.
    ///
    /// # Errors
    /// [`ClientError::NotConnected`] if the session has ended.
    pub fn send_raw(&self, line: impl Into<String>) -> Result<(), ClientError> {
        self.queue.enqueue(line).map_err(|e| match e {
            ThrottleError::Closed => ClientError::NotConnected,
            other => ClientError::Throttle(other),
        })
    }

    /// Queues a framed message.
    ///
    /// # Errors
    /// [`ClientError::NotConnected`] if the session has ended.
    pub fn send(&self, message: &OutboundMessage) -> Result<(), ClientError> {
        self.send_raw(message.to_line())
    }

    /// Queues `text` for `room`.
    ///
    /// # Errors
    /// [`ClientError::Protocol`] if `text` contains a newline,
    /// [`ClientError::NotConnected`] if the session has ended.
    pub fn say(&self, room: impl Into<RoomId>, text: impl Into<String>) -> Result<(), ClientError> {
        let message = OutboundMessage::to_room(room.into(), text)?;
        self.send(&message)
    }

    /// Lines queued but not yet written.
    pub fn pending(&self) -> usize {
        self.queue.pending()
    }
}
