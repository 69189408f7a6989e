//! Per-connection event loop: frames in, login, delivery.
//!
//! `ConnectedClient::run` hands control to this loop. It waits on three
//! things at once:
//!   1. the next inbound frame → feed it to the session state machine
//!   2. the in-flight login exchange → send the `/trn` login command
//!   3. the send worker → a failed write ends the session
//!
//! The session machine decides *what* happens; this module carries out its
//! actions.

use showdown_protocol::{Frame, RoomId};
use showdown_session::{
    Assertion, Authenticator, LoginAttempt, SessionAction, SessionError,
};
use showdown_throttle::ThrottleError;
use showdown_transport::{Connection, TransportError};
use tokio::task::{JoinError, JoinHandle};

use crate::{ClientError, ClientHandle, ConnectedClient};

// ---------------------------------------------------------------------------
// MessageHandler
// ---------------------------------------------------------------------------

/// Consumer of room-scoped line batches.
///
/// `on_message` is called at most once per inbound frame, in arrival
/// order, and only after the server has confirmed the login. The lines
/// are passed verbatim, without the `>room` header.
///
/// Any `FnMut(&RoomId, &[String])` closure is a handler.
pub trait MessageHandler: Send + 'static {
    /// Called once, before the first frame is read.
    fn on_connect(&mut self, handle: &ClientHandle) {
        let _ = handle;
        tracing::info!("client connected");
    }

    /// Called with every frame received while logged in.
    fn on_message(&mut self, room: &RoomId, lines: &[String]);
}

impl<F> MessageHandler for F
where
    F: FnMut(&RoomId, &[String]) + Send + 'static,
{
    fn on_message(&mut self, room: &RoomId, lines: &[String]) {
        self(room, lines)
    }
}

// ---------------------------------------------------------------------------
// PendingLogin
// ---------------------------------------------------------------------------

/// The login exchange currently in flight.
///
/// Dropping it aborts the task, so replacing it with a newer attempt
/// cancels the old one.
#[derive(Debug)]
pub(crate) struct PendingLogin {
    attempt: u64,
    handle: JoinHandle<Result<Assertion, SessionError>>,
}

impl Drop for PendingLogin {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Resolves when the pending login finishes; never resolves if there is
/// none.
async fn login_finished(
    login: &mut Option<PendingLogin>,
) -> (u64, Result<Result<Assertion, SessionError>, JoinError>) {
    match login {
        Some(pending) => (pending.attempt, (&mut pending.handle).await),
        None => std::future::pending().await,
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

impl<A: Authenticator, C: Connection> ConnectedClient<A, C> {
    /// Runs until something fails. Only returns `Err`.
    pub(crate) async fn event_loop<H: MessageHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<(), ClientError> {
        let conn_id = self.conn.id();

        loop {
            tokio::select! {
                received = self.conn.recv() => {
                    match received? {
                        Some(text) => self.dispatch(&text, handler)?,
                        None => {
                            tracing::info!(%conn_id, "server closed the connection");
                            return Err(TransportError::ConnectionClosed(
                                "server closed the connection".into(),
                            )
                            .into());
                        }
                    }
                }

                (attempt, joined) = login_finished(&mut self.login) => {
                    self.login = None;
                    self.finish_login(attempt, joined?)?;
                }

                stopped = self.worker.finished() => {
                    stopped?;
                    // We still hold a queue, so a clean stop can't happen.
                    return Err(ThrottleError::Closed.into());
                }
            }
        }
    }

    /// Feeds one raw frame to the session and carries out its actions.
    fn dispatch<H: MessageHandler>(
        &mut self,
        text: &str,
        handler: &mut H,
    ) -> Result<(), ClientError> {
        if text.is_empty() {
            return Ok(());
        }
        tracing::trace!(conn = %self.conn.id(), frame = text, "recv");

        for action in self.session.handle_frame(Frame::parse(text))? {
            match action {
                SessionAction::StartLogin(attempt) => self.start_login(attempt),
                SessionAction::Send(message) => {
                    self.queue.enqueue(message.to_line())?;
                }
                SessionAction::Deliver(frame) => {
                    handler.on_message(&frame.room, &frame.lines);
                }
            }
        }
        Ok(())
    }

    /// Spawns the login exchange for `attempt`, replacing (and aborting)
    /// any exchange still in flight.
    fn start_login(&mut self, attempt: LoginAttempt) {
        let LoginAttempt { attempt, challstr } = attempt;

        if let Some(previous) = self.login.take() {
            tracing::debug!(
                superseded = previous.attempt,
                attempt,
                "new challenge, abandoning previous login"
            );
        }

        let auth = std::sync::Arc::clone(&self.auth);
        let credentials = self.session.credentials().clone();
        let handle = tokio::spawn(async move { auth.login(&challstr, &credentials).await });

        self.login = Some(PendingLogin { attempt, handle });
    }

    /// Turns a finished login exchange into the `/trn` login command.
    fn finish_login(
        &mut self,
        attempt: u64,
        result: Result<Assertion, SessionError>,
    ) -> Result<(), ClientError> {
        let assertion = match result {
            Ok(assertion) => assertion,
            Err(e) if !self.session.is_current_attempt(attempt) => {
                tracing::warn!(attempt, error = %e, "ignoring failure of superseded login");
                return Ok(());
            }
            Err(e) => {
                tracing::error!(attempt, error = %e, "login failed");
                return Err(e.into());
            }
        };

        if let Some(command) = self.session.complete_login(attempt, &assertion)? {
            tracing::debug!(attempt, "login accepted, sending assertion");
            self.queue.enqueue(command.to_line())?;
        }
        Ok(())
    }
}
