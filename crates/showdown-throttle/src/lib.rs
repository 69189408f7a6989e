//! Rate-limited outbound send pipeline for the Showdown client.
//!
//! The chat server drops (or locks) clients that write too fast, so every
//! outbound line goes through one [`SendQueue`]. The queue is an unbounded
//! channel drained by a single worker task that, for each line:
//!
//! 1. writes it to the connection, then
//! 2. sleeps the throttle interval before taking the next one.
//!
//! Writes therefore happen in exactly the order they were enqueued, one at
//! a time, at least one interval apart, no matter how many tasks enqueue
//! concurrently.
//!
//! # Unbounded by choice
//!
//! Producers are never blocked or rejected. If lines arrive faster than
//! the interval drains them, the backlog grows without limit;
//! [`SendQueue::pending`] reports its size.
//!
//! # Integration
//!
//! The worker's outcome is exposed as a [`SendWorker`] so the owner can
//! watch it inside its `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         frame = conn.recv() => { /* handle inbound */ }
//!         result = worker.finished() => return result, // write failed
//!     }
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use showdown_transport::{Connection, TransportError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the send pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Minimum spacing between two consecutive writes.
    pub interval: Duration,
}

impl ThrottleConfig {
    /// Spacing used when nothing else is configured.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

    /// A config with a specific interval.
    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the send pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ThrottleError {
    /// The worker has stopped; nothing more can be sent on this
    /// connection.
    #[error("send queue is closed")]
    Closed,

    /// Writing a line to the connection failed. The worker stopped.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The worker task panicked or was cancelled.
    #[error("send worker stopped: {0}")]
    Worker(#[source] tokio::task::JoinError),
}

// ---------------------------------------------------------------------------
// SendQueue
// ---------------------------------------------------------------------------

/// Producer side of the send pipeline.
///
/// Cheap to clone: every clone feeds the same ordered channel.
#[derive(Debug, Clone)]
pub struct SendQueue {
    tx: mpsc::UnboundedSender<String>,
    pending: Arc<AtomicUsize>,
}

impl SendQueue {
    /// Spawns the worker for `conn` and returns both ends.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<C: Connection>(
        conn: Arc<C>,
        config: ThrottleConfig,
    ) -> (Self, SendWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));

        debug!(
            conn = %conn.id(),
            interval_ms = config.interval.as_millis() as u64,
            "send queue started"
        );

        let handle = tokio::spawn(drain(
            conn,
            rx,
            config.interval,
            Arc::clone(&pending),
        ));

        (Self { tx, pending }, SendWorker { handle })
    }

    /// Schedules `line` for delivery. Never blocks.
    ///
    /// # Errors
    /// [`ThrottleError::Closed`] if the worker has stopped.
    pub fn enqueue(&self, line: impl Into<String>) -> Result<(), ThrottleError> {
        self.pending.fetch_add(1, Ordering::Relaxed);
        self.tx.send(line.into()).map_err(|_| {
            self.pending.fetch_sub(1, Ordering::Relaxed);
            ThrottleError::Closed
        })
    }

    /// Lines accepted but not yet written.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    /// `true` once the worker has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

// ---------------------------------------------------------------------------
// SendWorker
// ---------------------------------------------------------------------------

/// Owner's handle on the worker task.
///
/// Dropping it stops the worker; any [`SendQueue`] clones still around
/// start returning [`ThrottleError::Closed`].
#[derive(Debug)]
pub struct SendWorker {
    handle: JoinHandle<Result<(), TransportError>>,
}

impl SendWorker {
    /// Resolves when the worker stops.
    ///
    /// `Ok(())` means every `SendQueue` was dropped and the backlog was
    /// flushed. Cancel-safe, so it can sit in a `select!` loop; don't poll
    /// it again after it resolved.
    ///
    /// # Errors
    /// [`ThrottleError::Transport`] if a write failed,
    /// [`ThrottleError::Worker`] if the task panicked.
    pub async fn finished(&mut self) -> Result<(), ThrottleError> {
        match (&mut self.handle).await {
            Ok(result) => result.map_err(ThrottleError::from),
            Err(e) => Err(ThrottleError::Worker(e)),
        }
    }
}

impl Drop for SendWorker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// The worker loop: one write, one interval, repeat.
async fn drain<C: Connection>(
    conn: Arc<C>,
    mut rx: mpsc::UnboundedReceiver<String>,
    interval: Duration,
    pending: Arc<AtomicUsize>,
) -> Result<(), TransportError> {
    while let Some(line) = rx.recv().await {
        if let Err(e) = conn.send(&line).await {
            warn!(conn = %conn.id(), error = %e, "write failed, send queue stopping");
            return Err(e);
        }
        let left = pending.fetch_sub(1, Ordering::Relaxed).saturating_sub(1);
        trace!(conn = %conn.id(), len = line.len(), pending = left, "line written");

        time::sleep(interval).await;
    }

    debug!(conn = %conn.id(), "send queue drained and closed");
    Ok(())
}
