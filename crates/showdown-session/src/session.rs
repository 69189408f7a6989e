//! Session lifecycle states.

use std::fmt;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The lifecycle state of one client connection.
///
/// ```text
///   Disconnected ──(connect)──→ Connecting ──(open)──→ Connected
///                                                          │
///                                                    (|challstr|)
///                                                          ▼
///                              LoggedIn ←──(|updateuser| us)── Authenticating
/// ```
///
/// - **Disconnected**: no transport yet.
/// - **Connecting**: transport is being opened.
/// - **Connected**: transport is up; we are a guest.
/// - **Authenticating**: a challenge arrived and a login exchange is (or
///   was) in flight.
/// - **LoggedIn**: the server confirmed the configured account name.
///   Terminal for the lifetime of a connection: a later challenge does
///   not demote it.
///
/// Any transport error or close ends the session outright; there is no
/// transition back to `Disconnected` on the same `Session`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Authenticating,
    LoggedIn,
}

impl SessionState {
    /// Returns `true` once the transport is up (any state after
    /// `Connecting`).
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected | Self::Authenticating | Self::LoggedIn)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Authenticating => "authenticating",
            Self::LoggedIn => "logged-in",
        };
        f.write_str(name)
    }
}
