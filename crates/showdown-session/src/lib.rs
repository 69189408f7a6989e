//! Login handshake and session state for the Showdown client.
//!
//! This crate handles everything about *who* the connection is:
//!
//! 1. **Authentication**: trading a server challenge for a signed
//!    assertion ([`Authenticator`] trait, [`HttpAuthenticator`])
//! 2. **Session tracking**: the connection's lifecycle state and the
//!    identity the server reports for it ([`Session`])
//! 3. **Identity reconciliation**: renaming onto the exact configured
//!    account when the server has us under an alias
//!
//! # How it fits in the stack
//!
//! ```text
//! Client (above)  ← executes the actions this crate returns
//!     ↕
//! Session Layer (this crate)  ← pure state machine, no I/O except login
//!     ↕
//! Protocol Layer (below)  ← provides Frame, ServerLine, Command
//! ```
//!
//! [`Session`] never touches the network. It is fed frames and returns
//! [`SessionAction`]s; the caller decides how to carry them out.

mod auth;
mod error;
#[cfg(feature = "http")]
mod http;
mod machine;
mod session;

pub use auth::{Assertion, Authenticator, Credentials};
pub use error::SessionError;
#[cfg(feature = "http")]
pub use http::{DEFAULT_LOGIN_URL, HttpAuthenticator, parse_login_response};
pub use machine::{LoginAttempt, Session, SessionAction};
pub use session::SessionState;
