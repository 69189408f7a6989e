//! Authentication hook for logging the account in.
//!
//! The chat server never sees the password. Instead, on connect it sends a
//! one-time *challenge string*; the client takes that challenge plus the
//! credentials to the login server, which answers with a signed
//! *assertion*. The client then echoes the assertion back to the chat
//! server in a `/trn` command.
//!
//! [`Authenticator`] is the seam for that middle step. The default
//! implementation talks HTTP ([`HttpAuthenticator`](crate::HttpAuthenticator));
//! tests plug in a mock.

use std::fmt;
use std::future::Future;

use crate::SessionError;

/// Account credentials. Immutable for the lifetime of a client.
///
/// `Debug` never prints the password, so credentials are safe to log.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    name: String,
    pass: String,
}

impl Credentials {
    /// Creates credentials for the account `name`.
    pub fn new(name: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pass: pass.into(),
        }
    }

    /// The exact account name, as the client should appear on the server.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The account password.
    pub fn pass(&self) -> &str {
        &self.pass
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("pass", &"<redacted>")
            .finish()
    }
}

/// A signed token from the login server proving we own the account.
///
/// Opaque: it is embedded verbatim in the login command.
#[derive(Clone, PartialEq, Eq)]
pub struct Assertion(String);

impl Assertion {
    /// Wraps a raw assertion string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the assertion as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Assertion(<{} bytes>)", self.0.len())
    }
}

/// Trades a challenge string and credentials for a signed [`Assertion`].
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → the authenticator is shared with the task
///   that runs the login exchange while the session keeps reading frames.
/// - The returned future is `Send` so that task can run on any worker
///   thread.
///
/// # Example
///
/// ```rust
/// use showdown_session::{Assertion, Authenticator, Credentials, SessionError};
///
/// /// Signs everything. Only for tests against a local server!
/// struct AlwaysOk;
///
/// impl Authenticator for AlwaysOk {
///     async fn login(
///         &self,
///         challstr: &str,
///         credentials: &Credentials,
///     ) -> Result<Assertion, SessionError> {
///         Ok(Assertion::new(format!("{}:{challstr}", credentials.name())))
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Performs one login exchange for `challstr`.
    ///
    /// # Returns
    /// - `Ok(Assertion)`: login succeeded
    /// - `Err(SessionError::AuthFailed)`: the login server said no
    /// - `Err(SessionError::MalformedResponse | Http)`: the exchange broke
    ///
    /// Implementations must not retry: a challenge is only good once.
    fn login(
        &self,
        challstr: &str,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Assertion, SessionError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("Bot", "hunter2");
        let text = format!("{creds:?}");
        assert!(text.contains("Bot"));
        assert!(!text.contains("hunter2"), "password leaked: {text}");
    }

    #[test]
    fn test_assertion_debug_hides_token() {
        let assertion = Assertion::new("secret-token");
        assert!(!format!("{assertion:?}").contains("secret"));
        assert_eq!(assertion.as_str(), "secret-token");
    }
}
