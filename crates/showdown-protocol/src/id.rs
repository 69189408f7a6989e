//! Canonical account identifiers.
//!
//! The server treats `"Bot"`, `"BOT"`, and `" b.o.t"` as the same account.
//! It compares names by their *ID*: the name lowercased, with everything
//! that is not an ASCII letter or digit removed. We compute the same thing
//! so our comparisons agree with the server's.

use std::fmt;

/// A canonical account identifier, as produced by [`to_id`].
///
/// The inner string only ever contains `[a-z0-9]`. There is no public
/// constructor other than [`to_id`], so that invariant always holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id(String);

impl Id {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty identifier (e.g. from a name with no
    /// letters or digits at all).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Normalizes a display name into its canonical [`Id`].
///
/// Total and pure: any input is accepted, including the empty string.
///
/// ```rust
/// use showdown_protocol::to_id;
///
/// assert_eq!(to_id("Zarel"), "zarel");
/// assert_eq!(to_id(" Mr. Bot-9"), "mrbot9");
/// assert_eq!(to_id(""), "");
/// ```
pub fn to_id(input: &str) -> Id {
    Id(input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect())
}
