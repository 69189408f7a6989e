//! Room identity.

use std::fmt;

/// Identifier for a conversation scope (a chat room or a battle).
///
/// This is a "newtype wrapper" around `String`: you can't accidentally pass
/// a user name where a room is expected, even though both are strings
/// underneath.
///
/// Frames that carry no `>room` prefix belong to [`RoomId::lobby`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    /// The scope of frames that arrive without a room prefix.
    pub const LOBBY: &'static str = "lobby";

    /// Creates a room ID from its wire form (without the leading `>`).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The default `lobby` scope.
    pub fn lobby() -> Self {
        Self(Self::LOBBY.to_string())
    }

    /// Returns the room ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::lobby()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl PartialEq<str> for RoomId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RoomId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
