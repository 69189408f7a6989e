//! Outbound lines.
//!
//! Everything the client writes has the shape `<roomid>|<text>`. Global
//! commands (like `/trn`) use an empty room, so they go out as `|/trn ...`.

use std::fmt;

use crate::{ProtocolError, RoomId};

/// Commands the session core issues on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/trn <name>`: switch this connection to `name`. Used when the
    /// server already has us under a differently formatted alias.
    Rename {
        /// The exact configured account name.
        name: String,
    },

    /// `/trn <name>,0,<assertion>`: finish logging in with a signed
    /// assertion from the login server.
    Login {
        /// The exact configured account name.
        name: String,
        /// The assertion returned by the login server, verbatim.
        assertion: String,
    },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rename { name } => write!(f, "/trn {name}"),
            Self::Login { name, assertion } => {
                write!(f, "/trn {name},0,{assertion}")
            }
        }
    }
}

/// One line ready for the send pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    room: Option<RoomId>,
    text: String,
}

impl OutboundMessage {
    /// A message scoped to `room`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] if `text` contains a
    /// newline: the server would read everything after it as a separate
    /// command.
    pub fn to_room(
        room: RoomId,
        text: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        Self::build(Some(room), text.into())
    }

    /// A message with no room scope (global commands, `/trn`, PMs).
    ///
    /// # Errors
    /// Same as [`OutboundMessage::to_room`].
    pub fn global(text: impl Into<String>) -> Result<Self, ProtocolError> {
        Self::build(None, text.into())
    }

    fn build(room: Option<RoomId>, text: String) -> Result<Self, ProtocolError> {
        if text.contains('\n') {
            return Err(ProtocolError::InvalidMessage(format!(
                "outbound text contains a newline: {text:?}"
            )));
        }
        Ok(Self { room, text })
    }

    /// The room this message is scoped to, if any.
    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }

    /// The text after the `|`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Renders the wire form, `<roomid>|<text>`.
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.room {
            Some(room) => write!(f, "{room}|{}", self.text),
            None => write!(f, "|{}", self.text),
        }
    }
}

impl TryFrom<Command> for OutboundMessage {
    type Error = ProtocolError;

    /// Session commands are always global. The assertion comes from the
    /// login server, so it goes through the same newline check as any
    /// other text.
    fn try_from(command: Command) -> Result<Self, Self::Error> {
        Self::global(command.to_string())
    }
}
