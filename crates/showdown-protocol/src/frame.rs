//! Inbound frame splitting.
//!
//! One websocket text payload from the server looks like this:
//!
//! ```text
//! >battle-gen9ou-1        ← optional room scope
//! |j| Alice               ← protocol lines, each `|kind|...`
//! |c| Alice|hi
//! ```
//!
//! When the first line starts with `>`, it names the room the rest of the
//! payload belongs to. Otherwise the payload belongs to the lobby.

use crate::RoomId;

/// A parsed inbound payload: a room scope plus its protocol lines.
///
/// Lines are kept verbatim (including their leading `|`), because the
/// consumer, not this crate, interprets them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The room these lines belong to.
    pub room: RoomId,
    /// The protocol lines, in arrival order.
    pub lines: Vec<String>,
}

impl Frame {
    /// Splits a raw text payload into its room scope and lines.
    ///
    /// Never fails: an empty payload is a lobby frame with one empty line,
    /// and a bare `>` names the empty room.
    ///
    /// ```rust
    /// use showdown_protocol::Frame;
    ///
    /// let frame = Frame::parse(">battle-1\n|line1");
    /// assert_eq!(frame.room, "battle-1");
    /// assert_eq!(frame.lines, vec!["|line1".to_string()]);
    /// ```
    pub fn parse(payload: &str) -> Self {
        let (room, body) = match payload.strip_prefix('>') {
            Some(scoped) => match scoped.split_once('\n') {
                Some((id, body)) => (RoomId::new(id), Some(body)),
                None => (RoomId::new(scoped), None),
            },
            None => (RoomId::lobby(), Some(payload)),
        };

        let lines = body
            .map(|body| body.split('\n').map(str::to_owned).collect())
            .unwrap_or_default();

        Self { room, lines }
    }
}
