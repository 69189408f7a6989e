//! Line protocol for the Showdown client.
//!
//! This crate defines the "language" the client and the chat server speak:
//!
//! - **Identities** ([`to_id`], [`Id`]): canonical account identifiers
//!   used to compare display names.
//! - **Inbound framing** ([`Frame`], [`RoomId`], [`ServerLine`]): how a
//!   raw text payload is split into a room scope and protocol lines, and
//!   which lines the session core cares about.
//! - **Outbound commands** ([`Command`], [`OutboundMessage`]): the
//!   `room|text` lines the client writes.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw text) and session
//! (login state). It doesn't know about connections or credentials:
//! it only knows how lines look on the wire.
//!
//! ```text
//! Transport (text) → Protocol (Frame, ServerLine) → Session (state machine)
//! ```

mod command;
mod error;
mod frame;
mod id;
mod message;
mod types;

pub use command::{Command, OutboundMessage};
pub use error::ProtocolError;
pub use frame::Frame;
pub use id::{Id, to_id};
pub use message::ServerLine;
pub use types::RoomId;
