//! The session state machine: frames in, actions out.
//!
//! `Session` owns every piece of mutable login state for one connection
//! (challenge, lifecycle state, login generation) and is only ever touched
//! from the task that reads the connection. It performs no I/O: each event
//! returns a list of [`SessionAction`]s for the caller to execute, in
//! order.
//!
//! # Concurrency note
//!
//! `Session` is a plain struct, not a shared one. The client's run loop
//! owns it outright, so every update happens on one logical thread and a
//! reader can never observe a half-applied transition.

use showdown_protocol::{Command, Frame, Id, OutboundMessage, ServerLine, to_id};

use crate::{Assertion, Credentials, SessionError, SessionState};

/// A login exchange the caller should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAttempt {
    /// Generation number. Only the most recent attempt may complete.
    pub attempt: u64,
    /// The challenge to sign.
    pub challstr: String,
}

/// Something the caller must do on the session's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Run the authenticator for this challenge (in the background; keep
    /// feeding frames meanwhile), then call [`Session::complete_login`].
    StartLogin(LoginAttempt),

    /// Put this line on the send pipeline.
    Send(OutboundMessage),

    /// Hand this frame to the consumer. Only emitted once logged in.
    Deliver(Frame),
}

/// Login state for one connection.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ on_connecting() ──→ on_connected() ──→ handle_frame()…
///                                                    │
///                         StartLogin ←── |challstr|  │
///                             │                      │
///                     complete_login() ──→ Send(/trn name,0,assertion)
///                                                    │
///                           LoggedIn ←── |updateuser| <our name>
/// ```
#[derive(Debug)]
pub struct Session {
    credentials: Credentials,
    own_id: Id,
    state: SessionState,
    challstr: Option<String>,
    login_attempt: u64,
}

impl Session {
    /// Creates a disconnected session for `credentials`.
    pub fn new(credentials: Credentials) -> Self {
        let own_id = to_id(credentials.name());
        Self {
            credentials,
            own_id,
            state: SessionState::Disconnected,
            challstr: None,
            login_attempt: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// `true` once the server has confirmed our account name.
    pub fn is_logged_in(&self) -> bool {
        self.state == SessionState::LoggedIn
    }

    /// The most recent challenge string, if one has arrived.
    pub fn challenge(&self) -> Option<&str> {
        self.challstr.as_deref()
    }

    /// The configured credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Generation number of the most recent login attempt (0 = none yet).
    pub fn current_attempt(&self) -> u64 {
        self.login_attempt
    }

    /// `Disconnected → Connecting`.
    pub fn on_connecting(&mut self) {
        self.transition(SessionState::Connecting);
    }

    /// `Connecting → Connected`.
    pub fn on_connected(&mut self) {
        self.transition(SessionState::Connected);
    }

    /// Processes one inbound frame.
    ///
    /// Scans the frame's lines in order:
    /// - `|challstr|` records the challenge, emits
    ///   [`SessionAction::StartLogin`], and ends the scan. Lines after it
    ///   in the same frame are not inspected.
    /// - `|updateuser|` with our exact name moves us to `LoggedIn`; with a
    ///   name that only matches our [`Id`] it emits a `/trn <name>`.
    ///
    /// If we are logged in after the scan, the whole frame is handed back
    /// as [`SessionAction::Deliver`]. Before that, frames are consumed
    /// silently.
    ///
    /// # Errors
    /// [`SessionError::MissingChallenge`] if the server sent an empty
    /// challenge.
    pub fn handle_frame(
        &mut self,
        frame: Frame,
    ) -> Result<Vec<SessionAction>, SessionError> {
        let mut actions = Vec::new();

        for line in &frame.lines {
            match ServerLine::parse(line) {
                ServerLine::Challstr(challstr) => {
                    self.challstr = Some(challstr.to_owned());
                    let attempt = self.begin_login()?;
                    actions.push(SessionAction::StartLogin(attempt));
                    // Later lines in this frame are not scanned.
                    break;
                }
                update @ ServerLine::UpdateUser { name, .. } => {
                    if let Some(action) = self.handle_update_user(name, update.bare_name())? {
                        actions.push(action);
                    }
                }
                ServerLine::Other(_) => {}
            }
        }

        if self.is_logged_in() {
            actions.push(SessionAction::Deliver(frame));
        }

        Ok(actions)
    }

    /// Starts a login attempt for the current challenge.
    ///
    /// Every call supersedes the previous attempt: its result will be
    /// rejected by [`Session::complete_login`].
    ///
    /// # Errors
    /// [`SessionError::MissingChallenge`] if no (non-empty) challenge has
    /// been received.
    pub fn begin_login(&mut self) -> Result<LoginAttempt, SessionError> {
        let challstr = match self.challstr.as_deref() {
            Some(c) if !c.is_empty() => c.to_owned(),
            _ => return Err(SessionError::MissingChallenge),
        };

        self.login_attempt += 1;
        if !self.is_logged_in() {
            self.transition(SessionState::Authenticating);
        }

        tracing::debug!(attempt = self.login_attempt, "login attempt started");
        Ok(LoginAttempt {
            attempt: self.login_attempt,
            challstr,
        })
    }

    /// `true` if `attempt` is still the latest login attempt.
    pub fn is_current_attempt(&self, attempt: u64) -> bool {
        attempt == self.login_attempt
    }

    /// Turns a successful login exchange into the `/trn` login command.
    ///
    /// Returns `Ok(None)` when `attempt` has been superseded by a newer
    /// challenge; its assertion was signed for a stale challenge and must
    /// not be sent.
    ///
    /// # Errors
    /// [`SessionError::Protocol`] if the assertion can't be framed as a
    /// single line.
    pub fn complete_login(
        &self,
        attempt: u64,
        assertion: &Assertion,
    ) -> Result<Option<OutboundMessage>, SessionError> {
        if !self.is_current_attempt(attempt) {
            tracing::warn!(
                attempt,
                current = self.login_attempt,
                "discarding assertion for superseded challenge"
            );
            return Ok(None);
        }

        let command = Command::Login {
            name: self.credentials.name().to_owned(),
            assertion: assertion.as_str().to_owned(),
        };
        Ok(Some(OutboundMessage::try_from(command)?))
    }

    fn handle_update_user(
        &mut self,
        reported: &str,
        bare: Option<&str>,
    ) -> Result<Option<SessionAction>, SessionError> {
        if bare == Some(self.credentials.name()) {
            if !self.is_logged_in() {
                tracing::info!(name = reported, "logged in");
                self.transition(SessionState::LoggedIn);
            }
            return Ok(None);
        }

        if to_id(reported) == self.own_id {
            tracing::debug!(
                reported,
                wanted = self.credentials.name(),
                "server has us under an alias, renaming"
            );
            let rename = Command::Rename {
                name: self.credentials.name().to_owned(),
            };
            return Ok(Some(SessionAction::Send(OutboundMessage::try_from(rename)?)));
        }

        Ok(None)
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            tracing::debug!(from = %self.state, to = %next, "session state");
            self.state = next;
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for the session state machine.
    //!
    //! Naming convention: `test_{function}_{scenario}_{expected}`.
    //! Everything here is synchronous: the machine has no I/O, so each
    //! test feeds frames and inspects the returned actions.

    use showdown_protocol::RoomId;

    use super::*;

    // -- Helpers ----------------------------------------------------------

    /// A connected session for the account `Bot`.
    fn connected() -> Session {
        let mut session = Session::new(Credentials::new("Bot", "x"));
        session.on_connecting();
        session.on_connected();
        session
    }

    /// A session that has already seen its own `updateuser`.
    fn logged_in() -> Session {
        let mut session = connected();
        session
            .handle_frame(Frame::parse("|updateuser| Bot|1|1|{}"))
            .unwrap();
        assert!(session.is_logged_in());
        session
    }

    fn sends(actions: &[SessionAction]) -> Vec<String> {
        actions
            .iter()
            .filter_map(|a| match a {
                SessionAction::Send(msg) => Some(msg.to_line()),
                _ => None,
            })
            .collect()
    }

    fn delivered(actions: &[SessionAction]) -> Option<&Frame> {
        actions.iter().find_map(|a| match a {
            SessionAction::Deliver(frame) => Some(frame),
            _ => None,
        })
    }

    // =====================================================================
    // lifecycle
    // =====================================================================

    #[test]
    fn test_new_session_is_disconnected() {
        let session = Session::new(Credentials::new("Bot", "x"));
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(session.challenge().is_none());
        assert_eq!(session.current_attempt(), 0);
    }

    #[test]
    fn test_connect_transitions_through_connecting_to_connected() {
        let mut session = Session::new(Credentials::new("Bot", "x"));
        session.on_connecting();
        assert_eq!(session.state(), SessionState::Connecting);
        session.on_connected();
        assert_eq!(session.state(), SessionState::Connected);
        assert!(session.state().is_connected());
    }

    // =====================================================================
    // handle_frame(): challstr
    // =====================================================================

    #[test]
    fn test_handle_frame_challstr_records_challenge_and_starts_login() {
        let mut session = connected();

        let actions = session
            .handle_frame(Frame::parse(">room1\n|challstr|abc123"))
            .unwrap();

        assert_eq!(session.challenge(), Some("abc123"));
        assert_eq!(session.state(), SessionState::Authenticating);
        assert_eq!(
            actions,
            vec![SessionAction::StartLogin(LoginAttempt {
                attempt: 1,
                challstr: "abc123".into(),
            })]
        );
    }

    #[test]
    fn test_handle_frame_challstr_stops_scanning_frame() {
        let mut session = connected();

        // The updateuser after the challenge is not looked at.
        let actions = session
            .handle_frame(Frame::parse("|challstr|4|abc\n|updateuser| Bot|1|1|{}"))
            .unwrap();

        assert_eq!(actions.len(), 1);
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_handle_frame_empty_challstr_is_missing_challenge() {
        let mut session = connected();

        let result = session.handle_frame(Frame::parse("|challstr|"));

        assert!(matches!(result, Err(SessionError::MissingChallenge)));
    }

    #[test]
    fn test_handle_frame_second_challstr_supersedes_first() {
        let mut session = connected();
        session.handle_frame(Frame::parse("|challstr|first")).unwrap();

        let actions = session.handle_frame(Frame::parse("|challstr|second")).unwrap();

        assert_eq!(session.challenge(), Some("second"));
        assert_eq!(
            actions,
            vec![SessionAction::StartLogin(LoginAttempt {
                attempt: 2,
                challstr: "second".into(),
            })]
        );
        assert!(!session.is_current_attempt(1));
        assert!(session.is_current_attempt(2));
    }

    #[test]
    fn test_handle_frame_challstr_after_login_stays_logged_in() {
        let mut session = logged_in();

        let actions = session.handle_frame(Frame::parse("|challstr|again")).unwrap();

        assert!(session.is_logged_in());
        assert!(matches!(actions[0], SessionAction::StartLogin(_)));
        assert!(delivered(&actions).is_some());
    }

    // =====================================================================
    // handle_frame(): updateuser
    // =====================================================================

    #[test]
    fn test_handle_frame_updateuser_exact_name_logs_in() {
        let mut session = connected();

        let actions = session
            .handle_frame(Frame::parse("|updateuser|Bot|1|avatar|{}"))
            .unwrap();

        assert!(session.is_logged_in());
        // The confirming frame itself is delivered.
        assert_eq!(delivered(&actions).map(|f| f.room.clone()), Some(RoomId::lobby()));
    }

    #[test]
    fn test_handle_frame_updateuser_with_rank_glyph_logs_in() {
        let mut session = connected();

        session
            .handle_frame(Frame::parse("|updateuser|+Bot|1|1|{}"))
            .unwrap();

        assert!(session.is_logged_in());
    }

    #[test]
    fn test_handle_frame_updateuser_alias_sends_rename() {
        let mut session = connected();

        let actions = session
            .handle_frame(Frame::parse("|updateuser| bOT|1|1|{}"))
            .unwrap();

        assert!(!session.is_logged_in());
        assert_eq!(sends(&actions), vec!["|/trn Bot"]);
        assert!(delivered(&actions).is_none());
    }

    #[test]
    fn test_handle_frame_updateuser_other_user_is_ignored() {
        let mut session = connected();

        let actions = session
            .handle_frame(Frame::parse("|updateuser| Guest 4412|0|170|{}"))
            .unwrap();

        assert!(actions.is_empty());
        assert_eq!(session.state(), SessionState::Connected);
    }

    #[test]
    fn test_handle_frame_updateuser_when_logged_in_is_idempotent() {
        let mut session = logged_in();

        let actions = session
            .handle_frame(Frame::parse("|updateuser| Bot|1|2|{}"))
            .unwrap();

        assert!(session.is_logged_in());
        assert!(sends(&actions).is_empty());
        assert!(delivered(&actions).is_some());
    }

    // =====================================================================
    // handle_frame(): delivery gate
    // =====================================================================

    #[test]
    fn test_handle_frame_before_login_is_not_delivered() {
        let mut session = connected();

        let actions = session
            .handle_frame(Frame::parse(">lobby\n|c| Alice|hi"))
            .unwrap();

        assert!(actions.is_empty());
    }

    #[test]
    fn test_handle_frame_after_login_delivers_room_and_lines() {
        let mut session = logged_in();

        let actions = session
            .handle_frame(Frame::parse(">battle-1\n|line1"))
            .unwrap();

        let frame = delivered(&actions).expect("should deliver");
        assert_eq!(frame.room, "battle-1");
        assert_eq!(frame.lines, vec!["|line1"]);
    }

    // =====================================================================
    // begin_login() / complete_login()
    // =====================================================================

    #[test]
    fn test_begin_login_without_challenge_is_missing_challenge() {
        let mut session = connected();

        assert!(matches!(
            session.begin_login(),
            Err(SessionError::MissingChallenge)
        ));
        assert_eq!(session.state(), SessionState::Connected);
    }

    #[test]
    fn test_complete_login_current_attempt_builds_trn() {
        let mut session = connected();
        session.handle_frame(Frame::parse("|challstr|4|abc")).unwrap();

        let msg = session
            .complete_login(1, &Assertion::new("signed"))
            .unwrap()
            .expect("current attempt should produce a command");

        assert_eq!(msg.to_line(), "|/trn Bot,0,signed");
    }

    #[test]
    fn test_complete_login_stale_attempt_returns_none() {
        let mut session = connected();
        session.handle_frame(Frame::parse("|challstr|one")).unwrap();
        session.handle_frame(Frame::parse("|challstr|two")).unwrap();

        let result = session.complete_login(1, &Assertion::new("old")).unwrap();

        assert!(result.is_none(), "stale assertion must not be sent");
    }

    #[test]
    fn test_complete_login_newline_in_assertion_is_protocol_error() {
        let mut session = connected();
        session.handle_frame(Frame::parse("|challstr|c")).unwrap();

        let result = session.complete_login(1, &Assertion::new("a\nb"));

        assert!(matches!(result, Err(SessionError::Protocol(_))));
    }
}
