//! Holder of the active backend session.
//!
//! The slot starts empty, is filled once the backend hands out a session,
//! and is replaced wholesale on "new conversation". A failed session
//! request empties it again so that no turn can be submitted against a
//! stale session.

use consultant_types::error::ChatError;
use consultant_types::session::SessionInfo;

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    session: Option<SessionInfo>,
    /// Completed user+assistant exchanges within the current session.
    turn_count: u32,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }

    /// The active session, or [`ChatError::NoSession`].
    pub fn require(&self) -> Result<&SessionInfo, ChatError> {
        self.session.as_ref().ok_or(ChatError::NoSession)
    }

    /// Install a fresh session and reset the turn counter.
    pub fn replace(&mut self, session: SessionInfo) {
        self.session = Some(session);
        self.turn_count = 0;
    }

    pub fn clear(&mut self) {
        self.session = None;
        self.turn_count = 0;
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn increment_turn(&mut self) {
        self.turn_count += 1;
    }
}
