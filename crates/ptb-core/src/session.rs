//! Session status shared from the resilience loop to command handlers.
//!
//! The loop owns the only `SessionHandle` (the writer); handlers hold
//! `SessionView`s, which can read the latest status but never change it.

use std::fmt;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::domain::BotIdentity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
    /// Terminal: the credential was rejected.
    Aborted,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::Connected => "connected",
            SessionState::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionStatus {
    pub state: SessionState,
    /// Connect attempts made so far, including the current one.
    pub attempts: u32,
    pub connected_since: Option<DateTime<Utc>>,
    pub identity: Option<BotIdentity>,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self {
            state: SessionState::Disconnected,
            attempts: 0,
            connected_since: None,
            identity: None,
        }
    }
}

/// Writer side, owned by the resilience loop.
#[derive(Debug)]
pub struct SessionHandle {
    tx: watch::Sender<SessionStatus>,
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionStatus::default());
        Self { tx }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            rx: self.tx.subscribe(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.tx.borrow().clone()
    }

    pub(crate) fn begin_attempt(&self) {
        self.tx.send_modify(|s| {
            s.state = SessionState::Connecting;
            s.attempts += 1;
            s.connected_since = None;
        });
    }

    pub(crate) fn set_connected(&self) {
        self.tx.send_modify(|s| {
            s.state = SessionState::Connected;
            s.connected_since = Some(Utc::now());
        });
    }

    pub(crate) fn set_state(&self, state: SessionState) {
        self.tx.send_modify(|s| {
            s.state = state;
            if state != SessionState::Connected {
                s.connected_since = None;
            }
        });
    }

    /// Record who we are logged in as. Called by connectors after the platform
    /// accepted the credential.
    pub fn set_identity(&self, identity: BotIdentity) {
        self.tx.send_modify(|s| s.identity = Some(identity));
    }
}

/// Read-only side handed to command handlers.
#[derive(Clone, Debug)]
pub struct SessionView {
    rx: watch::Receiver<SessionStatus>,
}

impl SessionView {
    pub fn status(&self) -> SessionStatus {
        self.rx.borrow().clone()
    }

    /// A view that never changes; handy for handlers exercised outside a loop.
    pub fn detached(status: SessionStatus) -> Self {
        let (_tx, rx) = watch::channel(status);
        Self { rx }
    }
}
