// Lifecycle shared by the draft editor and the room composer:
// Closed -> Open -> Committing -> Closed (success) | Open (failure)

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Closed,
    Open,
    Committing,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Closed => "closed",
            SessionState::Open => "open",
            SessionState::Committing => "committing",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session is not open (currently {0})")]
    NotOpen(SessionState),

    #[error("A submission is already in flight")]
    AlreadyCommitting,
}

impl SessionState {
    pub fn is_open(self) -> bool {
        self == SessionState::Open
    }

    // Edits and submissions are only accepted while the operator holds an open session
    pub fn ensure_open(self) -> Result<(), SessionError> {
        match self {
            SessionState::Open => Ok(()),
            SessionState::Committing => Err(SessionError::AlreadyCommitting),
            SessionState::Closed => Err(SessionError::NotOpen(self)),
        }
    }

    pub fn ensure_not_committing(self) -> Result<(), SessionError> {
        match self {
            SessionState::Committing => Err(SessionError::AlreadyCommitting),
            _ => Ok(()),
        }
    }
}
