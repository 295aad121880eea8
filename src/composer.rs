// Room Composer: working copy of one new room until it is submitted

use crate::room::{CoercionPolicy, RoomChange, RoomDraft, RoomPayload, ValidationError};
use crate::session::{SessionError, SessionState};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Default)]
pub struct RoomComposer {
    state: SessionState,
    draft: Arc<RoomDraft>,
}

impl RoomComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn draft(&self) -> Arc<RoomDraft> {
        Arc::clone(&self.draft)
    }

    // Every session starts from empty fields
    pub fn open(&mut self) -> Result<(), SessionError> {
        self.state.ensure_not_committing()?;
        self.draft = Arc::default();
        self.state = SessionState::Open;
        Ok(())
    }

    pub fn set(&mut self, change: RoomChange) -> Result<(), SessionError> {
        self.state.ensure_open()?;
        self.draft = Arc::new(self.draft.with_change(change));
        Ok(())
    }

    // Coerces the draft and moves to Committing; on a validation error the session stays Open
    pub fn prepare_submit(
        &mut self,
        hotel_id: &str,
        policy: CoercionPolicy,
    ) -> Result<RoomPayload, ComposeError> {
        self.state.ensure_open()?;
        let payload = self.draft.to_payload(hotel_id, policy)?;
        self.state = SessionState::Committing;
        Ok(payload)
    }

    pub fn submit_succeeded(&mut self) {
        self.state = SessionState::Closed;
        self.draft = Arc::default();
    }

    // Entered values stay for the retry
    pub fn submit_failed(&mut self) {
        self.state = SessionState::Open;
    }

    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.state.ensure_not_committing()?;
        self.state = SessionState::Closed;
        Ok(())
    }
}
