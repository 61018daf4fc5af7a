//! Outcome types returned by loop transitions.

use crate::lifecycle::domain::{LoopDomainError, LoopId, LoopRecord, LoopState};
use thiserror::Error;

/// Reasons a transition request was rejected.
///
/// These are reported as data inside [`TransitionResult`], never as an
/// `Err`; storage failures travel separately.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// No record exists with the requested identifier.
    #[error("Record not found: {0}")]
    NotFound(LoopId),

    /// The transition table does not allow the move.
    #[error(
        "Invalid transition: {from} → {to}. Allowed from {from}: {}",
        describe_allowed(.from)
    )]
    InvalidTransition {
        /// State the record was in.
        from: LoopState,
        /// State that was requested.
        to: LoopState,
    },

    /// The record rejected a move that validation accepted.
    #[error("Transition failed unexpectedly: {0}")]
    TransitionFailed(#[source] LoopDomainError),
}

fn describe_allowed(state: &LoopState) -> String {
    let allowed = state.allowed_targets();
    if allowed.is_empty() {
        return "none (terminal)".to_owned();
    }
    allowed
        .iter()
        .map(|target| target.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result of a transition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    record: Option<LoopRecord>,
    previous_state: Option<LoopState>,
    new_state: Option<LoopState>,
    error: Option<TransitionError>,
}

impl TransitionResult {
    pub(super) const fn applied(
        record: LoopRecord,
        previous_state: LoopState,
        new_state: LoopState,
    ) -> Self {
        Self {
            record: Some(record),
            previous_state: Some(previous_state),
            new_state: Some(new_state),
            error: None,
        }
    }

    pub(super) const fn not_found(id: LoopId) -> Self {
        Self {
            record: None,
            previous_state: None,
            new_state: None,
            error: Some(TransitionError::NotFound(id)),
        }
    }

    pub(super) const fn rejected(record: LoopRecord, error: TransitionError) -> Self {
        let previous_state = record.state();
        Self {
            record: Some(record),
            previous_state: Some(previous_state),
            new_state: None,
            error: Some(error),
        }
    }

    /// Returns whether the transition was applied and persisted.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the record involved, if it was found.
    ///
    /// After a rejection this is the record as loaded, unchanged.
    #[must_use]
    pub const fn record(&self) -> Option<&LoopRecord> {
        self.record.as_ref()
    }

    /// Consumes the result and returns the record, if it was found.
    #[must_use]
    pub fn into_record(self) -> Option<LoopRecord> {
        self.record
    }

    /// Returns the state the record was in before the request.
    #[must_use]
    pub const fn previous_state(&self) -> Option<LoopState> {
        self.previous_state
    }

    /// Returns the state entered, when the transition succeeded.
    #[must_use]
    pub const fn new_state(&self) -> Option<LoopState> {
        self.new_state
    }

    /// Returns why the transition was rejected, if it was.
    #[must_use]
    pub const fn error(&self) -> Option<&TransitionError> {
        self.error.as_ref()
    }
}
