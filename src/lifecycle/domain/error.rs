//! Error types for loop domain validation and parsing.

use super::{LoopId, LoopState};
use thiserror::Error;

/// Errors returned while constructing or mutating loop records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoopDomainError {
    /// The external reference is empty or whitespace.
    #[error("loop reference must not be empty")]
    EmptyReference,

    /// The loop identifier is empty or whitespace.
    #[error("loop identifier must not be empty")]
    EmptyLoopId,

    /// The requested state transition is not permitted.
    #[error("invalid state transition for loop {record_id}: {from} -> {to}")]
    InvalidStateTransition {
        /// Record whose transition was rejected.
        record_id: LoopId,
        /// State the record was in.
        from: LoopState,
        /// State that was requested.
        to: LoopState,
    },

    /// A persisted record carries no transition history.
    #[error("loop {record_id} has an empty transition history")]
    EmptyHistory {
        /// Record that failed to load.
        record_id: LoopId,
    },

    /// A persisted record's state disagrees with its last history entry.
    #[error("loop {record_id} is in state {state} but its history ends at {last}")]
    StateHistoryMismatch {
        /// Record that failed to load.
        record_id: LoopId,
        /// Stored state.
        state: LoopState,
        /// Target of the last history entry.
        last: LoopState,
    },
}

/// Error returned while parsing loop states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown loop state: {0}")]
pub struct ParseLoopStateError(pub String);
