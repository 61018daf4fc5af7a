//! Historical transition entries recorded on each loop.

use super::LoopState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form context attached to a transition.
pub type TransitionMetadata = Map<String, Value>;

/// Trigger recorded on the synthetic entry appended at creation.
pub const CREATED_TRIGGER: &str = "created";

/// One recorded move between lifecycle states.
///
/// Entries are immutable once appended to a record's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopTransition {
    from_state: Option<LoopState>,
    to_state: LoopState,
    trigger: String,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    metadata: TransitionMetadata,
}

impl LoopTransition {
    pub(super) const fn new(
        from_state: Option<LoopState>,
        to_state: LoopState,
        trigger: String,
        timestamp: DateTime<Utc>,
        metadata: TransitionMetadata,
    ) -> Self {
        Self {
            from_state,
            to_state,
            trigger,
            timestamp,
            metadata,
        }
    }

    /// Returns the state left by this transition.
    ///
    /// `None` only for the entry recorded when the loop was created.
    #[must_use]
    pub const fn from_state(&self) -> Option<LoopState> {
        self.from_state
    }

    /// Returns the state entered by this transition.
    #[must_use]
    pub const fn to_state(&self) -> LoopState {
        self.to_state
    }

    /// Returns the label of the event that caused the transition.
    #[must_use]
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Returns when the transition was applied.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the context recorded with the transition.
    #[must_use]
    pub const fn metadata(&self) -> &TransitionMetadata {
        &self.metadata
    }
}
