//! Loop record aggregate root and its creation parameters.

use super::{
    CREATED_TRIGGER, LoopDomainError, LoopId, LoopIdGenerator, LoopState, LoopTransition,
    TransitionMetadata,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Validated parameters for opening a new loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoopRecord {
    reference: String,
    ref_number: Option<u64>,
    repo: Option<String>,
    auto_merge: bool,
    labels: BTreeMap<String, String>,
}

impl NewLoopRecord {
    /// Creates loop parameters for the given external reference.
    ///
    /// The reference is kept verbatim; only blank values are refused.
    ///
    /// # Errors
    ///
    /// Returns [`LoopDomainError::EmptyReference`] when the reference is
    /// blank.
    pub fn new(reference: impl Into<String>) -> Result<Self, LoopDomainError> {
        let raw = reference.into();
        if raw.trim().is_empty() {
            return Err(LoopDomainError::EmptyReference);
        }
        Ok(Self {
            reference: raw,
            ref_number: None,
            repo: None,
            auto_merge: false,
            labels: BTreeMap::new(),
        })
    }

    /// Sets the numeric reference (issue number, ticket number).
    #[must_use]
    pub const fn with_ref_number(mut self, ref_number: u64) -> Self {
        self.ref_number = Some(ref_number);
        self
    }

    /// Sets the repository identifier, e.g. `owner/repo`.
    #[must_use]
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    /// Sets whether the pull request merges automatically once CI passes.
    #[must_use]
    pub const fn with_auto_merge(mut self, auto_merge: bool) -> Self {
        self.auto_merge = auto_merge;
        self
    }

    /// Sets user-defined labels.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = (String, String)>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }
}

/// Loop record aggregate root.
///
/// The only mutation path is [`LoopRecord::apply_transition`], which keeps
/// `state` equal to the last history entry and never rewrites history.
/// Deserialization goes through [`LoopRecord::from_persisted`], so stored
/// records that break that invariant fail to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersistedLoopData")]
pub struct LoopRecord {
    record_id: LoopId,
    #[serde(rename = "ref")]
    reference: String,
    ref_number: Option<u64>,
    repo: Option<String>,
    pr_url: Option<String>,
    pr_number: Option<u64>,
    state: LoopState,
    auto_merge: bool,
    ci_status: BTreeMap<String, String>,
    transitions: Vec<LoopTransition>,
    labels: BTreeMap<String, String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted loop record.
///
/// Deserializes from the same storage shape [`LoopRecord`] serializes to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistedLoopData {
    /// Persisted record identifier.
    pub record_id: LoopId,
    /// Persisted external reference.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Persisted numeric reference, if any.
    pub ref_number: Option<u64>,
    /// Persisted repository identifier, if any.
    pub repo: Option<String>,
    /// Persisted pull request URL, if any.
    pub pr_url: Option<String>,
    /// Persisted pull request number, if any.
    pub pr_number: Option<u64>,
    /// Persisted lifecycle state.
    pub state: LoopState,
    /// Persisted auto-merge flag.
    pub auto_merge: bool,
    /// Persisted CI check statuses.
    #[serde(default)]
    pub ci_status: BTreeMap<String, String>,
    /// Persisted transition history, oldest first.
    pub transitions: Vec<LoopTransition>,
    /// Persisted labels.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted closing timestamp, if the loop was closed.
    pub closed_at: Option<DateTime<Utc>>,
}

impl LoopRecord {
    /// Opens a new loop in [`LoopState::IssueCreated`].
    ///
    /// The history starts with a synthetic `created` entry whose metadata
    /// carries the reference and repository.
    #[must_use]
    pub fn create(
        params: NewLoopRecord,
        ids: &(impl LoopIdGenerator + ?Sized),
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        let mut metadata = TransitionMetadata::new();
        metadata.insert("ref".to_owned(), Value::from(params.reference.clone()));
        metadata.insert(
            "repo".to_owned(),
            params.repo.clone().map_or(Value::Null, Value::from),
        );

        Self {
            record_id: ids.next_id(),
            reference: params.reference,
            ref_number: params.ref_number,
            repo: params.repo,
            pr_url: None,
            pr_number: None,
            state: LoopState::IssueCreated,
            auto_merge: params.auto_merge,
            ci_status: BTreeMap::new(),
            transitions: vec![LoopTransition::new(
                None,
                LoopState::IssueCreated,
                CREATED_TRIGGER.to_owned(),
                timestamp,
                metadata,
            )],
            labels: params.labels,
            created_at: timestamp,
            updated_at: timestamp,
            closed_at: None,
        }
    }

    /// Reconstructs a loop record from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`LoopDomainError::EmptyHistory`] when the history has no
    /// entries and [`LoopDomainError::StateHistoryMismatch`] when `state`
    /// differs from the target of the last history entry.
    pub fn from_persisted(data: PersistedLoopData) -> Result<Self, LoopDomainError> {
        let Some(last) = data.transitions.last() else {
            return Err(LoopDomainError::EmptyHistory {
                record_id: data.record_id,
            });
        };
        if last.to_state() != data.state {
            return Err(LoopDomainError::StateHistoryMismatch {
                record_id: data.record_id,
                state: data.state,
                last: last.to_state(),
            });
        }

        Ok(Self {
            record_id: data.record_id,
            reference: data.reference,
            ref_number: data.ref_number,
            repo: data.repo,
            pr_url: data.pr_url,
            pr_number: data.pr_number,
            state: data.state,
            auto_merge: data.auto_merge,
            ci_status: data.ci_status,
            transitions: data.transitions,
            labels: data.labels,
            created_at: data.created_at,
            updated_at: data.updated_at,
            closed_at: data.closed_at,
        })
    }

    /// Serializes the record into its plain structured storage shape.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if serialization fails.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Deserializes a record from its plain structured storage shape.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error when the value does not
    /// describe a loop record or its history is inconsistent.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn record_id(&self) -> &LoopId {
        &self.record_id
    }

    /// Returns the external reference (issue URL, ticket ID).
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the numeric reference, if any.
    #[must_use]
    pub const fn ref_number(&self) -> Option<u64> {
        self.ref_number
    }

    /// Returns the repository identifier, if any.
    #[must_use]
    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    /// Returns the pull request URL, if any.
    #[must_use]
    pub fn pr_url(&self) -> Option<&str> {
        self.pr_url.as_deref()
    }

    /// Returns the pull request number, if any.
    #[must_use]
    pub const fn pr_number(&self) -> Option<u64> {
        self.pr_number
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// Returns whether the pull request merges automatically once CI passes.
    #[must_use]
    pub const fn auto_merge(&self) -> bool {
        self.auto_merge
    }

    /// Returns the CI check statuses.
    #[must_use]
    pub const fn ci_status(&self) -> &BTreeMap<String, String> {
        &self.ci_status
    }

    /// Returns the transition history, oldest first.
    #[must_use]
    pub fn transitions(&self) -> &[LoopTransition] {
        &self.transitions
    }

    /// Returns the user-defined labels.
    #[must_use]
    pub const fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns when the loop entered [`LoopState::Closed`], if it has.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Returns whether the record may move to `target` from its current
    /// state.
    #[must_use]
    pub fn can_transition_to(&self, target: LoopState) -> bool {
        self.state.can_transition_to(target)
    }

    /// Moves the record to `target` and appends the move to its history.
    ///
    /// Entering [`LoopState::Closed`] also stamps `closed_at`.
    ///
    /// # Errors
    ///
    /// Returns [`LoopDomainError::InvalidStateTransition`] when the
    /// transition table does not allow the move. The record is left
    /// untouched in that case.
    pub fn apply_transition(
        &mut self,
        target: LoopState,
        trigger: impl Into<String>,
        metadata: Option<TransitionMetadata>,
        clock: &impl Clock,
    ) -> Result<(), LoopDomainError> {
        if !self.can_transition_to(target) {
            return Err(LoopDomainError::InvalidStateTransition {
                record_id: self.record_id.clone(),
                from: self.state,
                to: target,
            });
        }

        let timestamp = clock.utc();
        self.transitions.push(LoopTransition::new(
            Some(self.state),
            target,
            trigger.into(),
            timestamp,
            metadata.unwrap_or_default(),
        ));
        self.state = target;
        self.updated_at = timestamp;
        if target == LoopState::Closed {
            self.closed_at = Some(timestamp);
        }
        Ok(())
    }
}

impl TryFrom<PersistedLoopData> for LoopRecord {
    type Error = LoopDomainError;

    fn try_from(data: PersistedLoopData) -> Result<Self, Self::Error> {
        Self::from_persisted(data)
    }
}
