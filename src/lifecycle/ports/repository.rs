//! Repository port for loop record persistence and lookup.

use crate::lifecycle::domain::{LoopId, LoopRecord, LoopState};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for loop repository operations.
pub type LoopRepositoryResult<T> = Result<T, LoopRepositoryError>;

/// Loop record persistence contract.
///
/// Backends provide plain read and write semantics only. Any conditional
/// write or optimistic locking lives beneath this contract.
#[async_trait]
pub trait LoopRepository: Send + Sync {
    /// Creates or replaces the record with the same identifier.
    ///
    /// Saving an identical record twice leaves storage unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LoopRepositoryError`] when the backend cannot persist the
    /// record.
    async fn save(&self, record: &LoopRecord) -> LoopRepositoryResult<LoopRecord>;

    /// Finds a record by identifier.
    ///
    /// Returns `None` when the record does not exist.
    async fn get(&self, id: &LoopId) -> LoopRepositoryResult<Option<LoopRecord>>;

    /// Removes a record.
    ///
    /// Returns `false` when the identifier was unknown.
    async fn delete(&self, id: &LoopId) -> LoopRepositoryResult<bool>;

    /// Returns up to `limit` records currently in `state`.
    ///
    /// Ordering is backend-specific.
    async fn list_by_state(
        &self,
        state: LoopState,
        limit: usize,
    ) -> LoopRepositoryResult<Vec<LoopRecord>>;
}

/// Errors returned by loop repository implementations.
#[derive(Debug, Clone, Error)]
pub enum LoopRepositoryError {
    /// A record could not be converted to or from its storage shape.
    #[error("serialization error: {0}")]
    Serialization(Arc<serde_json::Error>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LoopRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<serde_json::Error> for LoopRepositoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(Arc::new(err))
    }
}
