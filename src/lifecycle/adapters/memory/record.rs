//! In-memory repository for loop lifecycle tests and prototyping.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::lifecycle::{
    domain::{LoopId, LoopRecord, LoopState},
    ports::{LoopRepository, LoopRepositoryError, LoopRepositoryResult},
};

/// In-memory loop repository.
///
/// Records are stored in their serialized shape so every read exercises the
/// same round trip a real backend performs. Read-modify-write sequences are
/// not isolated from each other.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoopRepository {
    records: Arc<RwLock<HashMap<LoopId, Value>>>,
}

impl InMemoryLoopRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`LoopRepositoryError::Persistence`] if the lock is poisoned.
    pub fn len(&self) -> LoopRepositoryResult<usize> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.len())
    }

    /// Returns whether the repository holds no records.
    ///
    /// # Errors
    ///
    /// Returns [`LoopRepositoryError::Persistence`] if the lock is poisoned.
    pub fn is_empty(&self) -> LoopRepositoryResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<E: std::fmt::Display>(err: E) -> LoopRepositoryError {
    LoopRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn state_matches(value: &Value, state: LoopState) -> bool {
    value.get("state").and_then(Value::as_str) == Some(state.as_str())
}

#[async_trait]
impl LoopRepository for InMemoryLoopRepository {
    async fn save(&self, record: &LoopRecord) -> LoopRepositoryResult<LoopRecord> {
        let value = record.to_value()?;
        let mut records = self.records.write().map_err(poisoned)?;
        records.insert(record.record_id().clone(), value);
        Ok(record.clone())
    }

    async fn get(&self, id: &LoopId) -> LoopRepositoryResult<Option<LoopRecord>> {
        let records = self.records.read().map_err(poisoned)?;
        records
            .get(id)
            .map(|value| LoopRecord::from_value(value.clone()))
            .transpose()
            .map_err(LoopRepositoryError::from)
    }

    async fn delete(&self, id: &LoopId) -> LoopRepositoryResult<bool> {
        let mut records = self.records.write().map_err(poisoned)?;
        Ok(records.remove(id).is_some())
    }

    async fn list_by_state(
        &self,
        state: LoopState,
        limit: usize,
    ) -> LoopRepositoryResult<Vec<LoopRecord>> {
        let records = self.records.read().map_err(poisoned)?;
        records
            .values()
            .filter(|value| state_matches(value, state))
            .take(limit)
            .map(|value| LoopRecord::from_value(value.clone()).map_err(LoopRepositoryError::from))
            .collect()
    }
}
