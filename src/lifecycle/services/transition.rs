//! Service layer for loop creation, lookup, and state transitions.

use super::{LoopServiceConfig, TransitionError, TransitionResult};
use crate::lifecycle::{
    domain::{
        LoopDomainError, LoopId, LoopIdGenerator, LoopRecord, LoopState, NewLoopRecord,
        RandomLoopIdGenerator, TransitionMetadata,
    },
    ports::{HookError, LoopRepository, LoopRepositoryError, LoopRepositoryResult, TransitionHook},
};
use mockable::Clock;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for opening a new loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLoopRequest {
    reference: String,
    ref_number: Option<u64>,
    repo: Option<String>,
    auto_merge: bool,
    labels: BTreeMap<String, String>,
}

impl CreateLoopRequest {
    /// Creates a request for the given external reference.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            ref_number: None,
            repo: None,
            auto_merge: false,
            labels: BTreeMap::new(),
        }
    }

    /// Sets the numeric reference.
    #[must_use]
    pub const fn with_ref_number(mut self, ref_number: u64) -> Self {
        self.ref_number = Some(ref_number);
        self
    }

    /// Sets the repository identifier.
    #[must_use]
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    /// Sets the auto-merge flag.
    #[must_use]
    pub const fn with_auto_merge(mut self, auto_merge: bool) -> Self {
        self.auto_merge = auto_merge;
        self
    }

    /// Replaces the labels.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = (String, String)>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    /// Adds a single label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    fn into_domain(self) -> Result<NewLoopRecord, LoopDomainError> {
        let mut params = NewLoopRecord::new(self.reference)?
            .with_auto_merge(self.auto_merge)
            .with_labels(self.labels);
        if let Some(ref_number) = self.ref_number {
            params = params.with_ref_number(ref_number);
        }
        if let Some(repo) = self.repo {
            params = params.with_repo(repo);
        }
        Ok(params)
    }
}

/// Service-level errors for loop creation.
#[derive(Debug, Error)]
pub enum LoopServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] LoopDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] LoopRepositoryError),
}

/// Result type for loop service operations.
pub type LoopServiceResult<T> = Result<T, LoopServiceError>;

/// Loop lifecycle orchestration service.
///
/// A transition loads the record, validates the move, applies it, saves the
/// record, and then notifies hooks in registration order. Nothing is locked
/// or versioned: two concurrent transitions of the same loop may race.
pub struct LoopService<R, C, G = RandomLoopIdGenerator>
where
    R: LoopRepository,
    C: Clock + Send + Sync,
    G: LoopIdGenerator,
{
    repository: Arc<R>,
    clock: Arc<C>,
    ids: Arc<G>,
    config: LoopServiceConfig,
    hooks: Vec<Arc<dyn TransitionHook>>,
}

impl<R, C, G> Clone for LoopService<R, C, G>
where
    R: LoopRepository,
    C: Clock + Send + Sync,
    G: LoopIdGenerator,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            ids: Arc::clone(&self.ids),
            config: self.config.clone(),
            hooks: self.hooks.clone(),
        }
    }
}

impl<R, C> LoopService<R, C>
where
    R: LoopRepository,
    C: Clock + Send + Sync,
{
    /// Creates a loop service that generates random loop identifiers.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self::with_id_generator(repository, clock, Arc::new(RandomLoopIdGenerator))
    }
}

impl<R, C, G> LoopService<R, C, G>
where
    R: LoopRepository,
    C: Clock + Send + Sync,
    G: LoopIdGenerator,
{
    /// Creates a loop service with an explicit identifier source.
    #[must_use]
    pub fn with_id_generator(repository: Arc<R>, clock: Arc<C>, ids: Arc<G>) -> Self {
        Self {
            repository,
            clock,
            ids,
            config: LoopServiceConfig::default(),
            hooks: Vec::new(),
        }
    }

    /// Replaces the service configuration.
    #[must_use]
    pub fn with_config(mut self, config: LoopServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers hooks in iteration order.
    #[must_use]
    pub fn with_hooks(mut self, hooks: impl IntoIterator<Item = Arc<dyn TransitionHook>>) -> Self {
        self.hooks.extend(hooks);
        self
    }

    /// Registers a hook fired after every later successful transition.
    pub fn add_hook(&mut self, hook: impl TransitionHook + 'static) {
        self.hooks.push(Arc::new(hook));
    }

    /// Returns the number of registered hooks.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &LoopServiceConfig {
        &self.config
    }

    /// Returns the backing repository.
    #[must_use]
    pub const fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Opens a new loop and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`LoopServiceError::Domain`] when the reference is blank and
    /// [`LoopServiceError::Repository`] when the record cannot be saved.
    pub async fn create(&self, request: CreateLoopRequest) -> LoopServiceResult<LoopRecord> {
        let record = LoopRecord::create(request.into_domain()?, &*self.ids, &*self.clock);
        let saved = self.repository.save(&record).await?;
        debug!(
            record_id = %saved.record_id(),
            reference = saved.reference(),
            "loop created"
        );
        Ok(saved)
    }

    /// Retrieves a loop by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`LoopRepositoryError`] when the lookup fails.
    pub async fn get(&self, id: &LoopId) -> LoopRepositoryResult<Option<LoopRecord>> {
        self.repository.get(id).await
    }

    /// Lists loops in `state`, up to `limit` or the configured default.
    ///
    /// # Errors
    ///
    /// Returns [`LoopRepositoryError`] when the query fails.
    pub async fn list_by_state(
        &self,
        state: LoopState,
        limit: Option<usize>,
    ) -> LoopRepositoryResult<Vec<LoopRecord>> {
        let limit = limit.unwrap_or(self.config.default_list_limit);
        self.repository.list_by_state(state, limit).await
    }

    /// Moves a loop to `target`, recording `trigger` and `metadata`.
    ///
    /// Rejections (unknown loop, disallowed move) are returned inside the
    /// [`TransitionResult`] and leave storage untouched. Hook failures are
    /// logged and do not affect the result.
    ///
    /// # Errors
    ///
    /// Returns [`LoopRepositoryError`] unchanged when loading or saving the
    /// record fails.
    pub async fn transition(
        &self,
        id: &LoopId,
        target: LoopState,
        trigger: impl Into<String> + Send,
        metadata: Option<TransitionMetadata>,
    ) -> LoopRepositoryResult<TransitionResult> {
        let Some(mut record) = self.repository.get(id).await? else {
            debug!(record_id = %id, "transition requested for unknown loop");
            return Ok(TransitionResult::not_found(id.clone()));
        };

        let previous = record.state();
        if !record.can_transition_to(target) {
            let error = TransitionError::InvalidTransition {
                from: previous,
                to: target,
            };
            debug!(record_id = %id, %error, "transition rejected");
            return Ok(TransitionResult::rejected(record, error));
        }

        let trigger = trigger.into();
        if let Err(err) = record.apply_transition(target, trigger.as_str(), metadata, &*self.clock)
        {
            warn!(record_id = %id, error = %err, "validated transition failed to apply");
            return Ok(TransitionResult::rejected(
                record,
                TransitionError::TransitionFailed(err),
            ));
        }

        let saved = self.repository.save(&record).await?;
        info!(
            record_id = %id,
            from = %previous,
            to = %target,
            trigger = trigger.as_str(),
            "{id}: {previous} → {target} ({trigger})"
        );

        self.notify_hooks(&saved, previous, target, &trigger);
        Ok(TransitionResult::applied(saved, previous, target))
    }

    fn notify_hooks(
        &self,
        record: &LoopRecord,
        previous: LoopState,
        current: LoopState,
        trigger: &str,
    ) {
        for hook in &self.hooks {
            let outcome = if self.config.catch_hook_panics {
                panic::catch_unwind(AssertUnwindSafe(|| {
                    hook.on_transition(record, previous, current, trigger)
                }))
                .unwrap_or_else(|payload| Err(HookError::from(panic_message(&*payload))))
            } else {
                hook.on_transition(record, previous, current, trigger)
            };

            if let Err(err) = outcome {
                warn!(
                    record_id = %record.record_id(),
                    error = %err,
                    "transition hook failed"
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "hook panicked".to_owned())
}
