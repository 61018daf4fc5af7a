//! Observer port for successful loop transitions.

use crate::lifecycle::domain::{LoopRecord, LoopState};

/// Error type returned by failing hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Observer notified after a transition has been persisted.
///
/// Hooks are best-effort: their failures are logged by the service and never
/// change the outcome of the transition.
pub trait TransitionHook: Send + Sync {
    /// Handles a persisted transition from `previous` to `current`.
    ///
    /// # Errors
    ///
    /// Any error is logged and discarded by the caller.
    fn on_transition(
        &self,
        record: &LoopRecord,
        previous: LoopState,
        current: LoopState,
        trigger: &str,
    ) -> Result<(), HookError>;
}

impl<F> TransitionHook for F
where
    F: Fn(&LoopRecord, LoopState, LoopState, &str) -> Result<(), HookError> + Send + Sync,
{
    fn on_transition(
        &self,
        record: &LoopRecord,
        previous: LoopState,
        current: LoopState,
        trigger: &str,
    ) -> Result<(), HookError> {
        self(record, previous, current, trigger)
    }
}
