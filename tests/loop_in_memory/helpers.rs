//! Shared test helpers for in-memory loop lifecycle integration tests.

use std::sync::Arc;

use loopforge::lifecycle::{
    adapters::memory::InMemoryLoopRepository,
    domain::{LoopId, LoopState},
    services::LoopService,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the integration tests.
pub type TestService = LoopService<InMemoryLoopRepository, DefaultClock>;

/// Provides a service over a fresh in-memory repository.
#[fixture]
pub fn service() -> TestService {
    LoopService::new(
        Arc::new(InMemoryLoopRepository::new()),
        Arc::new(DefaultClock),
    )
}

/// Applies each `(target, trigger)` step, failing on the first rejection.
///
/// # Errors
///
/// Returns an error if storage fails or any step is rejected.
pub async fn walk(
    service: &TestService,
    id: &LoopId,
    steps: &[(LoopState, &str)],
) -> eyre::Result<()> {
    for (target, trigger) in steps {
        let result = service.transition(id, *target, *trigger, None).await?;
        eyre::ensure!(
            result.is_success(),
            "step to {target} rejected: {:?}",
            result.error()
        );
    }
    Ok(())
}
