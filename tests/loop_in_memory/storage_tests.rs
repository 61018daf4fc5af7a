//! Repository behaviour observed through the loop service.

use super::helpers::{TestService, service, walk};
use loopforge::lifecycle::{
    domain::LoopState, ports::LoopRepository, services::CreateLoopRequest,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_loop_keeps_labels_and_history(service: TestService) -> eyre::Result<()> {
    let created = service
        .create(
            CreateLoopRequest::new("issue-11")
                .with_repo("org/repo")
                .with_labels([
                    ("priority".to_owned(), "high".to_owned()),
                    ("team".to_owned(), "infra".to_owned()),
                ]),
        )
        .await?;
    walk(
        &service,
        created.record_id(),
        &[(LoopState::TaskQueued, "worker.picked_up")],
    )
    .await?;

    let stored = service
        .get(created.record_id())
        .await?
        .ok_or_else(|| eyre::eyre!("loop should exist"))?;
    eyre::ensure!(stored.record_id() == created.record_id());
    eyre::ensure!(stored.reference() == "issue-11");
    eyre::ensure!(stored.repo() == Some("org/repo"));
    eyre::ensure!(stored.labels() == created.labels());
    eyre::ensure!(stored.transitions().len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_by_state_tracks_current_state(service: TestService) -> eyre::Result<()> {
    let first = service.create(CreateLoopRequest::new("issue-1")).await?;
    let second = service.create(CreateLoopRequest::new("issue-2")).await?;
    walk(
        &service,
        first.record_id(),
        &[(LoopState::TaskQueued, "worker.picked_up")],
    )
    .await?;

    let queued = service.list_by_state(LoopState::TaskQueued, None).await?;
    let created = service.list_by_state(LoopState::IssueCreated, None).await?;

    let queued_ids: Vec<_> = queued.iter().map(|record| record.record_id()).collect();
    let created_ids: Vec<_> = created.iter().map(|record| record.record_id()).collect();
    eyre::ensure!(queued_ids == [first.record_id()]);
    eyre::ensure!(created_ids == [second.record_id()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_loop_can_no_longer_transition(service: TestService) -> eyre::Result<()> {
    let created = service.create(CreateLoopRequest::new("issue-3")).await?;

    eyre::ensure!(service.repository().delete(created.record_id()).await?);
    eyre::ensure!(!service.repository().delete(created.record_id()).await?);

    let result = service
        .transition(
            created.record_id(),
            LoopState::TaskQueued,
            "worker.picked_up",
            None,
        )
        .await?;
    eyre::ensure!(!result.is_success());
    eyre::ensure!(result.record().is_none());
    Ok(())
}
