//! Then steps for loop state transition BDD scenarios.

use super::world::{LoopTransitionWorld, run_async};
use loopforge::lifecycle::{
    domain::{LoopRecord, LoopState},
    services::{TransitionError, TransitionResult},
};
use rstest_bdd_macros::then;

fn stored_loop(world: &LoopTransitionWorld) -> Result<LoopRecord, eyre::Report> {
    let id = world.loop_id()?;
    run_async(world.service.get(&id))?.ok_or_else(|| eyre::eyre!("loop {id} is not stored"))
}

fn last_result(world: &LoopTransitionWorld) -> Result<&TransitionResult, eyre::Report> {
    match world.last_transition_result.as_ref() {
        Some(Ok(result)) => Ok(result),
        Some(Err(err)) => Err(eyre::eyre!("transition hit a storage error: {err}")),
        None => Err(eyre::eyre!("missing transition result")),
    }
}

#[then(r#"the loop state is "{state}""#)]
fn loop_state_is(world: &LoopTransitionWorld, state: String) -> Result<(), eyre::Report> {
    let expected_state = LoopState::try_from(state.as_str())
        .map_err(|err| eyre::eyre!("invalid expected state in scenario: {err}"))?;
    let record = stored_loop(world)?;

    if record.state() != expected_state {
        return Err(eyre::eyre!(
            "expected state {}, found {}",
            expected_state.as_str(),
            record.state().as_str()
        ));
    }
    Ok(())
}

#[then("the loop history has {count:u64} entries")]
fn loop_history_has(world: &LoopTransitionWorld, count: u64) -> Result<(), eyre::Report> {
    let record = stored_loop(world)?;
    let actual = u64::try_from(record.transitions().len())?;
    eyre::ensure!(actual == count, "expected {count} history entries, found {actual}");
    Ok(())
}

#[then("the loop has a closing timestamp")]
fn loop_has_closing_timestamp(world: &LoopTransitionWorld) -> Result<(), eyre::Report> {
    let record = stored_loop(world)?;
    eyre::ensure!(record.closed_at().is_some(), "closed loop has no closed_at");
    Ok(())
}

#[then("the transition is rejected as invalid")]
fn transition_rejected_as_invalid(world: &LoopTransitionWorld) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    if !matches!(
        result.error(),
        Some(TransitionError::InvalidTransition { .. })
    ) {
        return Err(eyre::eyre!(
            "expected InvalidTransition error, got {:?}",
            result.error()
        ));
    }
    eyre::ensure!(!result.is_success());
    Ok(())
}

#[then("the transition is rejected as not found")]
fn transition_rejected_as_not_found(world: &LoopTransitionWorld) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    if !matches!(result.error(), Some(TransitionError::NotFound(_))) {
        return Err(eyre::eyre!(
            "expected NotFound error, got {:?}",
            result.error()
        ));
    }
    eyre::ensure!(result.record().is_none());
    Ok(())
}

#[then("the target state is rejected as unknown")]
fn target_state_rejected(world: &LoopTransitionWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.last_parse_error.is_some(),
        "expected the state name to be rejected"
    );
    eyre::ensure!(
        world.last_transition_result.is_none(),
        "no transition should have been attempted"
    );
    Ok(())
}
