//! Given steps for loop state transition BDD scenarios.

use super::world::{LoopTransitionWorld, run_async};
use eyre::WrapErr;
use loopforge::lifecycle::{
    domain::{LoopId, LoopState},
    services::CreateLoopRequest,
};
use rstest_bdd_macros::given;

#[given(r#"a loop opened for reference "{reference}""#)]
fn loop_opened(world: &mut LoopTransitionWorld, reference: String) -> Result<(), eyre::Report> {
    let created = run_async(world.service.create(CreateLoopRequest::new(reference)))
        .wrap_err("open loop for transition scenario")?;
    world.loop_id = Some(created.record_id().clone());
    Ok(())
}

#[given(r#"no loop exists with id "{loop_id}""#)]
fn no_loop_exists(world: &mut LoopTransitionWorld, loop_id: String) -> Result<(), eyre::Report> {
    let id = LoopId::new(loop_id).wrap_err("parse loop id for scenario")?;
    let existing = run_async(world.service.get(&id)).wrap_err("look up loop in scenario")?;
    eyre::ensure!(existing.is_none(), "loop {id} unexpectedly exists");
    world.loop_id = Some(id);
    Ok(())
}

#[given(r#"the loop has been transitioned to "{target_state}" by "{trigger}""#)]
fn loop_has_been_transitioned(
    world: &mut LoopTransitionWorld,
    target_state: String,
    trigger: String,
) -> Result<(), eyre::Report> {
    let id = world.loop_id()?;
    let target = LoopState::try_from(target_state.as_str())
        .map_err(|err| eyre::eyre!("invalid setup state in scenario: {err}"))?;

    let result = run_async(world.service.transition(&id, target, trigger, None))
        .wrap_err("transition loop in scenario setup")?;
    eyre::ensure!(
        result.is_success(),
        "setup transition to {target} rejected: {:?}",
        result.error()
    );
    Ok(())
}
