//! When steps for loop state transition BDD scenarios.

use super::world::{LoopTransitionWorld, run_async};
use loopforge::lifecycle::domain::LoopState;
use rstest_bdd_macros::when;

#[when(r#"the loop is transitioned to "{target_state}" by "{trigger}""#)]
fn transition_loop(
    world: &mut LoopTransitionWorld,
    target_state: String,
    trigger: String,
) -> Result<(), eyre::Report> {
    let id = world.loop_id()?;
    let target = match LoopState::try_from(target_state.as_str()) {
        Ok(target) => target,
        Err(err) => {
            world.last_parse_error = Some(err);
            return Ok(());
        }
    };

    let result = run_async(world.service.transition(&id, target, trigger, None));
    world.last_transition_result = Some(result);
    Ok(())
}
