//! When steps for task status transition scenarios.

use super::world::{StatusWorld, run_async};
use rstest_bdd_macros::when;
use tasktrack::task::{domain::TaskStatus, services::UpdateTaskStatusRequest};

#[when(r#""{actor}" moves the task to "{status}""#)]
fn move_task(world: &mut StatusWorld, actor: String, status: String) -> Result<(), eyre::Report> {
    let target = TaskStatus::try_from(status.as_str())?;
    let request = UpdateTaskStatusRequest::new(world.task_id()?, target, world.user_id(&actor));

    world.last_move = Some(run_async(world.lifecycle.update_status(request)));
    Ok(())
}
