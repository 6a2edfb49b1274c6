//! Then steps for task status transition scenarios.

use super::world::{StatusWorld, run_async};
use rstest_bdd_macros::then;
use tasktrack::task::{
    domain::{ChangeType, TaskDomainError, TaskStatus},
    services::{TaskLifecycleError, TaskWithHistory},
};

fn current(world: &StatusWorld) -> Result<TaskWithHistory, eyre::Report> {
    run_async(world.lifecycle.get_task_with_history(world.task_id()?))?
        .ok_or_else(|| eyre::eyre!("task missing from repository"))
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &StatusWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())?;
    let actual = current(world)?.task.task.status();

    if actual != expected {
        return Err(eyre::eyre!("expected status {expected}, found {actual}"));
    }
    Ok(())
}

#[then(r#"the latest history entry records "{from}" to "{to}""#)]
fn latest_entry_records(world: &StatusWorld, from: String, to: String) -> Result<(), eyre::Report> {
    let detail = current(world)?;
    let latest = detail
        .history
        .first()
        .ok_or_else(|| eyre::eyre!("task has no history"))?;

    let entry = &latest.entry;
    if entry.change_type() != ChangeType::StatusChange
        || entry.old_value() != Some(from.as_str())
        || entry.new_value() != Some(to.as_str())
    {
        return Err(eyre::eyre!("unexpected latest entry {entry:?}"));
    }
    Ok(())
}

#[then("the task has {count:u64} history entries")]
fn task_has_history_entries(world: &StatusWorld, count: u64) -> Result<(), eyre::Report> {
    let actual = u64::try_from(current(world)?.history.len())?;

    if actual != count {
        return Err(eyre::eyre!("expected {count} history entries, found {actual}"));
    }
    Ok(())
}

#[then("the move fails with an invalid status transition error")]
fn move_fails_with_invalid_transition(world: &StatusWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_move
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing move result"))?;

    if !matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InvalidStatusTransition { .. }
        ))
    ) {
        return Err(eyre::eyre!(
            "expected InvalidStatusTransition error, got {result:?}"
        ));
    }
    Ok(())
}

#[then("the move fails because the user was not found")]
fn move_fails_with_unknown_user(world: &StatusWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_move
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing move result"))?;

    if !matches!(result, Err(TaskLifecycleError::ChangerNotFound(_))) {
        return Err(eyre::eyre!("expected ChangerNotFound error, got {result:?}"));
    }
    Ok(())
}
