//! Task aggregate root.

use super::{TaskDescription, TaskDomainError, TaskHistoryEntry, TaskId, TaskStatus, TaskTitle};
use crate::user::domain::UserId;
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// Every mutating method returns the [`TaskHistoryEntry`] describing the
/// change; callers persist both together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<TaskDescription>,
    status: TaskStatus,
    assigned_to: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated input for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Task title.
    pub title: TaskTitle,
    /// Optional description.
    pub description: Option<TaskDescription>,
    /// Initial assignee, if any.
    pub assigned_to: Option<UserId>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<TaskDescription>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted assignee, if any.
    pub assigned_to: Option<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in [`TaskStatus::ToDo`] together with its
    /// creation history entry.
    #[must_use]
    pub fn create(
        draft: TaskDraft,
        created_by: UserId,
        clock: &impl Clock,
    ) -> (Self, TaskHistoryEntry) {
        let timestamp = stamp(clock);
        let task = Self {
            id: TaskId::new(),
            title: draft.title,
            description: draft.description,
            status: TaskStatus::ToDo,
            assigned_to: draft.assigned_to,
            created_at: timestamp,
            updated_at: timestamp,
        };
        let entry = TaskHistoryEntry::creation(task.id, task.status, created_by, timestamp);
        (task, entry)
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            assigned_to: data.assigned_to,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the current assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the task to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the
    /// transition table does not allow the move, including a move to the
    /// current status. The task is left untouched in that case.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        changed_by: UserId,
        clock: &impl Clock,
    ) -> Result<TaskHistoryEntry, TaskDomainError> {
        let from = self.status;
        if !from.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from,
                to: target,
            });
        }

        let timestamp = stamp(clock);
        self.status = target;
        self.updated_at = timestamp;
        Ok(TaskHistoryEntry::status_change(
            self.id, from, target, changed_by, timestamp,
        ))
    }

    /// Replaces the assignee. `None` unassigns the task.
    ///
    /// Reassigning to the current assignee is allowed and still recorded.
    #[must_use]
    pub fn assign(
        &mut self,
        assignee: Option<UserId>,
        changed_by: UserId,
        clock: &impl Clock,
    ) -> TaskHistoryEntry {
        let timestamp = stamp(clock);
        let previous = std::mem::replace(&mut self.assigned_to, assignee);
        self.updated_at = timestamp;
        TaskHistoryEntry::assignment_change(self.id, previous, assignee, changed_by, timestamp)
    }
}

/// Reads the clock at the microsecond precision `TIMESTAMPTZ` stores, so a
/// returned task matches what a later read yields.
fn stamp(clock: &impl Clock) -> DateTime<Utc> {
    clock.utc().trunc_subsecs(6)
}
