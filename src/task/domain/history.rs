//! Append-only audit entries recorded for every task mutation.

use super::{HistoryEntryId, ParseChangeTypeError, TaskId, TaskStatus};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of mutation a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    /// The task was created. `new_value` holds the initial status.
    Creation,
    /// The status changed. Old and new values hold status tokens.
    StatusChange,
    /// The assignee changed. Old and new values hold user ids, absent when
    /// the task was or became unassigned.
    AssignmentChange,
}

impl ChangeType {
    /// Returns the canonical token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Creation => "Creation",
            Self::StatusChange => "StatusChange",
            Self::AssignmentChange => "AssignmentChange",
        }
    }
}

impl TryFrom<&str> for ChangeType {
    type Error = ParseChangeTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Creation" => Ok(Self::Creation),
            "StatusChange" => Ok(Self::StatusChange),
            "AssignmentChange" => Ok(Self::AssignmentChange),
            _ => Err(ParseChangeTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of one task mutation.
///
/// Entries are only produced by [`super::Task`] alongside the mutation they
/// describe, or reconstructed from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHistoryEntry {
    id: HistoryEntryId,
    task_id: TaskId,
    changed_by: UserId,
    change_type: ChangeType,
    old_value: Option<String>,
    new_value: Option<String>,
    change_date: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHistoryData {
    /// Persisted entry identifier.
    pub id: HistoryEntryId,
    /// Owning task.
    pub task_id: TaskId,
    /// Acting user.
    pub changed_by: UserId,
    /// Kind of change.
    pub change_type: ChangeType,
    /// Value before the change.
    pub old_value: Option<String>,
    /// Value after the change.
    pub new_value: Option<String>,
    /// When the change happened.
    pub change_date: DateTime<Utc>,
}

impl TaskHistoryEntry {
    pub(super) fn creation(
        task_id: TaskId,
        initial: TaskStatus,
        changed_by: UserId,
        at: DateTime<Utc>,
    ) -> Self {
        Self::record(
            task_id,
            changed_by,
            ChangeType::Creation,
            None,
            Some(initial.as_str().to_owned()),
            at,
        )
    }

    pub(super) fn status_change(
        task_id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
        changed_by: UserId,
        at: DateTime<Utc>,
    ) -> Self {
        Self::record(
            task_id,
            changed_by,
            ChangeType::StatusChange,
            Some(from.as_str().to_owned()),
            Some(to.as_str().to_owned()),
            at,
        )
    }

    pub(super) fn assignment_change(
        task_id: TaskId,
        from: Option<UserId>,
        to: Option<UserId>,
        changed_by: UserId,
        at: DateTime<Utc>,
    ) -> Self {
        Self::record(
            task_id,
            changed_by,
            ChangeType::AssignmentChange,
            from.map(|id| id.to_string()),
            to.map(|id| id.to_string()),
            at,
        )
    }

    fn record(
        task_id: TaskId,
        changed_by: UserId,
        change_type: ChangeType,
        old_value: Option<String>,
        new_value: Option<String>,
        change_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: HistoryEntryId::new(),
            task_id,
            changed_by,
            change_type,
            old_value,
            new_value,
            change_date,
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHistoryData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            changed_by: data.changed_by,
            change_type: data.change_type,
            old_value: data.old_value,
            new_value: data.new_value,
            change_date: data.change_date,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryEntryId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn changed_by(&self) -> UserId {
        self.changed_by
    }

    /// Returns the kind of change.
    #[must_use]
    pub const fn change_type(&self) -> ChangeType {
        self.change_type
    }

    /// Returns the value before the change.
    #[must_use]
    pub fn old_value(&self) -> Option<&str> {
        self.old_value.as_deref()
    }

    /// Returns the value after the change.
    #[must_use]
    pub fn new_value(&self) -> Option<&str> {
        self.new_value.as_deref()
    }

    /// Returns when the change happened.
    #[must_use]
    pub const fn change_date(&self) -> DateTime<Utc> {
        self.change_date
    }
}
