//! Read models returned by the lifecycle service.
//!
//! Tasks and history entries only hold user identifiers; these views pair
//! them with the resolved [`User`] so callers do not need a second lookup.

use crate::task::domain::{Task, TaskHistoryEntry};
use crate::user::domain::User;

/// A task with its assignee resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    /// The task itself.
    pub task: Task,
    /// The assigned user, when the task is assigned and the user exists.
    pub assignee: Option<User>,
}

/// A history entry with the acting user resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    /// The audit entry.
    pub entry: TaskHistoryEntry,
    /// The user who made the change.
    pub changed_by: Option<User>,
}

/// A task together with its full history, most recent entry first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskWithHistory {
    /// The task and its assignee.
    pub task: TaskView,
    /// Audit entries ordered by change date, descending.
    pub history: Vec<HistoryView>,
}
