//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("title is required")]
    EmptyTitle,

    /// The task title exceeds the storage limit.
    #[error("title exceeds 200 character limit ({0} characters)")]
    TitleTooLong(usize),

    /// The task description exceeds the storage limit.
    #[error("description exceeds 1000 character limit ({0} characters)")]
    DescriptionTooLong(usize),

    /// The requested status transition is not permitted by the lifecycle
    /// state machine.
    #[error("invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// Task whose status change was rejected.
        task_id: TaskId,
        /// Status before the attempted transition.
        from: TaskStatus,
        /// Requested target status.
        to: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence or requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing history change types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown change type: {0}")]
pub struct ParseChangeTypeError(pub String);
