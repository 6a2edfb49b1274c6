//! Domain model for task lifecycle management.
//!
//! The task aggregate owns the status state machine; every mutation it
//! allows yields the history entry that must be persisted with it. No
//! infrastructure concerns cross this boundary.

mod error;
mod history;
mod ids;
mod status;
mod task;

pub use error::{ParseChangeTypeError, ParseTaskStatusError, TaskDomainError};
pub use history::{ChangeType, PersistedHistoryData, TaskHistoryEntry};
pub use ids::{HistoryEntryId, TaskDescription, TaskId, TaskTitle};
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task, TaskDraft};
