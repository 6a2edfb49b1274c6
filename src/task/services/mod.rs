//! Application services for task lifecycle orchestration.

mod lifecycle;
mod views;

pub use lifecycle::{
    AssignTaskRequest, CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService, UpdateTaskStatusRequest,
};
pub use views::{HistoryView, TaskView, TaskWithHistory};
