//! Shared fixtures for in-memory integration tests.

use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use tasktrack::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{
        ChangeType, HistoryEntryId, PersistedHistoryData, PersistedTaskData, Task,
        TaskHistoryEntry, TaskId, TaskStatus, TaskTitle,
    },
    services::TaskLifecycleService,
};
use tasktrack::user::{
    adapters::memory::InMemoryUserRepository, domain::UserId, services::UserDirectoryService,
};

/// Lifecycle service over in-memory repositories.
pub type MemoryLifecycle =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryUserRepository, DefaultClock>;

/// Services sharing one pair of in-memory repositories.
pub struct MemoryStack {
    pub lifecycle: MemoryLifecycle,
    pub directory: UserDirectoryService<InMemoryUserRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
}

/// Provides a fresh in-memory repository for each test.
#[fixture]
pub fn repo() -> InMemoryTaskRepository {
    InMemoryTaskRepository::new()
}

/// Provides both services over fresh repositories.
#[fixture]
pub fn stack() -> MemoryStack {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    MemoryStack {
        lifecycle: TaskLifecycleService::new(
            Arc::clone(&tasks),
            Arc::clone(&users),
            Arc::new(DefaultClock),
        ),
        directory: UserDirectoryService::new(users),
        tasks,
    }
}

/// Builds a `ToDo` task with fixed timestamps.
pub fn task_at(title: &str, at: DateTime<Utc>) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        title: TaskTitle::new(title).expect("valid title"),
        description: None,
        status: TaskStatus::ToDo,
        assigned_to: None,
        created_at: at,
        updated_at: at,
    })
}

/// Builds a history entry for `task` with a fixed change date.
pub fn entry_at(
    task: &Task,
    change_type: ChangeType,
    new_value: &str,
    at: DateTime<Utc>,
) -> TaskHistoryEntry {
    TaskHistoryEntry::from_persisted(PersistedHistoryData {
        id: HistoryEntryId::new(),
        task_id: task.id(),
        changed_by: UserId::new(),
        change_type,
        old_value: None,
        new_value: Some(new_value.to_owned()),
        change_date: at,
    })
}
