//! Shared world state for task status transition scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use tasktrack::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::TaskId,
    services::{TaskLifecycleError, TaskLifecycleService, TaskView},
};
use tasktrack::user::{
    adapters::memory::InMemoryUserRepository, domain::UserId, services::UserDirectoryService,
};

/// Service type used by the scenario world.
pub type TestLifecycle =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryUserRepository, DefaultClock>;

/// Scenario world for status transition behaviour tests.
pub struct StatusWorld {
    pub lifecycle: TestLifecycle,
    pub directory: UserDirectoryService<InMemoryUserRepository>,
    pub users: HashMap<String, UserId>,
    pub task_id: Option<TaskId>,
    pub last_move: Option<Result<Option<TaskView>, TaskLifecycleError>>,
}

impl StatusWorld {
    /// Creates a world over empty repositories.
    #[must_use]
    pub fn new() -> Self {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());

        Self {
            lifecycle: TaskLifecycleService::new(tasks, Arc::clone(&users), Arc::new(DefaultClock)),
            directory: UserDirectoryService::new(users),
            users: HashMap::new(),
            task_id: None,
            last_move: None,
        }
    }

    /// Returns the task created in the background.
    pub fn task_id(&self) -> Result<TaskId, eyre::Report> {
        self.task_id
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the id registered for `name`, or a fresh id for unknown names.
    #[must_use]
    pub fn user_id(&self, name: &str) -> UserId {
        self.users.get(name).copied().unwrap_or_else(UserId::new)
    }
}

impl Default for StatusWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> StatusWorld {
    StatusWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
