//! Shared handler state.

use crate::task::{ports::TaskRepository, services::TaskLifecycleService};
use crate::user::{ports::UserRepository, services::UserDirectoryService};
use mockable::Clock;
use std::sync::Arc;

/// Services shared by every request handler.
pub struct AppState<R, U, C>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Task creation, transitions, assignment, and queries.
    pub lifecycle: TaskLifecycleService<R, U, C>,
    /// User registration and lookup.
    pub directory: UserDirectoryService<U>,
}

impl<R, U, C> AppState<R, U, C>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Wires both services over the given repositories and clock.
    #[must_use]
    pub fn new(tasks: Arc<R>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            lifecycle: TaskLifecycleService::new(tasks, Arc::clone(&users), clock),
            directory: UserDirectoryService::new(users),
        }
    }
}

impl<R, U, C> Clone for AppState<R, U, C>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            lifecycle: self.lifecycle.clone(),
            directory: self.directory.clone(),
        }
    }
}
