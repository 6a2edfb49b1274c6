//! Service layer for task creation, status transitions, and assignment.

use super::views::{HistoryView, TaskView, TaskWithHistory};
use crate::error::ErrorKind;
use crate::task::{
    domain::{Task, TaskDescription, TaskDomainError, TaskDraft, TaskId, TaskStatus, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::user::{
    domain::{User, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    assigned_to: Option<UserId>,
    created_by: UserId,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, created_by: UserId) -> Self {
        Self {
            title: title.into(),
            description: None,
            assigned_to: None,
            created_by,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }
}

/// Request payload for moving a task to another status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateTaskStatusRequest {
    task_id: TaskId,
    new_status: TaskStatus,
    changed_by: UserId,
}

impl UpdateTaskStatusRequest {
    /// Creates a status change request.
    #[must_use]
    pub const fn new(task_id: TaskId, new_status: TaskStatus, changed_by: UserId) -> Self {
        Self {
            task_id,
            new_status,
            changed_by,
        }
    }
}

/// Request payload for changing a task's assignee.
///
/// Without [`AssignTaskRequest::with_assignee`] the request unassigns the
/// task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignTaskRequest {
    task_id: TaskId,
    assignee: Option<UserId>,
    changed_by: UserId,
}

impl AssignTaskRequest {
    /// Creates an unassign request.
    #[must_use]
    pub const fn new(task_id: TaskId, changed_by: UserId) -> Self {
        Self {
            task_id,
            assignee: None,
            changed_by,
        }
    }

    /// Sets the new assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets or clears the new assignee.
    #[must_use]
    pub const fn with_optional_assignee(mut self, assignee: Option<UserId>) -> Self {
        self.assignee = assignee;
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// User lookup failed.
    #[error(transparent)]
    UserLookup(#[from] UserRepositoryError),
    /// The requested assignee does not exist.
    #[error("assigned user not found")]
    AssignedUserNotFound(UserId),
    /// The creating user does not exist.
    #[error("creator not found")]
    CreatorNotFound(UserId),
    /// The user making the change does not exist.
    #[error("user not found")]
    ChangerNotFound(UserId),
}

impl TaskLifecycleError {
    /// Classifies the error for callers at the edge.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(TaskDomainError::InvalidStatusTransition { .. }) => {
                ErrorKind::InvalidOperation
            }
            Self::Domain(_)
            | Self::Repository(TaskRepositoryError::DanglingReference(_))
            | Self::AssignedUserNotFound(_)
            | Self::CreatorNotFound(_)
            | Self::ChangerNotFound(_) => ErrorKind::Validation,
            Self::Repository(_) | Self::UserLookup(_) => ErrorKind::Infrastructure,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// The only component that mutates task status or assignee. Every mutation
/// hands the task and its history entry to a single repository call.
pub struct TaskLifecycleService<R, U, C>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<R, U, C> Clone for TaskLifecycleService<R, U, C>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            users: Arc::clone(&self.users),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, U, C> TaskLifecycleService<R, U, C>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(tasks: Arc<R>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            users,
            clock,
        }
    }

    /// Creates a task in [`TaskStatus::ToDo`] and records its creation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for an invalid title or
    /// description, [`TaskLifecycleError::AssignedUserNotFound`] or
    /// [`TaskLifecycleError::CreatorNotFound`] for unknown users, and
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<TaskView> {
        let title = TaskTitle::new(request.title)?;
        let description = request
            .description
            .map(TaskDescription::new)
            .transpose()?
            .flatten();

        let assignee = match request.assigned_to {
            Some(id) => Some(
                self.users
                    .find_by_id(id)
                    .await?
                    .ok_or(TaskLifecycleError::AssignedUserNotFound(id))?,
            ),
            None => None,
        };
        self.require_user(request.created_by, TaskLifecycleError::CreatorNotFound)
            .await?;

        let draft = TaskDraft {
            title,
            description,
            assigned_to: request.assigned_to,
        };
        let (task, entry) = Task::create(draft, request.created_by, &*self.clock);
        self.tasks.store(&task, &entry).await?;

        info!(
            task_id = %task.id(),
            created_by = %request.created_by,
            "task created"
        );
        Ok(TaskView { task, assignee })
    }

    /// Moves a task to a new status and records the transition.
    ///
    /// Returns `Ok(None)` when the task does not exist. The transition is
    /// checked before the acting user is resolved.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the transition is not
    /// permitted, [`TaskLifecycleError::ChangerNotFound`] for an unknown
    /// user, and [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn update_status(
        &self,
        request: UpdateTaskStatusRequest,
    ) -> TaskLifecycleResult<Option<TaskView>> {
        let Some(mut task) = self.tasks.find_by_id(request.task_id).await? else {
            debug!(task_id = %request.task_id, "status update for unknown task");
            return Ok(None);
        };

        let from = task.status();
        let entry = task.transition_to(request.new_status, request.changed_by, &*self.clock)?;
        self.require_user(request.changed_by, TaskLifecycleError::ChangerNotFound)
            .await?;
        let assignee = self.find_assignee(&task).await?;
        self.tasks.update(&task, &entry).await?;

        info!(
            task_id = %task.id(),
            from = %from,
            to = %task.status(),
            changed_by = %request.changed_by,
            "task status changed"
        );
        Ok(Some(TaskView { task, assignee }))
    }

    /// Replaces the assignee of a task and records the change.
    ///
    /// Returns `Ok(None)` when the task does not exist. Unassigning is always
    /// permitted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::AssignedUserNotFound`] or
    /// [`TaskLifecycleError::ChangerNotFound`] for unknown users and
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn assign_task(
        &self,
        request: AssignTaskRequest,
    ) -> TaskLifecycleResult<Option<TaskView>> {
        let Some(mut task) = self.tasks.find_by_id(request.task_id).await? else {
            debug!(task_id = %request.task_id, "assignment for unknown task");
            return Ok(None);
        };

        let assignee = match request.assignee {
            Some(id) => Some(
                self.users
                    .find_by_id(id)
                    .await?
                    .ok_or(TaskLifecycleError::AssignedUserNotFound(id))?,
            ),
            None => None,
        };
        self.require_user(request.changed_by, TaskLifecycleError::ChangerNotFound)
            .await?;

        let entry = task.assign(request.assignee, request.changed_by, &*self.clock);
        self.tasks.update(&task, &entry).await?;

        info!(
            task_id = %task.id(),
            assignee = ?request.assignee,
            changed_by = %request.changed_by,
            "task assignment changed"
        );
        Ok(Some(TaskView { task, assignee }))
    }

    /// Lists all tasks, oldest first, with assignees resolved.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when a repository lookup fails.
    pub async fn list_tasks(&self) -> TaskLifecycleResult<Vec<TaskView>> {
        let tasks = self.tasks.list().await?;
        let users = self
            .resolve_users(tasks.iter().filter_map(Task::assigned_to).collect())
            .await?;

        Ok(tasks
            .into_iter()
            .map(|task| {
                let assignee = task.assigned_to().and_then(|id| users.get(&id).cloned());
                TaskView { task, assignee }
            })
            .collect())
    }

    /// Retrieves a task with its history, most recent entry first.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when a repository lookup fails.
    pub async fn get_task_with_history(
        &self,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Option<TaskWithHistory>> {
        let Some(task) = self.tasks.find_by_id(task_id).await? else {
            return Ok(None);
        };
        let entries = self.tasks.history(task_id).await?;

        let mut ids: BTreeSet<UserId> = entries.iter().map(|entry| entry.changed_by()).collect();
        ids.extend(task.assigned_to());
        let users = self.resolve_users(ids).await?;

        let assignee = task.assigned_to().and_then(|id| users.get(&id).cloned());
        let history = entries
            .into_iter()
            .map(|entry| {
                let changed_by = users.get(&entry.changed_by()).cloned();
                HistoryView { entry, changed_by }
            })
            .collect();

        Ok(Some(TaskWithHistory {
            task: TaskView { task, assignee },
            history,
        }))
    }

    async fn require_user(
        &self,
        id: UserId,
        missing: fn(UserId) -> TaskLifecycleError,
    ) -> TaskLifecycleResult<User> {
        self.users.find_by_id(id).await?.ok_or_else(|| missing(id))
    }

    async fn find_assignee(&self, task: &Task) -> TaskLifecycleResult<Option<User>> {
        match task.assigned_to() {
            Some(id) => Ok(self.users.find_by_id(id).await?),
            None => Ok(None),
        }
    }

    async fn resolve_users(
        &self,
        ids: BTreeSet<UserId>,
    ) -> TaskLifecycleResult<HashMap<UserId, User>> {
        let mut resolved = HashMap::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = self.users.find_by_id(id).await? {
                resolved.insert(id, user);
            }
        }
        Ok(resolved)
    }
}
