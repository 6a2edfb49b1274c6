//! In-memory repository for tasks and their history.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskHistoryEntry, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// A single lock guards tasks and history, so each write applies the task
/// change and its history entry in one critical section.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    insertion_order: Vec<TaskId>,
    history: HashMap<TaskId, Vec<TaskHistoryEntry>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn ensure_entry_matches(task: &Task, entry: &TaskHistoryEntry) -> TaskRepositoryResult<()> {
    if entry.task_id() == task.id() {
        return Ok(());
    }
    Err(TaskRepositoryError::DanglingReference(format!(
        "history entry {} belongs to task {}, not {}",
        entry.id(),
        entry.task_id(),
        task.id()
    )))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task, entry: &TaskHistoryEntry) -> TaskRepositoryResult<()> {
        ensure_entry_matches(task, entry)?;
        let mut state = self.state.write().map_err(poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        state.tasks.insert(task.id(), task.clone());
        state.insertion_order.push(task.id());
        state.history.entry(task.id()).or_default().push(entry.clone());
        Ok(())
    }

    async fn update(&self, task: &Task, entry: &TaskHistoryEntry) -> TaskRepositoryResult<()> {
        ensure_entry_matches(task, entry)?;
        let mut state = self.state.write().map_err(poisoned)?;
        let Some(stored) = state.tasks.get_mut(&task.id()) else {
            return Err(TaskRepositoryError::NotFound(task.id()));
        };

        *stored = task.clone();
        state.history.entry(task.id()).or_default().push(entry.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut tasks: Vec<Task> = state
            .insertion_order
            .iter()
            .filter_map(|id| state.tasks.get(id).cloned())
            .collect();
        tasks.sort_by_key(Task::created_at);
        Ok(tasks)
    }

    async fn history(&self, id: TaskId) -> TaskRepositoryResult<Vec<TaskHistoryEntry>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut entries: Vec<TaskHistoryEntry> = state
            .history
            .get(&id)
            .map(|entries| entries.iter().rev().cloned().collect())
            .unwrap_or_default();
        entries.sort_by_key(|entry| Reverse(entry.change_date()));
        Ok(entries)
    }
}
