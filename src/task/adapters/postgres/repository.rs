//! `PostgreSQL` repository implementation for tasks and their history.

use super::models::{HistoryRow, NewHistoryRow, NewTaskRow, TaskChangeset, TaskRow};
use crate::storage::{
    PgPool, get_conn_with, run_blocking_with,
    schema::{task_history, tasks},
};
use crate::task::{
    domain::{
        ChangeType, HistoryEntryId, PersistedHistoryData, PersistedTaskData, Task,
        TaskDescription, TaskHistoryEntry, TaskId, TaskStatus, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
///
/// Each write runs in a single transaction covering the task row and the
/// history row.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, TaskRepositoryError::persistence)?;
                f(&mut connection)
            },
            TaskRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task, entry: &TaskHistoryEntry) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_task = to_new_task_row(task);
        let new_entry = to_new_history_row(entry);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                diesel::insert_into(tasks::table)
                    .values(&new_task)
                    .execute(tx)
                    .map_err(|err| map_write_error(err, task_id))?;
                insert_history(tx, &new_entry, task_id)
            })
        })
        .await
    }

    async fn update(&self, task: &Task, entry: &TaskHistoryEntry) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = TaskChangeset {
            status: task.status().as_str().to_owned(),
            assigned_to_user_id: task.assigned_to().map(UserId::into_inner),
            updated_at: task.updated_at(),
        };
        let new_entry = to_new_history_row(entry);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let updated = diesel::update(tasks::table.find(task_id.into_inner()))
                    .set(&changeset)
                    .execute(tx)
                    .map_err(|err| map_write_error(err, task_id))?;
                if updated == 0 {
                    return Err(TaskRepositoryError::NotFound(task_id));
                }
                insert_history(tx, &new_entry, task_id)
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn history(&self, id: TaskId) -> TaskRepositoryResult<Vec<TaskHistoryEntry>> {
        self.run_blocking(move |connection| {
            let rows = task_history::table
                .filter(task_history::task_id.eq(id.into_inner()))
                .order((
                    task_history::change_date.desc(),
                    task_history::entry_seq.desc(),
                ))
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)?;
            rows.into_iter().map(row_to_history).collect()
        })
        .await
    }
}

fn insert_history(
    connection: &mut PgConnection,
    new_entry: &NewHistoryRow,
    task_id: TaskId,
) -> TaskRepositoryResult<()> {
    diesel::insert_into(task_history::table)
        .values(new_entry)
        .execute(connection)
        .map_err(|err| map_write_error(err, task_id))?;
    Ok(())
}

/// Maps constraint violations to semantic repository errors.
fn map_write_error(err: DieselError, task_id: TaskId) -> TaskRepositoryError {
    match &err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info.constraint_name() == Some("tasks_pkey") =>
        {
            TaskRepositoryError::DuplicateTask(task_id)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            TaskRepositoryError::DanglingReference(
                info.constraint_name()
                    .map_or_else(|| info.message().to_owned(), ToOwned::to_owned),
            )
        }
        _ => TaskRepositoryError::persistence(err),
    }
}

fn to_new_task_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(|d| d.as_str().to_owned()),
        status: task.status().as_str().to_owned(),
        assigned_to_user_id: task.assigned_to().map(UserId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_new_history_row(entry: &TaskHistoryEntry) -> NewHistoryRow {
    NewHistoryRow {
        id: entry.id().into_inner(),
        task_id: entry.task_id().into_inner(),
        changed_by_user_id: entry.changed_by().into_inner(),
        change_type: entry.change_type().as_str().to_owned(),
        old_value: entry.old_value().map(ToOwned::to_owned),
        new_value: entry.new_value().map(ToOwned::to_owned),
        change_date: entry.change_date(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title: raw_title,
        description: raw_description,
        status: raw_status,
        assigned_to_user_id,
        created_at,
        updated_at,
    } = row;

    let title = TaskTitle::new(raw_title).map_err(TaskRepositoryError::invalid_persisted_data)?;
    let description = raw_description
        .map(TaskDescription::new)
        .transpose()
        .map_err(TaskRepositoryError::invalid_persisted_data)?
        .flatten();
    let status = TaskStatus::try_from(raw_status.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        status,
        assigned_to: assigned_to_user_id.map(UserId::from_uuid),
        created_at,
        updated_at,
    }))
}

fn row_to_history(row: HistoryRow) -> TaskRepositoryResult<TaskHistoryEntry> {
    let change_type = ChangeType::try_from(row.change_type.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;

    Ok(TaskHistoryEntry::from_persisted(PersistedHistoryData {
        id: HistoryEntryId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        changed_by: UserId::from_uuid(row.changed_by_user_id),
        change_type,
        old_value: row.old_value,
        new_value: row.new_value,
        change_date: row.change_date,
    }))
}
