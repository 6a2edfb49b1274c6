//! JSON request and response bodies.
//!
//! Field names are camelCase on the wire. Status and change-type values use
//! the same tokens as the store (`"ToDo"`, `"StatusChange"`, ...). Incoming
//! statuses may also be given as column indices `0`, `1`, or `2`.

use crate::task::{
    domain::{ChangeType, TaskStatus},
    services::{HistoryView, TaskView, TaskWithHistory},
};
use crate::user::domain::{User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskBody {
    /// Task title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional initial assignee.
    #[serde(default)]
    pub assigned_to_user_id: Option<Uuid>,
    /// User creating the task.
    pub created_by_user_id: Uuid,
}

/// Body of `PUT /api/tasks/:id/status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusBody {
    /// Target status, as a token or a column index.
    #[serde(deserialize_with = "status_token_or_ordinal")]
    pub new_status: TaskStatus,
    /// User making the change.
    pub changed_by_user_id: Uuid,
}

/// Body of `PUT /api/tasks/:id/assign`.
///
/// `assignedToUserId` must be present. An explicit `null` unassigns the
/// task; leaving the field out is rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignBody {
    /// Outer `None`: field missing. Inner `None`: explicit `null`.
    #[serde(default, deserialize_with = "present")]
    pub assigned_to_user_id: Option<Option<Uuid>>,
    /// User making the change.
    pub changed_by_user_id: Uuid,
}

/// Body of `POST /api/users`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    /// Display name.
    pub user_name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatusInput {
    Token(TaskStatus),
    Ordinal(u64),
}

fn status_token_or_ordinal<'de, D>(deserializer: D) -> Result<TaskStatus, D::Error>
where
    D: Deserializer<'de>,
{
    match StatusInput::deserialize(deserializer)? {
        StatusInput::Token(status) => Ok(status),
        StatusInput::Ordinal(ordinal) => TaskStatus::from_ordinal(ordinal).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown task status: {ordinal}"))
        }),
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// User summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User identifier.
    pub id: Uuid,
    /// Display name.
    pub user_name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().into_inner(),
            user_name: user.user_name().as_str().to_owned(),
        }
    }
}

/// Task as rendered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    /// Task identifier.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Description, if any.
    pub description: Option<String>,
    /// Current status token.
    pub status: TaskStatus,
    /// Assignee identifier, if any.
    pub assigned_to_user_id: Option<Uuid>,
    /// Resolved assignee, if any.
    pub assigned_to: Option<UserResponse>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<TaskView> for TaskResponse {
    fn from(view: TaskView) -> Self {
        let TaskView { task, assignee } = view;
        Self {
            id: task.id().into_inner(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(|d| d.as_str().to_owned()),
            status: task.status(),
            assigned_to_user_id: task.assigned_to().map(UserId::into_inner),
            assigned_to: assignee.as_ref().map(UserResponse::from),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// History entry as rendered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskHistoryResponse {
    /// Entry identifier.
    pub id: Uuid,
    /// Owning task.
    pub task_id: Uuid,
    /// Acting user identifier.
    pub changed_by_user_id: Uuid,
    /// Resolved acting user.
    pub changed_by: Option<UserResponse>,
    /// Change type token.
    pub change_type: ChangeType,
    /// Value before the change.
    pub old_value: Option<String>,
    /// Value after the change.
    pub new_value: Option<String>,
    /// When the change happened.
    pub change_date: DateTime<Utc>,
}

impl From<HistoryView> for TaskHistoryResponse {
    fn from(view: HistoryView) -> Self {
        let HistoryView { entry, changed_by } = view;
        Self {
            id: entry.id().into_inner(),
            task_id: entry.task_id().into_inner(),
            changed_by_user_id: entry.changed_by().into_inner(),
            changed_by: changed_by.as_ref().map(UserResponse::from),
            change_type: entry.change_type(),
            old_value: entry.old_value().map(ToOwned::to_owned),
            new_value: entry.new_value().map(ToOwned::to_owned),
            change_date: entry.change_date(),
        }
    }
}

/// Body of `GET /api/tasks/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetailResponse {
    /// The task.
    pub task: TaskResponse,
    /// Its history, most recent first.
    pub history: Vec<TaskHistoryResponse>,
}

impl From<TaskWithHistory> for TaskDetailResponse {
    fn from(detail: TaskWithHistory) -> Self {
        Self {
            task: detail.task.into(),
            history: detail.history.into_iter().map(Into::into).collect(),
        }
    }
}
