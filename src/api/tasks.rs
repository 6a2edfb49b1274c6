//! Task route handlers.

use super::{
    ApiError, AppState,
    dto::{AssignBody, CreateTaskBody, TaskDetailResponse, TaskResponse, UpdateStatusBody},
};
use crate::task::{
    domain::TaskId,
    ports::TaskRepository,
    services::{AssignTaskRequest, CreateTaskRequest, UpdateTaskStatusRequest},
};
use crate::user::{domain::UserId, ports::UserRepository};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use mockable::Clock;
use uuid::Uuid;

const TASK: &str = "Task";

/// `GET /api/tasks`
pub async fn list<R, U, C>(
    State(state): State<AppState<R, U, C>>,
) -> Result<Json<Vec<TaskResponse>>, ApiError>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    let tasks = state.lifecycle.list_tasks().await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// `GET /api/tasks/:id`
pub async fn get<R, U, C>(
    State(state): State<AppState<R, U, C>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<TaskDetailResponse>, ApiError>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    let Path(id) = path?;
    let detail = state
        .lifecycle
        .get_task_with_history(TaskId::from_uuid(id))
        .await?
        .ok_or(ApiError::NotFound(TASK))?;
    Ok(Json(detail.into()))
}

/// `POST /api/tasks`
pub async fn create<R, U, C>(
    State(state): State<AppState<R, U, C>>,
    body: Result<Json<CreateTaskBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    let Json(body) = body?;
    let mut request =
        CreateTaskRequest::new(body.title, UserId::from_uuid(body.created_by_user_id));
    if let Some(description) = body.description {
        request = request.with_description(description);
    }
    if let Some(assignee) = body.assigned_to_user_id {
        request = request.with_assignee(UserId::from_uuid(assignee));
    }

    let created = TaskResponse::from(state.lifecycle.create_task(request).await?);
    let location = format!("/api/tasks/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// `PUT /api/tasks/:id/status`
pub async fn update_status<R, U, C>(
    State(state): State<AppState<R, U, C>>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateStatusBody>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiError>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    let Path(id) = path?;
    let Json(body) = body?;
    let request = UpdateTaskStatusRequest::new(
        TaskId::from_uuid(id),
        body.new_status,
        UserId::from_uuid(body.changed_by_user_id),
    );
    let updated = state
        .lifecycle
        .update_status(request)
        .await?
        .ok_or(ApiError::NotFound(TASK))?;
    Ok(Json(updated.into()))
}

/// `PUT /api/tasks/:id/assign`
pub async fn assign<R, U, C>(
    State(state): State<AppState<R, U, C>>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<AssignBody>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiError>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    let Path(id) = path?;
    let Json(body) = body?;
    let assignee = body
        .assigned_to_user_id
        .ok_or_else(|| ApiError::BadRequest("assignedToUserId is required".to_owned()))?;

    let request = AssignTaskRequest::new(
        TaskId::from_uuid(id),
        UserId::from_uuid(body.changed_by_user_id),
    )
    .with_optional_assignee(assignee.map(UserId::from_uuid));
    let updated = state
        .lifecycle
        .assign_task(request)
        .await?
        .ok_or(ApiError::NotFound(TASK))?;
    Ok(Json(updated.into()))
}
