//! User route handlers.

use super::{
    ApiError, AppState,
    dto::{CreateUserBody, UserResponse},
};
use crate::task::ports::TaskRepository;
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

/// `GET /api/users`
pub async fn list<R, U, C>(
    State(state): State<AppState<R, U, C>>,
) -> Result<Json<Vec<UserResponse>>, ApiError>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    let users = state.directory.list().await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// `GET /api/users/:id`
pub async fn get<R, U, C>(
    State(state): State<AppState<R, U, C>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<UserResponse>, ApiError>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    let Path(id) = path?;
    let user = state
        .directory
        .find(UserId::from_uuid(id))
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(UserResponse::from(&user)))
}

/// `POST /api/users`
pub async fn create<R, U, C>(
    State(state): State<AppState<R, U, C>>,
    body: Result<Json<CreateUserBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    let Json(body) = body?;
    let user = state.directory.register(body.user_name).await?;
    let created = UserResponse::from(&user);
    let location = format!("/api/users/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}
