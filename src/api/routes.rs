//! Router assembly.

use super::{AppState, tasks, users};
use crate::task::ports::TaskRepository;
use crate::user::ports::UserRepository;
use axum::{
    Json, Router,
    http::{HeaderValue, header::InvalidHeaderValue},
    routing::{get, put},
};
use mockable::Clock;
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builds the CORS layer for the given origins. Any method and any header
/// are allowed.
///
/// # Errors
///
/// Returns [`InvalidHeaderValue`] when an origin is not a valid header value.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
    let allowed = origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Builds the application router.
///
/// Resource paths are served both lowercase and capitalized
/// (`/api/tasks`, `/api/Tasks`), the casing existing clients use.
#[must_use]
pub fn router<R, U, C>(state: AppState<R, U, C>, cors: CorsLayer) -> Router
where
    R: TaskRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/tasks", task_routes())
        .nest("/api/Tasks", task_routes())
        .nest("/api/users", user_routes())
        .nest("/api/Users", user_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn task_routes<R, U, C>() -> Router<AppState<R, U, C>>
where
    R: TaskRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(tasks::list::<R, U, C>).post(tasks::create::<R, U, C>),
        )
        .route("/:id", get(tasks::get::<R, U, C>))
        .route("/:id/status", put(tasks::update_status::<R, U, C>))
        .route("/:id/assign", put(tasks::assign::<R, U, C>))
}

fn user_routes<R, U, C>() -> Router<AppState<R, U, C>>
where
    R: TaskRepository + 'static,
    U: UserRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(users::list::<R, U, C>).post(users::create::<R, U, C>),
        )
        .route("/:id", get(users::get::<R, U, C>))
}

#[expect(clippy::unused_async, reason = "axum handlers are async functions")]
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
