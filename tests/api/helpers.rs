//! Router harness for HTTP tests.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::Value;
use std::sync::Arc;
use tasktrack::api::{AppState, cors_layer, router};
use tasktrack::config::DEFAULT_CORS_ORIGINS;
use tasktrack::task::adapters::memory::InMemoryTaskRepository;
use tasktrack::user::adapters::memory::InMemoryUserRepository;
use tower::ServiceExt;
use uuid::Uuid;

/// Decoded response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Router over fresh in-memory repositories.
#[fixture]
pub fn app() -> Router {
    let origins: Vec<String> = DEFAULT_CORS_ORIGINS.iter().map(|&o| o.to_owned()).collect();
    let cors = cors_layer(&origins).expect("default origins are valid");
    let state = AppState::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(DefaultClock),
    );
    router(state, cors)
}

/// Sends a request with an optional JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Result<TestResponse, eyre::Report> {
    send_raw(app, method, uri, body.map(|value| value.to_string())).await
}

/// Sends a request with an optional raw body, labelled as JSON.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    payload: Option<String>,
) -> Result<TestResponse, eyre::Report> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match payload {
        Some(raw) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok(TestResponse {
        status,
        headers,
        body,
    })
}

/// Registers a user through the API and returns its id.
pub async fn register(app: &Router, name: &str) -> Result<Uuid, eyre::Report> {
    let response = send(
        app,
        Method::POST,
        "/api/users",
        Some(serde_json::json!({ "userName": name })),
    )
    .await?;
    eyre::ensure!(
        response.status == StatusCode::CREATED,
        "user registration failed: {}",
        response.body
    );
    id_of(&response.body)
}

/// Creates a task through the API and returns its id.
pub async fn create_task(app: &Router, title: &str, creator: Uuid) -> Result<Uuid, eyre::Report> {
    let response = send(
        app,
        Method::POST,
        "/api/tasks",
        Some(serde_json::json!({ "title": title, "createdByUserId": creator })),
    )
    .await?;
    eyre::ensure!(
        response.status == StatusCode::CREATED,
        "task creation failed: {}",
        response.body
    );
    id_of(&response.body)
}

/// Extracts the `id` field of a response body.
pub fn id_of(body: &Value) -> Result<Uuid, eyre::Report> {
    let raw = body["id"]
        .as_str()
        .ok_or_else(|| eyre::eyre!("response has no id: {body}"))?;
    Ok(raw.parse()?)
}
