//! HTTP tests for the user and health routes.

use super::helpers::{app, id_of, register, send};
use axum::{
    Router,
    http::{Method, StatusCode, header},
};
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_reports_ok(app: Router) -> Result<(), eyre::Report> {
    let response = send(&app, Method::GET, "/api/health", None).await?;

    eyre::ensure!(response.status == StatusCode::OK);
    eyre::ensure!(response.body == json!({ "status": "ok" }));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_returns_created_user(app: Router) -> Result<(), eyre::Report> {
    let response = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({ "userName": "  Ada Lovelace " })),
    )
    .await?;

    eyre::ensure!(response.status == StatusCode::CREATED);
    eyre::ensure!(response.body["userName"] == "Ada Lovelace");
    let id = id_of(&response.body)?;
    eyre::ensure!(response.headers.get(header::LOCATION).is_some());

    let fetched = send(&app, Method::GET, &format!("/api/users/{id}"), None).await?;
    eyre::ensure!(fetched.status == StatusCode::OK);
    eyre::ensure!(fetched.body["userName"] == "Ada Lovelace");
    Ok(())
}

#[rstest]
#[case(json!({ "userName": "   " }), "user name must not be empty")]
#[case(json!({ "userName": "x".repeat(101) }), "user name exceeds 100 character limit")]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_user_name_is_bad_request(
    #[case] body: serde_json::Value,
    #[case] message_prefix: &str,
    app: Router,
) -> Result<(), eyre::Report> {
    let response = send(&app, Method::POST, "/api/users", Some(body)).await?;

    eyre::ensure!(response.status == StatusCode::BAD_REQUEST);
    let message = response.body["error"]
        .as_str()
        .ok_or_else(|| eyre::eyre!("missing error message"))?;
    eyre::ensure!(message.starts_with(message_prefix), "unexpected message {message}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_user_name_is_bad_request(app: Router) -> Result<(), eyre::Report> {
    register(&app, "Grace Hopper").await?;

    let response = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({ "userName": "Grace Hopper" })),
    )
    .await?;

    eyre::ensure!(response.status == StatusCode::BAD_REQUEST);
    eyre::ensure!(response.body["error"] == "user name already exists");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn users_are_listed_by_name(app: Router) -> Result<(), eyre::Report> {
    for name in ["John Doe", "Bob Johnson", "Jane Smith"] {
        register(&app, name).await?;
    }

    let response = send(&app, Method::GET, "/api/users", None).await?;

    eyre::ensure!(response.status == StatusCode::OK);
    let names: Vec<&str> = response
        .body
        .as_array()
        .ok_or_else(|| eyre::eyre!("expected an array"))?
        .iter()
        .filter_map(|user| user["userName"].as_str())
        .collect();
    eyre::ensure!(names == vec!["Bob Johnson", "Jane Smith", "John Doe"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_user_is_not_found(app: Router) -> Result<(), eyre::Report> {
    let response = send(
        &app,
        Method::GET,
        &format!("/api/users/{}", Uuid::new_v4()),
        None,
    )
    .await?;

    eyre::ensure!(response.status == StatusCode::NOT_FOUND);
    eyre::ensure!(response.body == json!({ "error": "User not found" }));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cors_preflight_allows_configured_origin(app: Router) -> Result<(), eyre::Report> {
    let request = axum::http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/tasks")
        .header(header::ORIGIN, "http://localhost:8080")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(axum::body::Body::empty())?;

    let response = tower::ServiceExt::oneshot(app, request).await?;

    let allowed = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .ok_or_else(|| eyre::eyre!("missing allow-origin header"))?;
    eyre::ensure!(allowed == "http://localhost:8080");
    Ok(())
}
