//! HTTP surface for the task tracker.
//!
//! A thin axum layer over [`crate::task::services::TaskLifecycleService`] and
//! [`crate::user::services::UserDirectoryService`]. Handlers parse JSON into
//! service requests, map service errors onto status codes, and render
//! camelCase response bodies. All routes live under `/api`.

pub mod dto;
mod error;
mod routes;
mod state;
mod tasks;
mod users;

pub use error::ApiError;
pub use routes::{cors_layer, router};
pub use state::AppState;
