//! Process wiring: store selection, migrations, seeding, and serving.

use crate::api::{AppState, cors_layer, router};
use crate::config::Settings;
use crate::storage::{
    MigrationError, apply_migrations, build_pool, get_conn_with, run_blocking_with,
};
use crate::task::{
    adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository},
    ports::TaskRepository,
};
use crate::user::{
    adapters::{memory::InMemoryUserRepository, postgres::PostgresUserRepository},
    ports::UserRepository,
    services::{DEFAULT_USER_NAMES, UserDirectoryError},
};
use axum::http::header::InvalidHeaderValue;
use diesel::r2d2::PoolError;
use mockable::DefaultClock;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Errors that stop the server from starting or keep it from serving.
#[derive(Debug, Error)]
pub enum StartupError {
    /// A CORS origin is not a valid header value.
    #[error("invalid CORS origin: {0}")]
    CorsOrigin(#[from] InvalidHeaderValue),
    /// The database pool could not be created.
    #[error("failed to connect to database: {0}")]
    Pool(#[from] PoolError),
    /// Schema migrations failed.
    #[error(transparent)]
    Migration(#[from] MigrationError),
    /// The blocking migration task panicked or was cancelled.
    #[error("migration task failed: {0}")]
    MigrationTask(#[from] tokio::task::JoinError),
    /// Seeding default users failed.
    #[error("failed to seed default users: {0}")]
    Seed(#[from] UserDirectoryError),
    /// The listen address could not be bound.
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),
    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Opens the configured store and serves HTTP until a shutdown signal.
///
/// # Errors
///
/// Returns [`StartupError`] when any startup step fails or the server stops
/// with an error.
pub async fn run(settings: Settings) -> Result<(), StartupError> {
    let cors = cors_layer(&settings.cors_origins)?;

    match settings.database_url.as_deref() {
        Some(url) => {
            let pool = build_pool(url, settings.pool_size)?;
            let migration_pool = pool.clone();
            let applied = run_blocking_with(
                move || {
                    let mut connection = get_conn_with(&migration_pool, StartupError::Pool)?;
                    Ok(apply_migrations(&mut connection)?)
                },
                StartupError::MigrationTask,
            )
            .await?;
            info!(applied = applied.len(), "database schema up to date");

            serve(
                &settings,
                Arc::new(PostgresTaskRepository::new(pool.clone())),
                Arc::new(PostgresUserRepository::new(pool)),
                cors,
            )
            .await
        }
        None => {
            warn!("no database URL configured; using the in-memory store");
            serve(
                &settings,
                Arc::new(InMemoryTaskRepository::new()),
                Arc::new(InMemoryUserRepository::new()),
                cors,
            )
            .await
        }
    }
}

async fn serve<R, U>(
    settings: &Settings,
    tasks: Arc<R>,
    users: Arc<U>,
    cors: CorsLayer,
) -> Result<(), StartupError>
where
    R: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    let state = AppState::new(tasks, users, Arc::new(DefaultClock));
    if settings.seed_users {
        state.directory.seed_defaults(DEFAULT_USER_NAMES).await?;
    }

    let listener = TcpListener::bind(settings.bind)
        .await
        .map_err(StartupError::Bind)?;
    let local_addr = listener.local_addr().map_err(StartupError::Bind)?;
    info!(addr = %local_addr, "listening");

    axum::serve(listener, router(state, cors))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
