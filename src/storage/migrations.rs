//! Embedded schema migrations.
//!
//! Migration SQL lives under `migrations/` in Diesel's directory layout and
//! is compiled into the binary. Applied versions are recorded in
//! `schema_migrations` so each migration runs once.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use thiserror::Error;

/// A single embedded migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    /// Version key recorded in `schema_migrations`.
    pub version: &'static str,
    /// Forward SQL.
    pub up: &'static str,
}

/// All migrations in application order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "2026-01-10-000000_create_users",
        up: include_str!("../../migrations/2026-01-10-000000_create_users/up.sql"),
    },
    Migration {
        version: "2026-01-10-000001_create_tasks_and_history",
        up: include_str!("../../migrations/2026-01-10-000001_create_tasks_and_history/up.sql"),
    },
];

const CREATE_VERSION_TABLE_SQL: &str = concat!(
    "CREATE TABLE IF NOT EXISTS schema_migrations (",
    "version VARCHAR(50) PRIMARY KEY, ",
    "run_on TIMESTAMPTZ NOT NULL DEFAULT NOW())",
);

/// Error raised while applying migrations.
#[derive(Debug, Error)]
#[error("migration {version} failed: {source}")]
pub struct MigrationError {
    /// Version that failed, or `schema_migrations` for bookkeeping failures.
    pub version: &'static str,
    /// Underlying Diesel error.
    #[source]
    pub source: diesel::result::Error,
}

#[derive(QueryableByName)]
struct AppliedVersion {
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    version: String,
}

/// Applies every pending migration, each in its own transaction.
///
/// Returns the versions that were applied by this call.
///
/// # Errors
///
/// Returns [`MigrationError`] naming the first migration that failed. Earlier
/// migrations in the same call stay applied.
pub fn apply_migrations(conn: &mut PgConnection) -> Result<Vec<&'static str>, MigrationError> {
    let bookkeeping = |source| MigrationError {
        version: "schema_migrations",
        source,
    };

    conn.batch_execute(CREATE_VERSION_TABLE_SQL)
        .map_err(bookkeeping)?;
    let applied: Vec<String> = diesel::sql_query("SELECT version FROM schema_migrations")
        .load::<AppliedVersion>(conn)
        .map_err(bookkeeping)?
        .into_iter()
        .map(|row| row.version)
        .collect();

    let mut newly_applied = Vec::new();
    for migration in MIGRATIONS {
        if applied.iter().any(|version| version == migration.version) {
            continue;
        }

        conn.transaction::<_, diesel::result::Error, _>(|tx| {
            tx.batch_execute(migration.up)?;
            diesel::sql_query("INSERT INTO schema_migrations (version) VALUES ($1)")
                .bind::<diesel::sql_types::Varchar, _>(migration.version)
                .execute(tx)?;
            Ok(())
        })
        .map_err(|source| MigrationError {
            version: migration.version,
            source,
        })?;
        tracing::info!(version = migration.version, "applied schema migration");
        newly_applied.push(migration.version);
    }

    Ok(newly_applied)
}
