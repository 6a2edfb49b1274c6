//! Shared `PostgreSQL` plumbing for the repository adapters.
//!
//! Holds the Diesel schema for all tables (so joins between users, tasks,
//! and history can be expressed), the r2d2 pool type, helpers for running
//! blocking Diesel calls off the async executor, and the embedded schema
//! migrations applied at startup.

mod migrations;
mod pool;
pub mod schema;

pub use migrations::{MIGRATIONS, Migration, MigrationError, apply_migrations};
pub use pool::{PgPool, PooledConn, build_pool, get_conn_with, run_blocking_with};
