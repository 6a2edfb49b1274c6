//! `PostgreSQL` adapters for task lifecycle persistence.

mod models;
mod repository;

pub use repository::PostgresTaskRepository;
