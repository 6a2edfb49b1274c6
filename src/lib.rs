//! Tasktrack: a Kanban task tracker backend.
//!
//! Tasks move between three status columns under a fixed transition table,
//! and every creation, status change, and reassignment is recorded in an
//! append-only history. The crate exposes the domain, its persistence
//! adapters, and an axum REST surface.
//!
//! # Architecture
//!
//! Tasktrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: `PostgreSQL` (Diesel) and in-memory implementations of ports
//! - **Services**: Orchestration over ports, consumed by the HTTP layer
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, status transitions, and audit history
//! - [`user`]: User registration and lookup
//! - [`api`]: REST routes, DTOs, and error mapping
//! - [`storage`]: Shared Diesel schema, connection pool, and migrations
//! - [`config`], [`telemetry`], [`server`]: Process wiring for the binary

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod storage;
pub mod task;
pub mod telemetry;
pub mod user;
