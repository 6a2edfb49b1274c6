//! Task lifecycle management.
//!
//! A task is created in `ToDo` and moves between the three Kanban columns
//! under a fixed transition table. Each creation, status change, and
//! reassignment produces a history entry that is stored atomically with the
//! task update. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
