//! User registration and lookup.
//!
//! Users are the actors of the task tracker: they create tasks, move them
//! between status columns, and appear as assignees and in the audit trail.
//! The module follows the same hexagonal layout as [`crate::task`]:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
