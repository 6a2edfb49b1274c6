//! Cross-layer error classification.
//!
//! Service errors are layered per aggregate, but callers at the edge only
//! care which family a failure belongs to. Each service error exposes a
//! `kind()` returning one of these.

/// Broad failure category shared by every service error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller supplied invalid input or referenced a missing record.
    Validation,
    /// The request is well formed but not permitted in the current state.
    InvalidOperation,
    /// The store or another dependency failed.
    Infrastructure,
}
