//! Application services for user registration and lookup.

mod directory;

pub use directory::{
    DEFAULT_USER_NAMES, UserDirectoryError, UserDirectoryResult, UserDirectoryService,
};
