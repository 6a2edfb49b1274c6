//! User directory service.

use crate::error::ErrorKind;
use crate::user::{
    domain::{User, UserDomainError, UserId, UserName},
    ports::{UserRepository, UserRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Users seeded on first start so the board has actors to work with.
pub const DEFAULT_USER_NAMES: [&str; 3] = ["John Doe", "Jane Smith", "Bob Johnson"];

/// Service-level errors for user directory operations.
#[derive(Debug, Error)]
pub enum UserDirectoryError {
    /// User name validation failed.
    #[error(transparent)]
    Domain(#[from] UserDomainError),
    /// Another user already has this name.
    #[error("user name already exists")]
    DuplicateUserName(UserName),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(UserRepositoryError),
}

impl From<UserRepositoryError> for UserDirectoryError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::DuplicateUserName(name) => Self::DuplicateUserName(name),
            other => Self::Repository(other),
        }
    }
}

impl UserDirectoryError {
    /// Classifies the error for callers at the edge.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::DuplicateUserName(_) => ErrorKind::Validation,
            Self::Repository(_) => ErrorKind::Infrastructure,
        }
    }
}

/// Result type for user directory operations.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// Registers and looks up users.
pub struct UserDirectoryService<U>
where
    U: UserRepository,
{
    users: Arc<U>,
}

impl<U> Clone for UserDirectoryService<U>
where
    U: UserRepository,
{
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
        }
    }
}

impl<U> UserDirectoryService<U>
where
    U: UserRepository,
{
    /// Creates a new user directory service.
    #[must_use]
    pub const fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Registers a new user under a trimmed, unique name.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Domain`] for a blank or overlong name,
    /// [`UserDirectoryError::DuplicateUserName`] when the name is taken, and
    /// [`UserDirectoryError::Repository`] when persistence fails.
    pub async fn register(&self, raw_name: impl Into<String>) -> UserDirectoryResult<User> {
        let user_name = UserName::new(raw_name)?;
        if self.users.find_by_name(&user_name).await?.is_some() {
            return Err(UserDirectoryError::DuplicateUserName(user_name));
        }

        let user = User::register(user_name);
        self.users.store(&user).await?;
        info!(user_id = %user.id(), user_name = %user.user_name(), "user registered");
        Ok(user)
    }

    /// Lists all users ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Repository`] when the lookup fails.
    pub async fn list(&self) -> UserDirectoryResult<Vec<User>> {
        Ok(self.users.list().await?)
    }

    /// Finds a user by identifier.
    ///
    /// Returns `Ok(None)` when the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Repository`] when the lookup fails.
    pub async fn find(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// Registers each name that is not yet taken and returns the users
    /// created by this call. Running it twice creates nothing the second
    /// time.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError`] when a name is invalid or persistence
    /// fails.
    pub async fn seed_defaults<I, S>(&self, names: I) -> UserDirectoryResult<Vec<User>>
    where
        I: IntoIterator<Item = S> + Send,
        I::IntoIter: Send,
        S: Into<String> + Send,
    {
        let mut created = Vec::new();
        for name in names {
            let user_name = UserName::new(name)?;
            if self.users.find_by_name(&user_name).await?.is_some() {
                debug!(user_name = %user_name, "seed user already present");
                continue;
            }
            let user = User::register(user_name);
            self.users.store(&user).await?;
            created.push(user);
        }

        if !created.is_empty() {
            info!(count = created.len(), "seeded default users");
        }
        Ok(created)
    }
}
