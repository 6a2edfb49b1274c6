//! User aggregate.

use super::{UserId, UserName};
use serde::{Deserialize, Serialize};

/// A registered user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    user_name: UserName,
}

impl User {
    /// Registers a new user with a fresh identifier.
    #[must_use]
    pub fn register(user_name: UserName) -> Self {
        Self {
            id: UserId::new(),
            user_name,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: UserId, user_name: UserName) -> Self {
        Self { id, user_name }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn user_name(&self) -> &UserName {
        &self.user_name
    }
}
