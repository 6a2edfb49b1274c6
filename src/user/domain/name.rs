//! Validated user name type.

use super::UserDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a user name, matching the `VARCHAR(100)` column.
const MAX_USER_NAME_LENGTH: usize = 100;

/// Trimmed, non-empty display name of a user.
///
/// Names are compared exactly; `"Jane"` and `"jane"` are distinct users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Creates a validated user name.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyUserName`] when the value is blank, or
    /// [`UserDomainError::UserNameTooLong`] when it exceeds 100 characters
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(UserDomainError::EmptyUserName);
        }

        let length = trimmed.chars().count();
        if length > MAX_USER_NAME_LENGTH {
            return Err(UserDomainError::UserNameTooLong(length));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the user name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
