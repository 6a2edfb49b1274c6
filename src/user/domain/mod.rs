//! Domain model for users.

mod error;
mod ids;
mod name;
mod user;

pub use error::UserDomainError;
pub use ids::UserId;
pub use name::UserName;
pub use user::User;
