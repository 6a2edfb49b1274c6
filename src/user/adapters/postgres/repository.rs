//! `PostgreSQL` repository implementation for users.

use super::models::{NewUserRow, UserRow};
use crate::storage::{PgPool, get_conn_with, run_blocking_with, schema::users};
use crate::user::{
    domain::{User, UserId, UserName},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

const USER_NAME_UNIQUE_CONSTRAINT: &str = "users_user_name_unique";

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, UserRepositoryError::persistence)?;
                f(&mut connection)
            },
            UserRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let user_id = user.id();
        let user_name = user.user_name().clone();
        let new_row = NewUserRow {
            id: user_id.into_inner(),
            user_name: user_name.as_str().to_owned(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_insert_error(err, user_id, user_name))?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .find(id.into_inner())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_name(&self, name: &UserName) -> UserRepositoryResult<Option<User>> {
        let wanted = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::user_name.eq(wanted))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list(&self) -> UserRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .order(users::user_name.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }
}

fn map_insert_error(err: DieselError, user_id: UserId, user_name: UserName) -> UserRepositoryError {
    match &err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            if info.constraint_name() == Some(USER_NAME_UNIQUE_CONSTRAINT) {
                UserRepositoryError::DuplicateUserName(user_name)
            } else {
                UserRepositoryError::DuplicateUser(user_id)
            }
        }
        _ => UserRepositoryError::persistence(err),
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let user_name =
        UserName::new(row.user_name).map_err(UserRepositoryError::invalid_persisted_data)?;
    Ok(User::from_persisted(UserId::from_uuid(row.id), user_name))
}
