//! `PostgreSQL` user repository tests.

use super::helpers::{stored_user, test_pool, unique_name};
use tasktrack::user::{
    adapters::postgres::PostgresUserRepository,
    domain::{User, UserName},
    ports::{UserRepository, UserRepositoryError},
};

#[tokio::test(flavor = "multi_thread")]
async fn stored_user_is_found_by_id_and_name() -> Result<(), eyre::Report> {
    let Some(pool) = test_pool()? else {
        return Ok(());
    };
    let users = PostgresUserRepository::new(pool);

    let user = stored_user(&users, "Ada").await?;

    assert_eq!(users.find_by_id(user.id()).await?, Some(user.clone()));
    assert_eq!(users.find_by_name(user.user_name()).await?, Some(user));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_name_is_reported() -> Result<(), eyre::Report> {
    let Some(pool) = test_pool()? else {
        return Ok(());
    };
    let users = PostgresUserRepository::new(pool);
    let existing = stored_user(&users, "Grace").await?;

    let clash = User::register(existing.user_name().clone());
    let result = users.store(&clash).await;

    assert!(matches!(
        result,
        Err(UserRepositoryError::DuplicateUserName(ref name)) if name == existing.user_name()
    ));
    assert_eq!(users.find_by_id(clash.id()).await?, None);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_id_is_reported() -> Result<(), eyre::Report> {
    let Some(pool) = test_pool()? else {
        return Ok(());
    };
    let users = PostgresUserRepository::new(pool);
    let existing = stored_user(&users, "Linus").await?;

    let clash = User::from_persisted(existing.id(), UserName::new(unique_name("Other"))?);
    let result = users.store(&clash).await;

    assert!(matches!(
        result,
        Err(UserRepositoryError::DuplicateUser(id)) if id == existing.id()
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn list_is_ordered_by_name() -> Result<(), eyre::Report> {
    let Some(pool) = test_pool()? else {
        return Ok(());
    };
    let users = PostgresUserRepository::new(pool);
    let zed = stored_user(&users, "zz-order").await?;
    let amy = stored_user(&users, "aa-order").await?;

    let listed: Vec<User> = users
        .list()
        .await?
        .into_iter()
        .filter(|user| user.id() == zed.id() || user.id() == amy.id())
        .collect();

    assert_eq!(listed, vec![amy, zed]);
    Ok(())
}
