//! In-memory task repository behaviour: ordering, atomic writes, and
//! history tie-breaking.

use super::helpers::{entry_at, repo, task_at};
use chrono::{Duration, Utc};
use rstest::rstest;
use tasktrack::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{ChangeType, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_task_is_retrievable(repo: InMemoryTaskRepository) {
    let now = Utc::now();
    let task = task_at("Retrieve me", now);
    let entry = entry_at(&task, ChangeType::Creation, "ToDo", now);

    repo.store(&task, &entry).await.expect("store should succeed");

    let found = repo.find_by_id(task.id()).await.expect("lookup should succeed");
    assert_eq!(found, Some(task.clone()));
    let history = repo.history(task.id()).await.expect("history should load");
    assert_eq!(history, vec![entry]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_store_is_rejected(repo: InMemoryTaskRepository) {
    let now = Utc::now();
    let task = task_at("Once only", now);
    let entry = entry_at(&task, ChangeType::Creation, "ToDo", now);
    repo.store(&task, &entry).await.expect("store should succeed");

    let result = repo.store(&task, &entry).await;

    assert!(matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()));
    let history = repo.history(task.id()).await.expect("history should load");
    assert_eq!(history.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_unknown_task_writes_nothing(repo: InMemoryTaskRepository) {
    let now = Utc::now();
    let task = task_at("Never stored", now);
    let entry = entry_at(&task, ChangeType::StatusChange, "InProgress", now);

    let result = repo.update(&task, &entry).await;

    assert!(matches!(result, Err(TaskRepositoryError::NotFound(_))));
    let history = repo.history(task.id()).await.expect("history should load");
    assert!(history.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn entry_for_another_task_is_rejected(repo: InMemoryTaskRepository) {
    let now = Utc::now();
    let task = task_at("Mine", now);
    let other = task_at("Theirs", now);
    let foreign_entry = entry_at(&other, ChangeType::Creation, "ToDo", now);

    let result = repo.store(&task, &foreign_entry).await;

    assert!(matches!(result, Err(TaskRepositoryError::DanglingReference(_))));
    assert!(repo.find_by_id(task.id()).await.expect("lookup should succeed").is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_orders_by_creation_time(repo: InMemoryTaskRepository) {
    let base = Utc::now();
    let later = task_at("Later", base + Duration::seconds(10));
    let earlier = task_at("Earlier", base);
    repo.store(&later, &entry_at(&later, ChangeType::Creation, "ToDo", base))
        .await
        .expect("store should succeed");
    repo.store(&earlier, &entry_at(&earlier, ChangeType::Creation, "ToDo", base))
        .await
        .expect("store should succeed");

    let ids: Vec<TaskId> = repo
        .list()
        .await
        .expect("list should succeed")
        .iter()
        .map(|task| task.id())
        .collect();

    assert_eq!(ids, vec![earlier.id(), later.id()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_is_newest_first_with_ties_in_reverse_append_order(repo: InMemoryTaskRepository) {
    let base = Utc::now();
    let task = task_at("Busy task", base);
    let created = entry_at(&task, ChangeType::Creation, "ToDo", base);
    let tie_first = entry_at(&task, ChangeType::StatusChange, "InProgress", base);
    let tie_second = entry_at(&task, ChangeType::StatusChange, "Done", base);
    let later = base + Duration::seconds(1);
    let newest = entry_at(&task, ChangeType::StatusChange, "InProgress", later);

    repo.store(&task, &created).await.expect("store should succeed");
    for entry in [&tie_first, &tie_second, &newest] {
        repo.update(&task, entry).await.expect("update should succeed");
    }

    let history = repo.history(task.id()).await.expect("history should load");

    assert_eq!(history, vec![newest, tie_second, tie_first, created]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_of_unknown_task_is_empty(repo: InMemoryTaskRepository) {
    let history = repo.history(TaskId::new()).await.expect("history should load");
    assert!(history.is_empty());
}
