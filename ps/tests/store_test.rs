//! Integration tests for PrismaStore
//!
//! These exercise the public RecordStore surface against both backends.

use std::sync::Arc;

use chrono::NaiveDate;
use prismastore::{
    Backend, FileBackend, MemoryBackend, Priority, RandomIds, RecordStore, StoreError, TASKS_KEY, TaskPatch,
};
use proptest::prelude::*;
use tempfile::TempDir;

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

async fn run_scenario(backend: Arc<dyn Backend>) {
    let store = RecordStore::open(backend.clone(), Arc::new(RandomIds)).await.unwrap();

    let alice = store.register("alice", "alice@x.com").await.unwrap();
    assert_eq!(store.session().map(|s| s.id), Some(alice.id.clone()));
    assert!(store.list_tasks().await.unwrap().is_empty());

    let task = store
        .create_task("Audit", "", Priority::Medium, date("2024-06-01"))
        .await
        .unwrap();
    assert!(!task.completed);

    store.update_task(&task.id, TaskPatch::completed(true)).await.unwrap();
    let tasks = store.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].completed);
    assert_eq!(tasks[0].title, "Audit");

    store.logout().await.unwrap();
    assert!(store.session().is_none());

    let session = store.login("alice@x.com").await.unwrap();
    assert_eq!(session.id, alice.id);
    let tasks = store.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task.id);
    assert!(tasks[0].completed);
}

// =============================================================================
// End-to-end scenario
// =============================================================================

#[tokio::test]
async fn test_scenario_memory_backend() {
    run_scenario(Arc::new(MemoryBackend::new())).await;
}

#[tokio::test]
async fn test_scenario_file_backend() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    run_scenario(Arc::new(FileBackend::open(temp.path()).unwrap())).await;
}

#[tokio::test]
async fn test_file_backend_survives_reopen() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    let task_id = {
        let store = RecordStore::with_backend(FileBackend::open(temp.path()).unwrap())
            .await
            .unwrap();
        store.register("alice", "alice@x.com").await.unwrap();
        store
            .create_task("Audit", "books", Priority::High, date("2024-06-01"))
            .await
            .unwrap()
            .id
    };

    let store = RecordStore::with_backend(FileBackend::open(temp.path()).unwrap())
        .await
        .unwrap();
    let session = store.session().expect("session restored from disk");
    assert_eq!(session.email, "alice@x.com");

    let tasks = store.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task_id);
    assert_eq!(tasks[0].description, "books");

    store.logout().await.unwrap();
    let store = RecordStore::with_backend(FileBackend::open(temp.path()).unwrap())
        .await
        .unwrap();
    assert!(store.session().is_none());
    assert!(store.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_loads_collections_written_by_browser_client() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(
        temp.path().join("prisma_flow_users.json"),
        r#"[{"id":"u-k2j4h","username":"alice","email":"alice@x.com","token":"jwt_abc"}]"#,
    )
    .unwrap();
    std::fs::write(
        temp.path().join("prisma_flow_tasks.json"),
        r#"[{"id":"task-9f8e7d6","title":"Audit","description":"","priority":"High","dueDate":"2024-06-01","completed":false,"userId":"u-k2j4h","createdAt":"2024-05-20T10:11:12.345Z"}]"#,
    )
    .unwrap();

    let store = RecordStore::with_backend(FileBackend::open(temp.path()).unwrap())
        .await
        .unwrap();
    assert!(store.session().is_none());

    store.login("alice@x.com").await.unwrap();
    let tasks = store.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].priority, Priority::High);
}

#[tokio::test]
async fn test_corrupt_tasks_file_is_an_error_not_a_reset() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let backend = Arc::new(FileBackend::open(temp.path()).unwrap());
    let store = RecordStore::open(backend.clone(), Arc::new(RandomIds)).await.unwrap();
    store.register("alice", "alice@x.com").await.unwrap();

    backend.write(TASKS_KEY, "{ not json".to_string()).await.unwrap();

    let err = store.list_tasks().await.unwrap_err();
    assert!(err.is_storage());
    assert!(matches!(err, StoreError::Corrupt { .. }));
    assert_eq!(backend.read(TASKS_KEY).await.unwrap().as_deref(), Some("{ not json"));
}

// =============================================================================
// Listing property
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Create { title: String, priority: Priority },
    Complete { pick: usize, completed: bool },
    Rename { pick: usize, title: String },
    Delete { pick: usize },
    DeleteUnknown,
    SwitchAccount,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let priority = prop::sample::select(Priority::ALL.to_vec());
    prop_oneof![
        3 => ("[a-z]{1,8}", priority).prop_map(|(title, priority)| Op::Create { title, priority }),
        2 => (any::<usize>(), any::<bool>()).prop_map(|(pick, completed)| Op::Complete { pick, completed }),
        1 => (any::<usize>(), "[A-Z]{1,8}").prop_map(|(pick, title)| Op::Rename { pick, title }),
        2 => any::<usize>().prop_map(|pick| Op::Delete { pick }),
        1 => Just(Op::DeleteUnknown),
        1 => Just(Op::SwitchAccount),
    ]
}

/// Reference row: (id, owner email, title, priority, completed)
type ModelRow = (String, &'static str, String, Priority, bool);

async fn apply_ops(ops: Vec<Op>) {
    let store = RecordStore::with_backend(MemoryBackend::new()).await.unwrap();
    store.register("bob", "bob@x.com").await.unwrap();
    store.register("alice", "alice@x.com").await.unwrap();
    let mut active = "alice@x.com";
    let mut model: Vec<ModelRow> = Vec::new();

    for op in ops {
        match op {
            Op::Create { title, priority } => {
                let task = store
                    .create_task(&title, "", priority, date("2024-06-01"))
                    .await
                    .unwrap();
                model.push((task.id, active, title, priority, false));
            }
            Op::Complete { pick, completed } if !model.is_empty() => {
                let idx = pick % model.len();
                let row = &mut model[idx];
                store.update_task(&row.0, TaskPatch::completed(completed)).await.unwrap();
                row.4 = completed;
            }
            Op::Rename { pick, title } if !model.is_empty() => {
                let idx = pick % model.len();
                let row = &mut model[idx];
                let patch = TaskPatch {
                    title: Some(title.clone()),
                    ..Default::default()
                };
                store.update_task(&row.0, patch).await.unwrap();
                row.2 = title;
            }
            Op::Delete { pick } if !model.is_empty() => {
                let row = model.remove(pick % model.len());
                store.delete_task(&row.0).await.unwrap();
            }
            Op::DeleteUnknown => {
                store.delete_task("task-does-not-exist").await.unwrap();
            }
            Op::SwitchAccount => {
                active = if active == "alice@x.com" { "bob@x.com" } else { "alice@x.com" };
                store.login(active).await.unwrap();
            }
            _ => {}
        }

        let listed: Vec<(String, String, Priority, bool)> = store
            .list_tasks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| (t.id, t.title, t.priority, t.completed))
            .collect();
        let expected: Vec<(String, String, Priority, bool)> = model
            .iter()
            .filter(|row| row.1 == active)
            .map(|row| (row.0.clone(), row.2.clone(), row.3, row.4))
            .collect();
        assert_eq!(listed, expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_listing_matches_reference_model(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build runtime");
        rt.block_on(apply_ops(ops));
    }
}
