//! End-to-end tests: the real store, the root reducer and the in-memory API

#![allow(clippy::unwrap_used)]

use std::time::Duration;
use todolist_api::{LoginParams, TaskPriority, TaskStatus};
use todolist_client::{
    create_store, AppAction, AuthAction, FilterValue, RequestStatus, RootAction, TaskPatch,
    TasksAction, TodolistEnvironment, TodolistStore, TodolistsAction,
};
use todolist_testing::{init_test_tracing, ApiCall, MockTodolistApi};

fn setup(api: &MockTodolistApi) -> TodolistStore {
    init_test_tracing();
    create_store(TodolistEnvironment::new(api.clone()))
}

/// Send an action and wait until every request it started has settled
async fn dispatch(store: &TodolistStore, action: impl Into<RootAction>) {
    let mut handle = store.send(action.into()).await.unwrap();
    handle.wait().await;
}

async fn status(store: &TodolistStore) -> RequestStatus {
    store.state(|s| s.app.status).await
}

async fn create_todolist(store: &TodolistStore, title: &str) -> String {
    dispatch(store, TodolistsAction::Create { title: title.into() }).await;
    store.state(|s| s.todolists.ids()[0].clone()).await
}

#[tokio::test]
async fn test_initialize_with_active_session() {
    let api = MockTodolistApi::new();
    api.set_logged_in(true);
    let store = setup(&api);

    dispatch(&store, AppAction::Initialize).await;

    let (app, auth) = store.state(|s| (s.app.clone(), s.auth.clone())).await;
    assert!(app.is_initialized);
    assert!(auth.is_logged_in);
    assert_eq!(app.status, RequestStatus::Succeeded);
}

#[tokio::test]
async fn test_initialize_without_session() {
    let api = MockTodolistApi::new();
    let store = setup(&api);

    dispatch(&store, AppAction::Initialize).await;

    let (app, auth) = store.state(|s| (s.app.clone(), s.auth.clone())).await;
    assert!(app.is_initialized);
    assert!(!auth.is_logged_in);
    assert_eq!(app.error, None);
}

#[tokio::test]
async fn test_initialize_survives_network_failure() {
    let api = MockTodolistApi::new();
    api.disconnect_next();
    let store = setup(&api);

    dispatch(&store, AppAction::Initialize).await;

    let app = store.state(|s| s.app.clone()).await;
    assert!(app.is_initialized);
    assert_eq!(app.error, None);
    assert_ne!(app.status, RequestStatus::Loading);
}

#[tokio::test]
async fn test_failed_login_then_successful_login() {
    let api = MockTodolistApi::new();
    let store = setup(&api);
    api.reject_next("bad password");

    dispatch(&store, AuthAction::Login(LoginParams::new("free@samuraijs.com", "oops", false))).await;

    let (app, auth) = store.state(|s| (s.app.clone(), s.auth.clone())).await;
    assert!(!auth.is_logged_in);
    assert!(app.error.unwrap().contains("bad password"));
    assert_eq!(app.status, RequestStatus::Failed);
    assert_eq!(auth.last_rejection.unwrap().messages, vec!["bad password".to_string()]);

    dispatch(&store, AuthAction::Login(LoginParams::new("free@samuraijs.com", "free", false))).await;

    let (app, auth) = store.state(|s| (s.app.clone(), s.auth.clone())).await;
    assert!(auth.is_logged_in);
    assert_eq!(app.error, None);
    assert_eq!(app.status, RequestStatus::Succeeded);
    assert_eq!(auth.last_rejection, None);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let api = MockTodolistApi::new();
    let store = setup(&api);

    dispatch(&store, AuthAction::Login(LoginParams::new("free@samuraijs.com", "free", true))).await;
    assert!(store.state(|s| s.auth.is_logged_in).await);

    dispatch(&store, AuthAction::Logout).await;

    assert!(!store.state(|s| s.auth.is_logged_in).await);
    assert!(!api.is_logged_in());
    assert_eq!(status(&store).await, RequestStatus::Succeeded);
}

#[tokio::test]
async fn test_new_todolist_has_empty_task_list() {
    let api = MockTodolistApi::new();
    let store = setup(&api);

    let id = create_todolist(&store, "Groceries").await;

    // Pre-initialized on create, before any task fetch
    assert_eq!(
        store.state(|s| s.tasks.tasks(&id).map(<[_]>::to_vec)).await,
        Some(Vec::new())
    );

    dispatch(&store, TasksAction::FetchForList { todolist_id: id.clone() }).await;
    assert_eq!(store.state(|s| s.tasks.tasks(&id).map(<[_]>::len)).await, Some(0));
    assert_eq!(status(&store).await, RequestStatus::Succeeded);
}

#[tokio::test]
async fn test_remove_todolist_drops_its_tasks() {
    let api = MockTodolistApi::new();
    let store = setup(&api);

    let keep = create_todolist(&store, "Work").await;
    let doomed = create_todolist(&store, "Groceries").await;
    dispatch(
        &store,
        TasksAction::Create {
            todolist_id: doomed.clone(),
            title: "Buy milk".into(),
        },
    )
    .await;
    assert_eq!(store.state(|s| s.tasks.total()).await, 1);

    dispatch(&store, TodolistsAction::Remove { id: doomed.clone() }).await;

    let (ids, task_keys) = store
        .state(|s| (s.todolists.ids(), s.tasks.todolist_ids()))
        .await;
    assert_eq!(ids, vec![keep.clone()]);
    assert_eq!(task_keys, vec![keep]);
    assert_eq!(api.tasks(&doomed), None);
}

#[tokio::test]
async fn test_failed_remove_restores_row() {
    let api = MockTodolistApi::new();
    let store = setup(&api);
    let id = create_todolist(&store, "Groceries").await;

    api.disconnect_next();
    dispatch(&store, TodolistsAction::Remove { id: id.clone() }).await;

    let (row_status, app) = store
        .state(|s| (s.todolists.get(&id).map(|t| t.entity_status), s.app.clone()))
        .await;
    assert_eq!(row_status, Some(RequestStatus::Idle));
    assert_eq!(app.status, RequestStatus::Failed);
    assert_eq!(app.error.as_deref(), Some("Request failed: connection refused"));
}

#[tokio::test]
async fn test_update_status_keeps_other_fields() {
    let api = MockTodolistApi::new();
    let store = setup(&api);
    let todolist_id = create_todolist(&store, "Groceries").await;
    dispatch(
        &store,
        TasksAction::Create {
            todolist_id: todolist_id.clone(),
            title: "Buy milk".into(),
        },
    )
    .await;
    let task_id = store
        .state(|s| s.tasks.tasks(&todolist_id).unwrap()[0].id.clone())
        .await;

    dispatch(
        &store,
        TasksAction::UpdateFields {
            todolist_id: todolist_id.clone(),
            task_id: task_id.clone(),
            patch: TaskPatch::new().status(TaskStatus::Completed),
        },
    )
    .await;

    let task = store
        .state(|s| s.tasks.find(&todolist_id, &task_id).cloned())
        .await
        .unwrap();
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.priority, TaskPriority::Low);
    assert_eq!(task.status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_empty_patch_changes_nothing() {
    let api = MockTodolistApi::new();
    let store = setup(&api);
    let todolist_id = create_todolist(&store, "Groceries").await;
    dispatch(
        &store,
        TasksAction::Create {
            todolist_id: todolist_id.clone(),
            title: "Buy milk".into(),
        },
    )
    .await;
    let before = store.state(|s| s.tasks.clone()).await;
    let task_id = before.tasks(&todolist_id).unwrap()[0].id.clone();

    dispatch(
        &store,
        TasksAction::UpdateFields {
            todolist_id,
            task_id,
            patch: TaskPatch::new(),
        },
    )
    .await;

    assert_eq!(store.state(|s| s.tasks.clone()).await, before);
}

#[tokio::test]
async fn test_update_of_unknown_task_never_reaches_server() {
    let api = MockTodolistApi::new();
    let store = setup(&api);
    let todolist_id = create_todolist(&store, "Groceries").await;
    let calls_before = api.calls().len();

    dispatch(
        &store,
        TasksAction::UpdateFields {
            todolist_id,
            task_id: "stale".into(),
            patch: TaskPatch::new().title("Renamed"),
        },
    )
    .await;

    assert_eq!(api.calls().len(), calls_before);
    assert_eq!(status(&store).await, RequestStatus::Succeeded);
}

#[tokio::test]
async fn test_status_never_left_loading() {
    let api = MockTodolistApi::new();
    let store = setup(&api);

    dispatch(&store, TodolistsAction::FetchAll).await;
    assert_eq!(status(&store).await, RequestStatus::Succeeded);

    dispatch(&store, TodolistsAction::Create { title: String::new() }).await;
    assert_eq!(status(&store).await, RequestStatus::Failed);

    let id = create_todolist(&store, "Groceries").await;
    assert_eq!(status(&store).await, RequestStatus::Succeeded);

    api.disconnect_next();
    dispatch(
        &store,
        TodolistsAction::Rename {
            id: id.clone(),
            title: "Shopping".into(),
        },
    )
    .await;
    assert_eq!(status(&store).await, RequestStatus::Failed);

    dispatch(&store, TasksAction::Create { todolist_id: id.clone(), title: "x".repeat(101) }).await;
    assert_eq!(status(&store).await, RequestStatus::Failed);

    dispatch(&store, TasksAction::Remove { todolist_id: id, task_id: "missing".into() }).await;
    assert_eq!(status(&store).await, RequestStatus::Failed);
}

#[tokio::test]
async fn test_rename_then_filter() {
    let api = MockTodolistApi::new();
    let store = setup(&api);
    let id = create_todolist(&store, "Groceries").await;

    dispatch(
        &store,
        TodolistsAction::Rename {
            id: id.clone(),
            title: "Shopping".into(),
        },
    )
    .await;
    dispatch(
        &store,
        TodolistsAction::FilterChanged {
            id: id.clone(),
            filter: FilterValue::Active,
        },
    )
    .await;

    let row = store.state(|s| s.todolists.get(&id).cloned()).await.unwrap();
    assert_eq!(row.title, "Shopping");
    assert_eq!(row.filter, FilterValue::Active);
    assert_eq!(api.todolists()[0].title, "Shopping");
}

#[tokio::test]
async fn test_fetch_all_replaces_list_and_task_keys() {
    let api = MockTodolistApi::new();
    let older = api.seed_todolist("Groceries");
    let newer = api.seed_todolist("Work");
    api.seed_task(&older.id, "Buy milk").unwrap();
    let store = setup(&api);

    dispatch(&store, TodolistsAction::FetchAll).await;
    dispatch(&store, TasksAction::FetchForList { todolist_id: older.id.clone() }).await;

    let (ids, older_tasks, newer_tasks) = store
        .state(|s| {
            (
                s.todolists.ids(),
                s.tasks.tasks(&older.id).map(<[_]>::len),
                s.tasks.tasks(&newer.id).map(<[_]>::len),
            )
        })
        .await;
    assert_eq!(ids, vec![newer.id.clone(), older.id.clone()]);
    assert_eq!(older_tasks, Some(1));
    assert_eq!(newer_tasks, Some(0));
    assert_eq!(
        api.calls(),
        vec![
            ApiCall::GetTodolists,
            ApiCall::GetTasks {
                todolist_id: older.id
            }
        ]
    );
}

#[tokio::test]
async fn test_concurrent_creates_both_land() {
    let api = MockTodolistApi::new().with_latency(Duration::from_millis(20));
    let store = setup(&api);

    let mut first = store
        .send(TodolistsAction::Create { title: "First".into() }.into())
        .await
        .unwrap();
    let mut second = store
        .send(TodolistsAction::Create { title: "Second".into() }.into())
        .await
        .unwrap();
    assert_eq!(status(&store).await, RequestStatus::Loading);

    first.wait().await;
    second.wait().await;

    let (count, keys) = store
        .state(|s| (s.todolists.len(), s.tasks.todolist_ids().len()))
        .await;
    assert_eq!(count, 2);
    assert_eq!(keys, 2);
    assert_eq!(status(&store).await, RequestStatus::Succeeded);
}

#[tokio::test]
async fn test_settled_actions_are_broadcast() {
    let api = MockTodolistApi::new();
    let store = setup(&api);
    let mut actions = store.subscribe_actions();

    dispatch(&store, TodolistsAction::FetchAll).await;

    let settled = actions.recv().await.unwrap();
    assert_eq!(settled.action_type(), "todolists/Fetched");
    assert!(settled.is_settled());
}

#[tokio::test]
async fn test_shutdown_waits_for_in_flight_request() {
    let api = MockTodolistApi::new().with_latency(Duration::from_millis(30));
    let store = setup(&api);

    let _handle = store
        .send(TodolistsAction::Create { title: "Groceries".into() }.into())
        .await
        .unwrap();
    store.shutdown(Duration::from_secs(2)).await.unwrap();

    assert_eq!(store.state(|s| s.todolists.len()).await, 1);
    assert!(store.send(TodolistsAction::FetchAll.into()).await.is_err());
}
