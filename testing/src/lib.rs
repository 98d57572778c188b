//! # Todolist Testing
//!
//! Testing utilities and helpers for the todolist client state layer.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then builder for reducers
//! - [`MockTodolistApi`], an in-memory fake of the REST API
//! - Fixtures and proptest strategies for wire types
//!
//! ## Example
//!
//! ```ignore
//! use todolist_testing::MockTodolistApi;
//! use todolist_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_create_todolist() {
//!     let api = MockTodolistApi::new();
//!     let store = Store::new(RootState::default(), root_reducer(), TodolistEnvironment::new(api.clone()));
//!
//!     let mut handle = store.send(TodolistsAction::Create { title: "Groceries".into() }.into()).await?;
//!     handle.wait().await;
//!
//!     assert_eq!(store.state(|s| s.todolists.len()).await, 1);
//! }
//! ```

mod mock_api;

pub use mock_api::{ApiCall, MockTodolistApi, MAX_TITLE_LENGTH};
pub use reducer_test::{assertions, run_effects, run_to_settled, ReducerTest};

/// Mock implementations of the environment
pub mod mocks {
    pub use super::mock_api::{ApiCall, MockTodolistApi};
}

/// Ready-made wire records
pub mod fixtures {
    use todolist_api::{Task, TaskPriority, TaskStatus, Todolist};

    /// A todolist with the given id and title
    #[must_use]
    pub fn todolist(id: &str, title: &str) -> Todolist {
        Todolist {
            id: id.to_string(),
            title: title.to_string(),
            added_date: "2025-01-01T00:00:00".to_string(),
            order: 0,
        }
    }

    /// A fresh task (status new, priority low) in `todolist_id`
    #[must_use]
    pub fn task(id: &str, todolist_id: &str, title: &str) -> Task {
        Task {
            id: id.to_string(),
            todo_list_id: todolist_id.to_string(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::New,
            priority: TaskPriority::Low,
            start_date: None,
            deadline: None,
            order: 0,
            added_date: "2025-01-01T00:00:00".to_string(),
        }
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;
    use todolist_api::{TaskPriority, TaskStatus};

    /// Titles the server accepts
    pub fn title() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ]{0,30}"
    }

    /// Any task status
    pub fn task_status() -> impl Strategy<Value = TaskStatus> {
        prop_oneof![
            Just(TaskStatus::New),
            Just(TaskStatus::InProgress),
            Just(TaskStatus::Completed),
            Just(TaskStatus::Draft),
        ]
    }

    /// Any task priority
    pub fn task_priority() -> impl Strategy<Value = TaskPriority> {
        prop_oneof![
            Just(TaskPriority::Low),
            Just(TaskPriority::Middle),
            Just(TaskPriority::High),
            Just(TaskPriority::Urgent),
            Just(TaskPriority::Later),
        ]
    }
}

/// Route `tracing` output to the test harness
///
/// Safe to call from every test; only the first call installs the subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("todolist=debug")),
        )
        .with_test_writer()
        .try_init();
}
