//! # Todolist Client
//!
//! Client-side state layer for a todo-list application.
//!
//! The state tree has four slices:
//!
//! - [`app_status`]: global request status, last error and the initialized flag
//! - [`auth`]: whether the session is logged in
//! - [`todolists`]: the ordered todolists with their client-only filter and
//!   per-row request status
//! - [`tasks`]: the tasks of every todolist, keyed by todolist id
//!
//! Each slice has its own reducer. Commands marked `#[thunk]` start a request
//! through the [`TodolistApi`](todolist_api::TodolistApi) held by the
//! [`TodolistEnvironment`]; the response comes back as a `#[settled]` action
//! and is applied by the same reducer. The slice reducers are combined into
//! [`root_reducer`] and driven by a [`TodolistStore`].
//!
//! ## Example
//!
//! ```no_run
//! use todolist_api::TodolistClient;
//! use todolist_client::{create_store, AppAction, TodolistEnvironment, TodolistsAction};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = TodolistClient::new("my-api-key")?;
//! let store = create_store(TodolistEnvironment::new(client));
//!
//! store.send(AppAction::Initialize.into()).await?.wait().await;
//! store.send(TodolistsAction::FetchAll.into()).await?.wait().await;
//!
//! let titles = store
//!     .state(|s| s.todolists.items().iter().map(|t| t.title.clone()).collect::<Vec<_>>())
//!     .await;
//! println!("{titles:?}");
//! # Ok(())
//! # }
//! ```

pub mod app_status;
pub mod auth;
pub mod config;
pub mod environment;
pub mod errors;
pub mod events;
pub mod root;
pub mod tasks;
pub mod todolists;

pub use app_status::{AppAction, AppState, AppStatusReducer, RequestStatus};
pub use auth::{AuthAction, AuthReducer, AuthState, LoginRejection};
pub use config::{ClientConfig, ConfigError};
pub use environment::TodolistEnvironment;
pub use errors::{RequestError, DEFAULT_ERROR_MESSAGE};
pub use events::{TodolistEvent, TodolistObserver};
pub use root::{create_store, root_reducer, RootAction, RootReducer, RootState, TodolistStore};
pub use tasks::{TaskPatch, TasksAction, TasksReducer, TasksState};
pub use todolists::{FilterValue, TodolistDomain, TodolistsAction, TodolistsReducer, TodolistsState};
