//! Root state tree, root action and the combined reducer

use crate::app_status::{AppAction, AppState, AppStatusReducer};
use crate::auth::{AuthAction, AuthReducer, AuthState};
use crate::environment::TodolistEnvironment;
use crate::events::{TodolistEvent, TodolistObserver};
use crate::tasks::{TasksAction, TasksReducer, TasksState};
use crate::todolists::{TodolistsAction, TodolistsReducer, TodolistsState};
use serde::{Deserialize, Serialize};
use todolist_api::Task;
use todolist_core::composition::{combine_reducers, CombinedReducer};
use todolist_core::{effect::Effect, reducer::Reducer, SmallVec};
use todolist_runtime::Store;

/// The whole client state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootState {
    /// Global request status and initialization
    pub app: AppState,
    /// Session flag
    pub auth: AuthState,
    /// Todolists in display order
    pub todolists: TodolistsState,
    /// Tasks keyed by todolist id
    pub tasks: TasksState,
}

impl RootState {
    /// Deliver a todolist lifecycle event to every observing slice
    pub fn notify(&mut self, event: &TodolistEvent) {
        tracing::trace!(?event, "Todolist event");
        self.tasks.on_todolist_event(event);
    }

    /// Tasks of a todolist that pass its current filter
    #[must_use]
    pub fn visible_tasks(&self, todolist_id: &str) -> Vec<&Task> {
        let Some(todolist) = self.todolists.get(todolist_id) else {
            return Vec::new();
        };
        self.tasks
            .tasks(todolist_id)
            .unwrap_or_default()
            .iter()
            .filter(|task| todolist.filter.matches(task))
            .collect()
    }
}

/// Every action the store accepts
#[derive(Clone, Debug, PartialEq)]
pub enum RootAction {
    /// App status slice
    App(AppAction),
    /// Auth slice
    Auth(AuthAction),
    /// Todolists slice
    Todolists(TodolistsAction),
    /// Tasks slice
    Tasks(TasksAction),
}

impl RootAction {
    /// `"<slice>/<Variant>"` name of the wrapped action
    #[must_use]
    pub const fn action_type(&self) -> &'static str {
        match self {
            Self::App(action) => action.action_type(),
            Self::Auth(action) => action.action_type(),
            Self::Todolists(action) => action.action_type(),
            Self::Tasks(action) => action.action_type(),
        }
    }

    /// Returns true if the wrapped action starts a request
    #[must_use]
    pub const fn is_thunk(&self) -> bool {
        match self {
            Self::App(action) => action.is_thunk(),
            Self::Auth(action) => action.is_thunk(),
            Self::Todolists(action) => action.is_thunk(),
            Self::Tasks(action) => action.is_thunk(),
        }
    }

    /// Returns true if the wrapped action carries a request outcome
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        match self {
            Self::App(action) => action.is_settled(),
            Self::Auth(action) => action.is_settled(),
            Self::Todolists(action) => action.is_settled(),
            Self::Tasks(action) => action.is_settled(),
        }
    }
}

impl From<AppAction> for RootAction {
    fn from(action: AppAction) -> Self {
        Self::App(action)
    }
}

impl From<AuthAction> for RootAction {
    fn from(action: AuthAction) -> Self {
        Self::Auth(action)
    }
}

impl From<TodolistsAction> for RootAction {
    fn from(action: TodolistsAction) -> Self {
        Self::Todolists(action)
    }
}

impl From<TasksAction> for RootAction {
    fn from(action: TasksAction) -> Self {
        Self::Tasks(action)
    }
}

/// Logs every action and counts started requests
#[derive(Debug, Clone, Copy, Default)]
struct DispatchLog;

impl Reducer for DispatchLog {
    type State = RootState;
    type Action = RootAction;
    type Environment = TodolistEnvironment;

    fn reduce(
        &self,
        _state: &mut RootState,
        action: RootAction,
        _env: &TodolistEnvironment,
    ) -> SmallVec<[Effect<RootAction>; 4]> {
        let action_type = action.action_type();
        tracing::debug!(action = action_type, "Dispatching action");

        if action.is_thunk() {
            metrics::counter!("todolist.requests.started", "action" => action_type).increment(1);
        } else if action.is_settled() {
            metrics::counter!("todolist.requests.settled", "action" => action_type).increment(1);
        }

        SmallVec::new()
    }
}

/// The slice reducers combined
pub type RootReducer = CombinedReducer<RootState, RootAction, TodolistEnvironment>;

/// A store running the root reducer
pub type TodolistStore = Store<RootState, RootAction, TodolistEnvironment, RootReducer>;

/// Combine the slice reducers into the root reducer
///
/// Slices see every action in this order; each one ignores actions that
/// belong to another slice.
#[must_use]
pub fn root_reducer() -> RootReducer {
    combine_reducers(vec![
        Box::new(DispatchLog),
        Box::new(AppStatusReducer),
        Box::new(AuthReducer),
        Box::new(TodolistsReducer),
        Box::new(TasksReducer),
    ])
}

/// Create a store with an empty state tree
#[must_use]
pub fn create_store(environment: TodolistEnvironment) -> TodolistStore {
    Store::new(RootState::default(), root_reducer(), environment)
}
