//! Todolists slice
//!
//! An ordered list of todolists, newest first. Each row carries two
//! client-only fields: the task filter the user picked and a per-row request
//! status used while the row is being deleted.
//!
//! Structural changes are reported as [`TodolistEvent`]s through
//! [`RootState::notify`] so the tasks slice can keep its keys in step.

use crate::app_status::RequestStatus;
use crate::environment::{request, TodolistEnvironment};
use crate::errors::{settle, RequestError};
use crate::events::TodolistEvent;
use crate::root::{RootAction, RootState};
use serde::{Deserialize, Serialize};
use todolist_api::{Task, TaskStatus, Todolist};
use todolist_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use todolist_macros::Action;

// ============================================================================
// State
// ============================================================================

/// Which tasks of a todolist are shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterValue {
    /// Every task
    #[default]
    All,
    /// Tasks that are not completed
    Active,
    /// Completed tasks
    Completed,
}

impl FilterValue {
    /// Returns true if `task` is visible under this filter
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => task.status != TaskStatus::Completed,
            Self::Completed => task.status == TaskStatus::Completed,
        }
    }
}

/// A todolist as the client holds it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodolistDomain {
    /// Server-assigned id
    pub id: String,
    /// Title
    pub title: String,
    /// Creation timestamp as sent by the server
    pub added_date: String,
    /// Server sort order
    pub order: i64,
    /// Task filter picked by the user
    pub filter: FilterValue,
    /// Request status of this row
    pub entity_status: RequestStatus,
}

impl TodolistDomain {
    /// Wrap a server record with the default client-only fields
    #[must_use]
    pub fn from_server(todolist: Todolist) -> Self {
        Self {
            id: todolist.id,
            title: todolist.title,
            added_date: todolist.added_date,
            order: todolist.order,
            filter: FilterValue::All,
            entity_status: RequestStatus::Idle,
        }
    }
}

/// Todolists slice state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodolistsState {
    items: Vec<TodolistDomain>,
}

impl TodolistsState {
    /// Todolists in display order
    #[must_use]
    pub fn items(&self) -> &[TodolistDomain] {
        &self.items
    }

    /// Look up a todolist by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TodolistDomain> {
        self.items.iter().find(|t| t.id == id)
    }

    /// Ids in display order
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|t| t.id.clone()).collect()
    }

    /// Number of todolists
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no todolists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the whole list
    ///
    /// Per-row filters and statuses are reset to their defaults.
    pub fn replace_all(&mut self, todolists: Vec<Todolist>) -> TodolistEvent {
        self.items = todolists.into_iter().map(TodolistDomain::from_server).collect();
        TodolistEvent::Replaced(self.ids())
    }

    /// Insert a todolist at the head of the list
    pub fn add(&mut self, todolist: Todolist) -> TodolistEvent {
        let domain = TodolistDomain::from_server(todolist);
        let event = TodolistEvent::Created(domain.id.clone());
        self.items.insert(0, domain);
        event
    }

    /// Remove a todolist; `None` if it was not present
    pub fn remove(&mut self, id: &str) -> Option<TodolistEvent> {
        let index = self.items.iter().position(|t| t.id == id)?;
        let removed = self.items.remove(index);
        Some(TodolistEvent::Removed(removed.id))
    }

    /// Set the title of a todolist; returns false if it was not present
    pub fn change_title(&mut self, id: &str, title: String) -> bool {
        self.find_mut(id).map(|t| t.title = title).is_some()
    }

    /// Set the task filter of a todolist; returns false if it was not present
    pub fn change_filter(&mut self, id: &str, filter: FilterValue) -> bool {
        self.find_mut(id).map(|t| t.filter = filter).is_some()
    }

    /// Set the request status of a todolist; returns false if it was not present
    pub fn change_entity_status(&mut self, id: &str, status: RequestStatus) -> bool {
        self.find_mut(id).map(|t| t.entity_status = status).is_some()
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut TodolistDomain> {
        self.items.iter_mut().find(|t| t.id == id)
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions for the todolists slice
#[derive(Action, Clone, Debug, PartialEq)]
#[action(slice = "todolists")]
pub enum TodolistsAction {
    /// Load every todolist, replacing the current list
    #[thunk]
    FetchAll,

    /// Create a todolist
    #[thunk]
    Create {
        /// Title of the new todolist
        title: String,
    },

    /// Rename a todolist
    #[thunk]
    Rename {
        /// Target todolist
        id: String,
        /// New title
        title: String,
    },

    /// Delete a todolist and its tasks
    #[thunk]
    Remove {
        /// Target todolist
        id: String,
    },

    /// Outcome of [`TodolistsAction::FetchAll`]
    #[settled]
    Fetched(Result<Vec<Todolist>, RequestError>),

    /// Outcome of [`TodolistsAction::Create`]
    #[settled]
    Created(Result<Todolist, RequestError>),

    /// Outcome of [`TodolistsAction::Rename`]
    #[settled]
    Renamed {
        /// Target todolist
        id: String,
        /// Title that was sent
        title: String,
        /// Server answer
        result: Result<(), RequestError>,
    },

    /// Outcome of [`TodolistsAction::Remove`]
    #[settled]
    Removed {
        /// Target todolist
        id: String,
        /// Server answer
        result: Result<(), RequestError>,
    },

    /// Change which tasks a todolist shows
    FilterChanged {
        /// Target todolist
        id: String,
        /// New filter
        filter: FilterValue,
    },

    /// Set the request status of one row
    EntityStatusChanged {
        /// Target todolist
        id: String,
        /// New status
        status: RequestStatus,
    },
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the todolists slice
#[derive(Debug, Clone, Copy, Default)]
pub struct TodolistsReducer;

impl Reducer for TodolistsReducer {
    type State = RootState;
    type Action = RootAction;
    type Environment = TodolistEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let RootAction::Todolists(action) = action else {
            return SmallVec::new();
        };

        match action {
            // ========== Thunks ==========
            TodolistsAction::FetchAll => {
                state.app.set_status(RequestStatus::Loading);
                smallvec![request(env.api().get_todolists(), |result| {
                    TodolistsAction::Fetched(result).into()
                })]
            },

            TodolistsAction::Create { title } => {
                state.app.set_status(RequestStatus::Loading);
                smallvec![request(env.api().create_todolist(&title), |result| {
                    TodolistsAction::Created(result).into()
                })]
            },

            TodolistsAction::Rename { id, title } => {
                state.app.set_status(RequestStatus::Loading);
                let call = env.api().update_todolist_title(&id, &title);
                smallvec![request(call, move |result| {
                    TodolistsAction::Renamed { id, title, result }.into()
                })]
            },

            TodolistsAction::Remove { id } => {
                state.app.set_status(RequestStatus::Loading);
                state.todolists.change_entity_status(&id, RequestStatus::Loading);
                let call = env.api().delete_todolist(&id);
                smallvec![request(call, move |result| {
                    TodolistsAction::Removed { id, result }.into()
                })]
            },

            // ========== Settled ==========
            TodolistsAction::Fetched(result) => {
                settle(state, result, |state, todolists| {
                    tracing::debug!(count = todolists.len(), "Todolists fetched");
                    let event = state.todolists.replace_all(todolists);
                    state.notify(&event);
                });
                SmallVec::new()
            },

            TodolistsAction::Created(result) => {
                settle(state, result, |state, todolist| {
                    tracing::debug!(id = %todolist.id, "Todolist created");
                    let event = state.todolists.add(todolist);
                    state.notify(&event);
                });
                SmallVec::new()
            },

            TodolistsAction::Renamed { id, title, result } => {
                settle(state, result, |state, ()| {
                    if !state.todolists.change_title(&id, title) {
                        tracing::debug!(%id, "Renamed todolist is no longer present");
                    }
                });
                SmallVec::new()
            },

            TodolistsAction::Removed { id, result } => {
                if result.is_err() {
                    state.todolists.change_entity_status(&id, RequestStatus::Idle);
                }
                settle(state, result, |state, ()| {
                    if let Some(event) = state.todolists.remove(&id) {
                        tracing::debug!(%id, "Todolist removed");
                        state.notify(&event);
                    }
                });
                SmallVec::new()
            },

            // ========== Client-only ==========
            TodolistsAction::FilterChanged { id, filter } => {
                state.todolists.change_filter(&id, filter);
                SmallVec::new()
            },

            TodolistsAction::EntityStatusChanged { id, status } => {
                state.todolists.change_entity_status(&id, status);
                SmallVec::new()
            },
        }
    }
}
