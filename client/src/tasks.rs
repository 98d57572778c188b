//! Tasks slice
//!
//! Tasks are kept per todolist, newest first. The key set always equals the
//! set of todolist ids: keys are only added or removed in response to
//! [`TodolistEvent`]s, and settled requests aimed at a todolist that has
//! since disappeared are dropped instead of recreating its key.

use crate::app_status::RequestStatus;
use crate::environment::{request, TodolistEnvironment};
use crate::errors::{settle, RequestError};
use crate::events::{TodolistEvent, TodolistObserver};
use crate::root::{RootAction, RootState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use todolist_api::{Task, TaskPriority, TaskStatus, UpdateTaskModel};
use todolist_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use todolist_macros::Action;

// ============================================================================
// Patch
// ============================================================================

/// Partial update of a task's writable fields
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// New priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    /// New start date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// New deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl TaskPatch {
    /// An empty patch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the start date
    #[must_use]
    pub fn start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    /// Set the deadline
    #[must_use]
    pub fn deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    /// Returns true if the patch changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.start_date.is_none()
            && self.deadline.is_none()
    }

    /// Merge the patch into `task`
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(start_date) = &self.start_date {
            task.start_date = Some(start_date.clone());
        }
        if let Some(deadline) = &self.deadline {
            task.deadline = Some(deadline.clone());
        }
    }

    /// Build the full update payload: `task`'s current values with the patch on top
    #[must_use]
    pub fn overlay(&self, task: &Task) -> UpdateTaskModel {
        let mut updated = task.clone();
        self.apply_to(&mut updated);
        UpdateTaskModel::from(&updated)
    }
}

// ============================================================================
// State
// ============================================================================

/// Tasks slice state: todolist id to its tasks, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TasksState {
    by_todolist: BTreeMap<String, Vec<Task>>,
}

impl TasksState {
    /// Tasks of one todolist, `None` if the todolist is unknown
    #[must_use]
    pub fn tasks(&self, todolist_id: &str) -> Option<&[Task]> {
        self.by_todolist.get(todolist_id).map(Vec::as_slice)
    }

    /// Look up one task
    #[must_use]
    pub fn find(&self, todolist_id: &str, task_id: &str) -> Option<&Task> {
        self.tasks(todolist_id)?.iter().find(|t| t.id == task_id)
    }

    /// Todolist ids that have a task list, sorted
    #[must_use]
    pub fn todolist_ids(&self) -> Vec<String> {
        self.by_todolist.keys().cloned().collect()
    }

    /// Total number of tasks across every todolist
    #[must_use]
    pub fn total(&self) -> usize {
        self.by_todolist.values().map(Vec::len).sum()
    }

    /// Replace the tasks of a known todolist; returns false if it is unknown
    pub fn set_tasks(&mut self, todolist_id: &str, tasks: Vec<Task>) -> bool {
        match self.by_todolist.get_mut(todolist_id) {
            Some(existing) => {
                *existing = tasks;
                true
            },
            None => false,
        }
    }

    /// Insert a task at the head of its todolist; returns false if the todolist is unknown
    pub fn add_task(&mut self, task: Task) -> bool {
        match self.by_todolist.get_mut(&task.todo_list_id) {
            Some(tasks) => {
                tasks.insert(0, task);
                true
            },
            None => false,
        }
    }

    /// Merge `patch` into one task; returns false if the task is unknown
    pub fn update_task(&mut self, todolist_id: &str, task_id: &str, patch: &TaskPatch) -> bool {
        let task = self
            .by_todolist
            .get_mut(todolist_id)
            .and_then(|tasks| tasks.iter_mut().find(|t| t.id == task_id));

        match task {
            Some(task) => {
                patch.apply_to(task);
                true
            },
            None => false,
        }
    }

    /// Splice one task out; returns false if the task is unknown
    pub fn remove_task(&mut self, todolist_id: &str, task_id: &str) -> bool {
        let Some(tasks) = self.by_todolist.get_mut(todolist_id) else {
            return false;
        };
        match tasks.iter().position(|t| t.id == task_id) {
            Some(index) => {
                tasks.remove(index);
                true
            },
            None => false,
        }
    }
}

impl TodolistObserver for TasksState {
    fn on_todolist_event(&mut self, event: &TodolistEvent) {
        match event {
            TodolistEvent::Created(id) => {
                self.by_todolist.insert(id.clone(), Vec::new());
            },
            TodolistEvent::Removed(id) => {
                self.by_todolist.remove(id);
            },
            TodolistEvent::Replaced(ids) => {
                self.by_todolist = ids.iter().map(|id| (id.clone(), Vec::new())).collect();
            },
        }
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions for the tasks slice
#[derive(Action, Clone, Debug, PartialEq)]
#[action(slice = "tasks")]
pub enum TasksAction {
    /// Load the tasks of one todolist
    #[thunk]
    FetchForList {
        /// Target todolist
        todolist_id: String,
    },

    /// Create a task
    #[thunk]
    Create {
        /// Target todolist
        todolist_id: String,
        /// Title of the new task
        title: String,
    },

    /// Change some fields of a task
    #[thunk]
    UpdateFields {
        /// Todolist holding the task
        todolist_id: String,
        /// Target task
        task_id: String,
        /// Fields to change
        patch: TaskPatch,
    },

    /// Delete a task
    #[thunk]
    Remove {
        /// Todolist holding the task
        todolist_id: String,
        /// Target task
        task_id: String,
    },

    /// Outcome of [`TasksAction::FetchForList`]
    #[settled]
    Fetched {
        /// Target todolist
        todolist_id: String,
        /// Server answer
        result: Result<Vec<Task>, RequestError>,
    },

    /// Outcome of [`TasksAction::Create`]
    #[settled]
    Created(Result<Task, RequestError>),

    /// Outcome of [`TasksAction::UpdateFields`]
    #[settled]
    FieldsUpdated {
        /// Todolist holding the task
        todolist_id: String,
        /// Target task
        task_id: String,
        /// The patch that was requested, merged locally on success
        patch: TaskPatch,
        /// Server answer
        result: Result<Task, RequestError>,
    },

    /// Outcome of [`TasksAction::Remove`]
    #[settled]
    Removed {
        /// Todolist holding the task
        todolist_id: String,
        /// Target task
        task_id: String,
        /// Server answer
        result: Result<(), RequestError>,
    },
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the tasks slice
#[derive(Debug, Clone, Copy, Default)]
pub struct TasksReducer;

impl TasksReducer {
    /// Start an update, or do nothing if the task is not in local state
    #[tracing::instrument(skip(state, env, patch), name = "update_task")]
    fn update_fields(
        state: &mut RootState,
        todolist_id: String,
        task_id: String,
        patch: TaskPatch,
        env: &TodolistEnvironment,
    ) -> Option<Effect<RootAction>> {
        let Some(task) = state.tasks.find(&todolist_id, &task_id) else {
            tracing::warn!("Task not found in state, update skipped");
            return None;
        };

        let model = patch.overlay(task);
        state.app.set_status(RequestStatus::Loading);

        let call = env.api().update_task(&todolist_id, &task_id, model);
        Some(request(call, move |result| {
            TasksAction::FieldsUpdated {
                todolist_id,
                task_id,
                patch,
                result,
            }
            .into()
        }))
    }
}

impl Reducer for TasksReducer {
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
        let RootAction::Tasks(action) = action else {
            return SmallVec::new();
        };

        match action {
            // ========== Thunks ==========
            TasksAction::FetchForList { todolist_id } => {
                state.app.set_status(RequestStatus::Loading);
                let call = env.api().get_tasks(&todolist_id);
                smallvec![request(call, move |result| {
                    TasksAction::Fetched { todolist_id, result }.into()
                })]
            },

            TasksAction::Create { todolist_id, title } => {
                state.app.set_status(RequestStatus::Loading);
                smallvec![request(env.api().create_task(&todolist_id, &title), |result| {
                    TasksAction::Created(result).into()
                })]
            },

            TasksAction::UpdateFields {
                todolist_id,
                task_id,
                patch,
            } => Self::update_fields(state, todolist_id, task_id, patch, env)
                .into_iter()
                .collect(),

            TasksAction::Remove {
                todolist_id,
                task_id,
            } => {
                state.app.set_status(RequestStatus::Loading);
                let call = env.api().delete_task(&todolist_id, &task_id);
                smallvec![request(call, move |result| {
                    TasksAction::Removed {
                        todolist_id,
                        task_id,
                        result,
                    }
                    .into()
                })]
            },

            // ========== Settled ==========
            TasksAction::Fetched {
                todolist_id,
                result,
            } => {
                settle(state, result, |state, tasks| {
                    tracing::debug!(%todolist_id, count = tasks.len(), "Tasks fetched");
                    if !state.tasks.set_tasks(&todolist_id, tasks) {
                        tracing::debug!(%todolist_id, "Todolist gone before its tasks arrived");
                    }
                });
                SmallVec::new()
            },

            TasksAction::Created(result) => {
                settle(state, result, |state, task| {
                    let todolist_id = task.todo_list_id.clone();
                    if !state.tasks.add_task(task) {
                        tracing::debug!(%todolist_id, "Todolist gone before its new task arrived");
                    }
                });
                SmallVec::new()
            },

            TasksAction::FieldsUpdated {
                todolist_id,
                task_id,
                patch,
                result,
            } => {
                settle(state, result, |state, _confirmed| {
                    if !state.tasks.update_task(&todolist_id, &task_id, &patch) {
                        tracing::debug!(%todolist_id, %task_id, "Updated task is no longer present");
                    }
                });
                SmallVec::new()
            },

            TasksAction::Removed {
                todolist_id,
                task_id,
                result,
            } => {
                settle(state, result, |state, ()| {
                    state.tasks.remove_task(&todolist_id, &task_id);
                });
                SmallVec::new()
            },
        }
    }
}
