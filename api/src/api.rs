//! The API surface the state layer depends on
//!
//! Reducers never hold a concrete HTTP client. They receive an
//! `Arc<dyn TodolistApi>` through their environment, so tests can swap in an
//! in-memory fake.

use crate::error::ApiError;
use crate::types::{LoginData, LoginParams, MeData, Task, Todolist, UpdateTaskModel};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by every [`TodolistApi`] call
///
/// The future owns everything it needs, so it can be moved into an effect
/// that outlives the reducer call that created it.
pub type ApiFuture<T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send>>;

/// Todolist REST API
///
/// One method per endpoint. Methods returning `()` map endpoints whose
/// success payload is empty.
pub trait TodolistApi: Send + Sync {
    /// Probe the current session (`GET auth/me`)
    fn me(&self) -> ApiFuture<MeData>;

    /// Log in (`POST auth/login`)
    fn login(&self, params: LoginParams) -> ApiFuture<LoginData>;

    /// Log out (`DELETE auth/login`)
    fn logout(&self) -> ApiFuture<()>;

    /// List every todolist (`GET todo-lists`)
    fn get_todolists(&self) -> ApiFuture<Vec<Todolist>>;

    /// Create a todolist (`POST todo-lists`)
    fn create_todolist(&self, title: &str) -> ApiFuture<Todolist>;

    /// Rename a todolist (`PUT todo-lists/{id}`)
    fn update_todolist_title(&self, todolist_id: &str, title: &str) -> ApiFuture<()>;

    /// Delete a todolist (`DELETE todo-lists/{id}`)
    fn delete_todolist(&self, todolist_id: &str) -> ApiFuture<()>;

    /// List the tasks of one todolist (`GET todo-lists/{id}/tasks`)
    fn get_tasks(&self, todolist_id: &str) -> ApiFuture<Vec<Task>>;

    /// Create a task (`POST todo-lists/{id}/tasks`)
    fn create_task(&self, todolist_id: &str, title: &str) -> ApiFuture<Task>;

    /// Replace every writable field of a task (`PUT todo-lists/{id}/tasks/{taskId}`)
    fn update_task(
        &self,
        todolist_id: &str,
        task_id: &str,
        model: UpdateTaskModel,
    ) -> ApiFuture<Task>;

    /// Delete a task (`DELETE todo-lists/{id}/tasks/{taskId}`)
    fn delete_task(&self, todolist_id: &str, task_id: &str) -> ApiFuture<()>;
}
