//! Todolist lifecycle events
//!
//! The todolists slice reports structural changes as [`TodolistEvent`]s and
//! never touches the tasks slice directly. Observers apply their own
//! transition in the same reduce call, so the tasks map and the todolist list
//! can never be seen out of step.

use serde::{Deserialize, Serialize};

/// A structural change to the set of todolists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodolistEvent {
    /// A todolist was added
    Created(String),

    /// A todolist was deleted
    Removed(String),

    /// The whole list was replaced by a fetch; carries the new ids in order
    Replaced(Vec<String>),
}

/// Reacts to todolist lifecycle events
pub trait TodolistObserver {
    /// Apply `event` to this observer's state
    fn on_todolist_event(&mut self, event: &TodolistEvent);
}
