//! # Todolist API Client
//!
//! Rust client for the todolist REST API: todolists, their tasks and the
//! cookie-based session endpoints.
//!
//! ## Example
//!
//! ```no_run
//! use todolist_api::{TodolistApi, TodolistClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TodolistClient::new("my-api-key")?;
//!
//!     for todolist in client.get_todolists().await? {
//!         println!("{}: {}", todolist.id, todolist.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Every endpoint except the two listings answers with an envelope
//! `{resultCode, messages, fieldsErrors, data}`; a non-zero result code
//! surfaces as [`ApiError::Rejected`].

pub mod api;
pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use api::{ApiFuture, TodolistApi};
pub use client::{TodolistClient, DEFAULT_API_URL};
pub use error::ApiError;
pub use types::{
    ApiResponse, FieldError, LoginData, LoginParams, MeData, Task, TaskPriority, TaskStatus,
    TasksPage, Todolist, UpdateTaskModel,
};
