//! In-memory stand-in for the todolist REST API
//!
//! `MockTodolistApi` keeps todolists, tasks and a session flag in memory and
//! answers every [`TodolistApi`] call the way the real server does. Tests can
//! script the next failures and inspect the calls that were made.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use todolist_api::{
    ApiError, ApiFuture, LoginData, LoginParams, MeData, Task, TaskPriority, TaskStatus,
    TodolistApi, Todolist, UpdateTaskModel,
};

/// Longest title the server accepts
pub const MAX_TITLE_LENGTH: usize = 100;

/// Timestamp stamped on every record the mock creates
const ADDED_DATE: &str = "2025-01-01T00:00:00";

/// User id reported for the mock session
const USER_ID: i64 = 1;

/// A call received by [`MockTodolistApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `GET auth/me`
    Me,
    /// `POST auth/login`
    Login {
        /// Email the client logged in with
        email: String,
    },
    /// `DELETE auth/login`
    Logout,
    /// `GET todo-lists`
    GetTodolists,
    /// `POST todo-lists`
    CreateTodolist {
        /// Requested title
        title: String,
    },
    /// `PUT todo-lists/{id}`
    UpdateTodolistTitle {
        /// Target todolist
        todolist_id: String,
        /// New title
        title: String,
    },
    /// `DELETE todo-lists/{id}`
    DeleteTodolist {
        /// Target todolist
        todolist_id: String,
    },
    /// `GET todo-lists/{id}/tasks`
    GetTasks {
        /// Target todolist
        todolist_id: String,
    },
    /// `POST todo-lists/{id}/tasks`
    CreateTask {
        /// Target todolist
        todolist_id: String,
        /// Requested title
        title: String,
    },
    /// `PUT todo-lists/{id}/tasks/{taskId}`
    UpdateTask {
        /// Target todolist
        todolist_id: String,
        /// Target task
        task_id: String,
        /// Full model that was sent
        model: UpdateTaskModel,
    },
    /// `DELETE todo-lists/{id}/tasks/{taskId}`
    DeleteTask {
        /// Target todolist
        todolist_id: String,
        /// Target task
        task_id: String,
    },
}

#[derive(Debug, Default)]
struct ServerState {
    todolists: Vec<Todolist>,
    tasks: HashMap<String, Vec<Task>>,
    account: Option<(String, String)>,
    logged_in: bool,
    next_id: u64,
    failures: VecDeque<ApiError>,
    calls: Vec<ApiCall>,
    latency: Option<Duration>,
}

impl ServerState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn insert_todolist(&mut self, title: &str) -> Todolist {
        let order = self.todolists.iter().map(|t| t.order).min().unwrap_or(0) - 1;
        let todolist = Todolist {
            id: self.next_id("tl"),
            title: title.to_string(),
            added_date: ADDED_DATE.to_string(),
            order,
        };
        self.todolists.insert(0, todolist.clone());
        self.tasks.insert(todolist.id.clone(), Vec::new());
        todolist
    }

    fn insert_task(&mut self, todolist_id: &str, title: &str) -> Option<Task> {
        let id = self.next_id("t");
        let tasks = self.tasks.get_mut(todolist_id)?;
        let order = tasks.iter().map(|t| t.order).min().unwrap_or(0) - 1;
        let task = Task {
            id,
            todo_list_id: todolist_id.to_string(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::New,
            priority: TaskPriority::Low,
            start_date: None,
            deadline: None,
            order,
            added_date: ADDED_DATE.to_string(),
        };
        tasks.insert(0, task.clone());
        Some(task)
    }
}

fn rejected(message: &str) -> ApiError {
    ApiError::Rejected {
        result_code: 1,
        messages: vec![message.to_string()],
        fields_errors: Vec::new(),
    }
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(rejected("Field Title is required. (Title)"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(rejected(
            "The field Title must be a string or array type with a maximum length of '100'. (Title)",
        ));
    }
    Ok(())
}

/// In-memory fake of the todolist REST API
///
/// Clones share the same server state.
///
/// # Example
///
/// ```
/// use todolist_api::TodolistApi;
/// use todolist_testing::MockTodolistApi;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let api = MockTodolistApi::new();
/// api.reject_next("Something went wrong");
///
/// assert!(api.get_todolists().await.is_err());
/// assert!(api.get_todolists().await.is_ok());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTodolistApi {
    inner: Arc<Mutex<ServerState>>,
}

impl MockTodolistApi {
    /// A server with no data that accepts any credentials
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept this email/password pair on login
    #[must_use]
    pub fn with_account(self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.lock().account = Some((email.into(), password.into()));
        self
    }

    /// Delay every response by `latency`
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        self.lock().latency = Some(latency);
        self
    }

    /// Put a todolist on the server without going through the API
    pub fn seed_todolist(&self, title: &str) -> Todolist {
        self.lock().insert_todolist(title)
    }

    /// Put a task on the server without going through the API
    ///
    /// Returns `None` if the todolist does not exist.
    pub fn seed_task(&self, todolist_id: &str, title: &str) -> Option<Task> {
        self.lock().insert_task(todolist_id, title)
    }

    /// Set whether a session cookie is currently valid
    pub fn set_logged_in(&self, logged_in: bool) {
        self.lock().logged_in = logged_in;
    }

    /// Whether the server currently considers the client logged in
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.lock().logged_in
    }

    /// Fail the next call (whatever endpoint it hits) with `error`
    ///
    /// Scripted failures queue up and are consumed one per call.
    pub fn fail_next(&self, error: ApiError) {
        self.lock().failures.push_back(error);
    }

    /// Answer the next call with a non-zero result code and `message`
    pub fn reject_next(&self, message: &str) {
        self.fail_next(rejected(message));
    }

    /// Make the next call fail before reaching the server
    pub fn disconnect_next(&self) {
        self.fail_next(ApiError::RequestFailed("connection refused".to_string()));
    }

    /// Every call received so far, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Todolists currently on the server
    #[must_use]
    pub fn todolists(&self) -> Vec<Todolist> {
        self.lock().todolists.clone()
    }

    /// Tasks of one todolist currently on the server
    #[must_use]
    pub fn tasks(&self, todolist_id: &str) -> Option<Vec<Task>> {
        self.lock().tasks.get(todolist_id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `call`, then answer it with `handler` unless a failure is scripted
    fn respond<T, F>(&self, call: ApiCall, handler: F) -> ApiFuture<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut ServerState) -> Result<T, ApiError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let latency = {
                let mut state = inner.lock().unwrap_or_else(PoisonError::into_inner);
                state.calls.push(call);
                state.latency
            };

            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }

            let mut state = inner.lock().unwrap_or_else(PoisonError::into_inner);
            match state.failures.pop_front() {
                Some(error) => Err(error),
                None => handler(&mut state),
            }
        })
    }
}

impl TodolistApi for MockTodolistApi {
    fn me(&self) -> ApiFuture<MeData> {
        self.respond(ApiCall::Me, |state| {
            if !state.logged_in {
                return Err(rejected("You are not authorized"));
            }
            let email = state
                .account
                .as_ref()
                .map_or_else(|| "user@example.com".to_string(), |(email, _)| email.clone());
            let login = email.split('@').next().unwrap_or_default().to_string();
            Ok(MeData {
                id: USER_ID,
                email,
                login,
            })
        })
    }

    fn login(&self, params: LoginParams) -> ApiFuture<LoginData> {
        let call = ApiCall::Login {
            email: params.email.clone(),
        };
        self.respond(call, move |state| {
            let accepted = state
                .account
                .as_ref()
                .is_none_or(|(email, password)| *email == params.email && *password == params.password);
            if accepted {
                state.logged_in = true;
                Ok(LoginData { user_id: USER_ID })
            } else {
                Err(rejected("Incorrect Email or Password"))
            }
        })
    }

    fn logout(&self) -> ApiFuture<()> {
        self.respond(ApiCall::Logout, |state| {
            state.logged_in = false;
            Ok(())
        })
    }

    fn get_todolists(&self) -> ApiFuture<Vec<Todolist>> {
        self.respond(ApiCall::GetTodolists, |state| Ok(state.todolists.clone()))
    }

    fn create_todolist(&self, title: &str) -> ApiFuture<Todolist> {
        let title = title.to_string();
        let call = ApiCall::CreateTodolist { title: title.clone() };
        self.respond(call, move |state| {
            validate_title(&title)?;
            Ok(state.insert_todolist(&title))
        })
    }

    fn update_todolist_title(&self, todolist_id: &str, title: &str) -> ApiFuture<()> {
        let todolist_id = todolist_id.to_string();
        let title = title.to_string();
        let call = ApiCall::UpdateTodolistTitle {
            todolist_id: todolist_id.clone(),
            title: title.clone(),
        };
        self.respond(call, move |state| {
            validate_title(&title)?;
            let todolist = state
                .todolists
                .iter_mut()
                .find(|t| t.id == todolist_id)
                .ok_or_else(|| rejected("Todolist not found"))?;
            todolist.title = title;
            Ok(())
        })
    }

    fn delete_todolist(&self, todolist_id: &str) -> ApiFuture<()> {
        let todolist_id = todolist_id.to_string();
        let call = ApiCall::DeleteTodolist {
            todolist_id: todolist_id.clone(),
        };
        self.respond(call, move |state| {
            let before = state.todolists.len();
            state.todolists.retain(|t| t.id != todolist_id);
            if state.todolists.len() == before {
                return Err(rejected("Todolist not found"));
            }
            state.tasks.remove(&todolist_id);
            Ok(())
        })
    }

    fn get_tasks(&self, todolist_id: &str) -> ApiFuture<Vec<Task>> {
        let todolist_id = todolist_id.to_string();
        let call = ApiCall::GetTasks {
            todolist_id: todolist_id.clone(),
        };
        self.respond(call, move |state| {
            state
                .tasks
                .get(&todolist_id)
                .cloned()
                .ok_or_else(|| rejected("Todolist not found"))
        })
    }

    fn create_task(&self, todolist_id: &str, title: &str) -> ApiFuture<Task> {
        let todolist_id = todolist_id.to_string();
        let title = title.to_string();
        let call = ApiCall::CreateTask {
            todolist_id: todolist_id.clone(),
            title: title.clone(),
        };
        self.respond(call, move |state| {
            validate_title(&title)?;
            state
                .insert_task(&todolist_id, &title)
                .ok_or_else(|| rejected("Todolist not found"))
        })
    }

    fn update_task(
        &self,
        todolist_id: &str,
        task_id: &str,
        model: UpdateTaskModel,
    ) -> ApiFuture<Task> {
        let todolist_id = todolist_id.to_string();
        let task_id = task_id.to_string();
        let call = ApiCall::UpdateTask {
            todolist_id: todolist_id.clone(),
            task_id: task_id.clone(),
            model: model.clone(),
        };
        self.respond(call, move |state| {
            validate_title(&model.title)?;
            let task = state
                .tasks
                .get_mut(&todolist_id)
                .and_then(|tasks| tasks.iter_mut().find(|t| t.id == task_id))
                .ok_or_else(|| rejected("Task not found"))?;
            task.title = model.title;
            task.description = model.description;
            task.status = model.status;
            task.priority = model.priority;
            task.start_date = model.start_date;
            task.deadline = model.deadline;
            Ok(task.clone())
        })
    }

    fn delete_task(&self, todolist_id: &str, task_id: &str) -> ApiFuture<()> {
        let todolist_id = todolist_id.to_string();
        let task_id = task_id.to_string();
        let call = ApiCall::DeleteTask {
            todolist_id: todolist_id.clone(),
            task_id: task_id.clone(),
        };
        self.respond(call, move |state| {
            let tasks = state
                .tasks
                .get_mut(&todolist_id)
                .ok_or_else(|| rejected("Todolist not found"))?;
            let before = tasks.len();
            tasks.retain(|t| t.id != task_id);
            if tasks.len() == before {
                return Err(rejected("Task not found"));
            }
            Ok(())
        })
    }
}
