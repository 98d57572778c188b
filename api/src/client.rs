//! Todolist API client implementation

use crate::{
    api::{ApiFuture, TodolistApi},
    error::ApiError,
    types::{
        ApiResponse, Item, LoginData, LoginParams, MeData, Task, TasksPage, Todolist,
        UpdateTaskModel,
    },
};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;

/// Default API root
pub const DEFAULT_API_URL: &str = "https://social-network.samuraijs.com/api/1.1";

/// Result code attached to a task page that came back with an `error` field
const TASKS_PAGE_ERROR_CODE: i32 = 1;

/// Todolist API client
///
/// Holds a cookie store, so a session established by [`TodolistApi::login`]
/// is reused by every later call made through the same client (or a clone).
#[derive(Clone)]
pub struct TodolistClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl TodolistClient {
    /// Create a client against the default API root
    ///
    /// # Errors
    ///
    /// Returns `ApiError::RequestFailed` if the HTTP client cannot be built
    pub fn new(api_key: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_url(DEFAULT_API_URL, api_key)
    }

    /// Create a client against an explicit API root
    ///
    /// # Errors
    ///
    /// Returns `ApiError::RequestFailed` if the HTTP client cannot be built
    pub fn with_url(api_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// API root this client talks to
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.api_url, path))
            .header("API-KEY", &self.api_key)
    }
}

/// Send a request and decode a 2xx JSON body
async fn fetch<D: DeserializeOwned>(request: RequestBuilder) -> Result<D, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

    let status = response.status();
    tracing::debug!(status = status.as_u16(), url = %response.url(), "API response");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: body,
        });
    }

    response
        .json::<D>()
        .await
        .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
}

/// Send a request whose body is an [`ApiResponse`] envelope and decode its payload
async fn fetch_data<D: DeserializeOwned>(request: RequestBuilder) -> Result<D, ApiError> {
    fetch::<ApiResponse>(request).await?.into_data()
}

/// Send a request whose body is an [`ApiResponse`] envelope with no payload
async fn fetch_unit(request: RequestBuilder) -> Result<(), ApiError> {
    fetch::<ApiResponse>(request).await?.into_unit()
}

impl TodolistApi for TodolistClient {
    fn me(&self) -> ApiFuture<MeData> {
        let request = self.request(Method::GET, "auth/me");
        Box::pin(fetch_data::<MeData>(request))
    }

    fn login(&self, params: LoginParams) -> ApiFuture<LoginData> {
        let request = self.request(Method::POST, "auth/login").json(&params);
        Box::pin(fetch_data::<LoginData>(request))
    }

    fn logout(&self) -> ApiFuture<()> {
        let request = self.request(Method::DELETE, "auth/login");
        Box::pin(fetch_unit(request))
    }

    fn get_todolists(&self) -> ApiFuture<Vec<Todolist>> {
        let request = self.request(Method::GET, "todo-lists");
        Box::pin(fetch::<Vec<Todolist>>(request))
    }

    fn create_todolist(&self, title: &str) -> ApiFuture<Todolist> {
        let request = self
            .request(Method::POST, "todo-lists")
            .json(&json!({ "title": title }));
        Box::pin(async move { fetch_data::<Item<Todolist>>(request).await.map(|data| data.item) })
    }

    fn update_todolist_title(&self, todolist_id: &str, title: &str) -> ApiFuture<()> {
        let request = self
            .request(Method::PUT, &format!("todo-lists/{todolist_id}"))
            .json(&json!({ "title": title }));
        Box::pin(fetch_unit(request))
    }

    fn delete_todolist(&self, todolist_id: &str) -> ApiFuture<()> {
        let request = self.request(Method::DELETE, &format!("todo-lists/{todolist_id}"));
        Box::pin(fetch_unit(request))
    }

    fn get_tasks(&self, todolist_id: &str) -> ApiFuture<Vec<Task>> {
        let request = self.request(Method::GET, &format!("todo-lists/{todolist_id}/tasks"));
        Box::pin(async move {
            let page = fetch::<TasksPage>(request).await?;
            match page.error {
                Some(error) => Err(ApiError::Rejected {
                    result_code: TASKS_PAGE_ERROR_CODE,
                    messages: vec![error],
                    fields_errors: Vec::new(),
                }),
                None => Ok(page.items),
            }
        })
    }

    fn create_task(&self, todolist_id: &str, title: &str) -> ApiFuture<Task> {
        let request = self
            .request(Method::POST, &format!("todo-lists/{todolist_id}/tasks"))
            .json(&json!({ "title": title }));
        Box::pin(async move { fetch_data::<Item<Task>>(request).await.map(|data| data.item) })
    }

    fn update_task(
        &self,
        todolist_id: &str,
        task_id: &str,
        model: UpdateTaskModel,
    ) -> ApiFuture<Task> {
        let request = self
            .request(Method::PUT, &format!("todo-lists/{todolist_id}/tasks/{task_id}"))
            .json(&model);
        Box::pin(async move { fetch_data::<Item<Task>>(request).await.map(|data| data.item) })
    }

    fn delete_task(&self, todolist_id: &str, task_id: &str) -> ApiFuture<()> {
        let request = self.request(Method::DELETE, &format!("todo-lists/{todolist_id}/tasks/{task_id}"));
        Box::pin(fetch_unit(request))
    }
}
