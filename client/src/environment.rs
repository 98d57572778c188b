//! Injected dependencies for the slice reducers

use crate::errors::RequestError;
use crate::root::RootAction;
use std::sync::Arc;
use todolist_api::{ApiFuture, TodolistApi};
use todolist_core::effect::Effect;

/// Environment shared by every slice reducer
///
/// Holds the API as a trait object so the production reqwest client and the
/// in-memory test double are interchangeable.
#[derive(Clone)]
pub struct TodolistEnvironment {
    api: Arc<dyn TodolistApi>,
}

impl TodolistEnvironment {
    /// Create an environment around an API implementation
    #[must_use]
    pub fn new(api: impl TodolistApi + 'static) -> Self {
        Self { api: Arc::new(api) }
    }

    /// The API thunks call
    #[must_use]
    pub fn api(&self) -> &dyn TodolistApi {
        self.api.as_ref()
    }
}

impl std::fmt::Debug for TodolistEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodolistEnvironment")
            .field("api", &"<dyn TodolistApi>")
            .finish()
    }
}

/// Describe a request whose outcome is fed back as a settled action
///
/// `settle` receives the response with transport and domain failures already
/// folded into [`RequestError`].
pub fn request<T, F>(call: ApiFuture<T>, settle: F) -> Effect<RootAction>
where
    T: Send + 'static,
    F: FnOnce(Result<T, RequestError>) -> RootAction + Send + 'static,
{
    Effect::future(async move {
        let result = call.await.map_err(RequestError::from);
        Some(settle(result))
    })
}
