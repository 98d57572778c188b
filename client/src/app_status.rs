//! App status slice
//!
//! Holds the single global request status, the last error shown to the user
//! and whether the initial session probe has finished. Every request writes
//! the same status field, so overlapping requests overwrite each other and
//! the last one to settle wins.

use crate::environment::{request, TodolistEnvironment};
use crate::errors::RequestError;
use crate::root::{RootAction, RootState};
use serde::{Deserialize, Serialize};
use todolist_api::MeData;
use todolist_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use todolist_macros::Action;

// ============================================================================
// State
// ============================================================================

/// Progress of a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Nothing in flight
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request succeeded
    Succeeded,
    /// The last request failed
    Failed,
}

/// App status slice state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Global request status
    pub status: RequestStatus,
    /// Last error to show, if any
    pub error: Option<String>,
    /// Whether the session probe has finished
    pub is_initialized: bool,
}

impl AppState {
    /// Set the global request status
    pub const fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
    }

    /// Set or clear the error message
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Set the initialized flag
    pub const fn set_initialized(&mut self, is_initialized: bool) {
        self.is_initialized = is_initialized;
    }

    /// Returns true while a request is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, RequestStatus::Loading)
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions for the app status slice
#[derive(Action, Clone, Debug, PartialEq)]
#[action(slice = "app")]
pub enum AppAction {
    /// Probe the current session, then mark the app initialized
    #[thunk]
    Initialize,

    /// Outcome of the session probe
    #[settled]
    Initialized(Result<MeData, RequestError>),

    /// Set the global request status
    SetStatus(RequestStatus),

    /// Set or clear the error message
    SetError(Option<String>),

    /// Set the initialized flag
    SetInitialized(bool),
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the app status slice
#[derive(Debug, Clone, Copy, Default)]
pub struct AppStatusReducer;

impl AppStatusReducer {
    #[tracing::instrument(skip_all, name = "initialize_app")]
    fn initialize(state: &mut RootState, env: &TodolistEnvironment) -> Effect<RootAction> {
        state.app.set_status(RequestStatus::Loading);
        request(env.api().me(), |result| AppAction::Initialized(result).into())
    }

    /// Apply the session probe outcome
    ///
    /// A rejected probe is a valid answer meaning "not logged in". A transport
    /// failure is swallowed: no error is shown and the app still becomes
    /// initialized so a logged-out view can render.
    fn initialized(state: &mut RootState, result: Result<MeData, RequestError>) {
        match result {
            Ok(me) => {
                tracing::info!(login = %me.login, "Session is active");
                state.auth.set_logged_in(true);
                state.app.set_status(RequestStatus::Succeeded);
            },
            Err(RequestError::Domain { messages, .. }) => {
                tracing::debug!(?messages, "No active session");
                state.app.set_status(RequestStatus::Succeeded);
            },
            Err(RequestError::Transport { message }) => {
                tracing::warn!(error = %message, "Session probe failed, continuing logged out");
                state.app.set_status(RequestStatus::Failed);
            },
        }
        state.app.set_initialized(true);
    }
}

impl Reducer for AppStatusReducer {
    type State = RootState;
    type Action = RootAction;
    type Environment = TodolistEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let RootAction::App(action) = action else {
            return SmallVec::new();
        };

        match action {
            AppAction::Initialize => smallvec![Self::initialize(state, env)],
            AppAction::Initialized(result) => {
                Self::initialized(state, result);
                SmallVec::new()
            },
            AppAction::SetStatus(status) => {
                state.app.set_status(status);
                SmallVec::new()
            },
            AppAction::SetError(error) => {
                state.app.set_error(error);
                SmallVec::new()
            },
            AppAction::SetInitialized(is_initialized) => {
                state.app.set_initialized(is_initialized);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use todolist_testing::{assertions, run_to_settled, ApiCall, MockTodolistApi, ReducerTest};

    fn me() -> MeData {
        MeData {
            id: 1,
            email: "free@samuraijs.com".to_string(),
            login: "free".to_string(),
        }
    }

    #[test]
    fn test_initialize_sets_loading_and_probes_session() {
        ReducerTest::new(AppStatusReducer)
            .with_env(TodolistEnvironment::new(MockTodolistApi::new()))
            .given_state(RootState::default())
            .when_action(AppAction::Initialize.into())
            .then_state(|state| {
                assert_eq!(state.app.status, RequestStatus::Loading);
                assert!(!state.app.is_initialized);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_positive_probe_logs_in() {
        ReducerTest::new(AppStatusReducer)
            .with_env(TodolistEnvironment::new(MockTodolistApi::new()))
            .given_state(RootState::default())
            .when_action(AppAction::Initialized(Ok(me())).into())
            .then_state(|state| {
                assert!(state.auth.is_logged_in);
                assert!(state.app.is_initialized);
                assert_eq!(state.app.status, RequestStatus::Succeeded);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_rejected_probe_initializes_logged_out() {
        ReducerTest::new(AppStatusReducer)
            .with_env(TodolistEnvironment::new(MockTodolistApi::new()))
            .given_state(RootState::default())
            .when_action(AppAction::Initialized(Err(RequestError::rejected("You are not authorized"))).into())
            .then_state(|state| {
                assert!(!state.auth.is_logged_in);
                assert!(state.app.is_initialized);
                assert_eq!(state.app.error, None);
                assert_eq!(state.app.status, RequestStatus::Succeeded);
            })
            .run();
    }

    #[test]
    fn test_transport_failure_is_swallowed() {
        ReducerTest::new(AppStatusReducer)
            .with_env(TodolistEnvironment::new(MockTodolistApi::new()))
            .given_state(RootState::default())
            .when_action(AppAction::Initialized(Err(RequestError::transport("connection reset"))).into())
            .then_state(|state| {
                assert!(state.app.is_initialized);
                assert!(!state.auth.is_logged_in);
                assert_eq!(state.app.error, None);
                assert!(!state.app.is_loading());
            })
            .run();
    }

    #[test]
    fn test_plain_transitions() {
        ReducerTest::new(AppStatusReducer)
            .with_env(TodolistEnvironment::new(MockTodolistApi::new()))
            .given_state(RootState::default())
            .when_action(AppAction::SetError(Some("boom".to_string())).into())
            .then_state(|state| assert_eq!(state.app.error.as_deref(), Some("boom")))
            .then_effects(assertions::assert_no_effects)
            .run();

        ReducerTest::new(AppStatusReducer)
            .with_env(TodolistEnvironment::new(MockTodolistApi::new()))
            .given_state(RootState::default())
            .when_action(AppAction::SetStatus(RequestStatus::Failed).into())
            .then_state(|state| assert_eq!(state.app.status, RequestStatus::Failed))
            .run();
    }

    #[test]
    fn test_ignores_other_slices() {
        ReducerTest::new(AppStatusReducer)
            .with_env(TodolistEnvironment::new(MockTodolistApi::new()))
            .given_state(RootState::default())
            .when_action(crate::auth::AuthAction::SetLoggedIn(true).into())
            .then_state(|state| assert_eq!(*state, RootState::default()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[tokio::test]
    async fn test_initialize_against_live_session() {
        let api = MockTodolistApi::new();
        api.set_logged_in(true);
        let env = TodolistEnvironment::new(api.clone());
        let mut state = RootState::default();

        let settled =
            run_to_settled(&AppStatusReducer, &mut state, AppAction::Initialize.into(), &env).await;
        assert_eq!(settled.len(), 1);

        assert!(state.auth.is_logged_in);
        assert!(state.app.is_initialized);
        assert_eq!(api.calls(), vec![ApiCall::Me]);
    }

    #[tokio::test]
    async fn test_initialize_when_server_unreachable() {
        let api = MockTodolistApi::new();
        api.disconnect_next();

        ReducerTest::new(AppStatusReducer)
            .with_env(TodolistEnvironment::new(api))
            .given_state(RootState::default())
            .when_action(AppAction::Initialize.into())
            .then_state(|state| assert_eq!(state.app.status, RequestStatus::Loading))
            .then_effects(|effects| assertions::assert_request_count(effects, 1))
            .then_settled_state(|state| {
                assert!(state.app.is_initialized);
                assert_eq!(state.app.status, RequestStatus::Failed);
                assert_eq!(state.app.error, None);
            })
            .run_settled()
            .await;
    }
}
