//! Auth slice

use crate::app_status::RequestStatus;
use crate::environment::{request, TodolistEnvironment};
use crate::errors::{handle_request_error, RequestError};
use crate::root::{RootAction, RootState};
use serde::{Deserialize, Serialize};
use todolist_api::{FieldError, LoginData, LoginParams};
use todolist_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use todolist_macros::Action;

// ============================================================================
// State
// ============================================================================

/// Structured reason a login was refused, for rendering per-field errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRejection {
    /// Human-readable messages
    pub messages: Vec<String>,
    /// Per-field errors
    pub fields_errors: Vec<FieldError>,
}

/// Auth slice state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    /// Whether the session is logged in
    pub is_logged_in: bool,
    /// Why the most recent login attempt was refused, cleared on the next attempt
    pub last_rejection: Option<LoginRejection>,
}

impl AuthState {
    /// Set the logged-in flag
    pub const fn set_logged_in(&mut self, is_logged_in: bool) {
        self.is_logged_in = is_logged_in;
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions for the auth slice
#[derive(Action, Clone, Debug, PartialEq)]
#[action(slice = "auth")]
pub enum AuthAction {
    /// Exchange credentials for a session
    #[thunk]
    Login(LoginParams),

    /// End the session
    #[thunk]
    Logout,

    /// Outcome of [`AuthAction::Login`]
    #[settled]
    LoggedIn(Result<LoginData, RequestError>),

    /// Outcome of [`AuthAction::Logout`]
    #[settled]
    LoggedOut(Result<(), RequestError>),

    /// Set the logged-in flag directly
    SetLoggedIn(bool),
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the auth slice
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthReducer;

impl AuthReducer {
    #[tracing::instrument(skip_all, name = "login", fields(email = %params.email))]
    fn login(
        state: &mut RootState,
        params: LoginParams,
        env: &TodolistEnvironment,
    ) -> Effect<RootAction> {
        state.auth.last_rejection = None;
        state.app.set_status(RequestStatus::Loading);
        request(env.api().login(params), |result| AuthAction::LoggedIn(result).into())
    }

    fn logged_in(state: &mut RootState, result: Result<LoginData, RequestError>) {
        match result {
            Ok(data) => {
                tracing::info!(user_id = data.user_id, "Logged in");
                state.auth.set_logged_in(true);
                state.app.set_error(None);
                state.app.set_status(RequestStatus::Succeeded);
            },
            Err(error) => {
                if let RequestError::Domain {
                    messages,
                    fields_errors,
                } = &error
                {
                    state.auth.last_rejection = Some(LoginRejection {
                        messages: messages.clone(),
                        fields_errors: fields_errors.clone(),
                    });
                }
                handle_request_error(&mut state.app, &error);
            },
        }
    }
}

impl Reducer for AuthReducer {
    type State = RootState;
    type Action = RootAction;
    type Environment = TodolistEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let RootAction::Auth(action) = action else {
            return SmallVec::new();
        };

        match action {
            AuthAction::Login(params) => smallvec![Self::login(state, params, env)],
            AuthAction::LoggedIn(result) => {
                Self::logged_in(state, result);
                SmallVec::new()
            },
            AuthAction::Logout => {
                state.app.set_status(RequestStatus::Loading);
                smallvec![request(env.api().logout(), |result| {
                    AuthAction::LoggedOut(result).into()
                })]
            },
            AuthAction::LoggedOut(Ok(())) => {
                tracing::info!("Logged out");
                state.auth.set_logged_in(false);
                state.app.set_status(RequestStatus::Succeeded);
                SmallVec::new()
            },
            AuthAction::LoggedOut(Err(error)) => {
                handle_request_error(&mut state.app, &error);
                SmallVec::new()
            },
            AuthAction::SetLoggedIn(is_logged_in) => {
                state.auth.set_logged_in(is_logged_in);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use todolist_testing::{assertions, run_to_settled, MockTodolistApi, ReducerTest};

    fn env() -> TodolistEnvironment {
        TodolistEnvironment::new(MockTodolistApi::new())
    }

    fn logged_in_state() -> RootState {
        let mut state = RootState::default();
        state.auth.set_logged_in(true);
        state
    }

    #[test]
    fn test_login_sets_loading_and_clears_previous_rejection() {
        let mut state = RootState::default();
        state.auth.last_rejection = Some(LoginRejection {
            messages: vec!["bad password".to_string()],
            fields_errors: Vec::new(),
        });

        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(state)
            .when_action(AuthAction::Login(LoginParams::new("a@b.c", "secret", false)).into())
            .then_state(|state| {
                assert_eq!(state.app.status, RequestStatus::Loading);
                assert_eq!(state.auth.last_rejection, None);
                assert!(!state.auth.is_logged_in);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_successful_login_clears_error() {
        let mut state = RootState::default();
        state.app.set_error(Some("bad password".to_string()));

        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(state)
            .when_action(AuthAction::LoggedIn(Ok(LoginData { user_id: 7 })).into())
            .then_state(|state| {
                assert!(state.auth.is_logged_in);
                assert_eq!(state.app.error, None);
                assert_eq!(state.app.status, RequestStatus::Succeeded);
            })
            .run();
    }

    #[test]
    fn test_rejected_login_records_structured_error() {
        let error = RequestError::Domain {
            messages: vec!["bad password".to_string()],
            fields_errors: vec![FieldError {
                field: "password".to_string(),
                error: "invalid".to_string(),
            }],
        };

        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(RootState::default())
            .when_action(AuthAction::LoggedIn(Err(error)).into())
            .then_state(|state| {
                assert!(!state.auth.is_logged_in);
                assert_eq!(state.app.status, RequestStatus::Failed);
                assert!(state.app.error.as_deref().unwrap().contains("bad password"));
                let rejection = state.auth.last_rejection.as_ref().unwrap();
                assert_eq!(rejection.fields_errors[0].field, "password");
            })
            .run();
    }

    #[test]
    fn test_login_transport_failure_keeps_flag() {
        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(logged_in_state())
            .when_action(AuthAction::LoggedIn(Err(RequestError::transport("timeout"))).into())
            .then_state(|state| {
                assert!(state.auth.is_logged_in);
                assert_eq!(state.auth.last_rejection, None);
                assert_eq!(state.app.status, RequestStatus::Failed);
            })
            .run();
    }

    #[test]
    fn test_logout_success_clears_flag() {
        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(logged_in_state())
            .when_action(AuthAction::LoggedOut(Ok(())).into())
            .then_state(|state| {
                assert!(!state.auth.is_logged_in);
                assert_eq!(state.app.status, RequestStatus::Succeeded);
            })
            .run();
    }

    #[test]
    fn test_failed_logout_stays_logged_in() {
        ReducerTest::new(AuthReducer)
            .with_env(env())
            .given_state(logged_in_state())
            .when_action(AuthAction::LoggedOut(Err(RequestError::rejected("nope"))).into())
            .then_state(|state| {
                assert!(state.auth.is_logged_in);
                assert_eq!(state.app.status, RequestStatus::Failed);
            })
            .run();
    }

    #[tokio::test]
    async fn test_login_round_trip_against_mock() {
        let api = MockTodolistApi::new().with_account("free@samuraijs.com", "free");
        let env = TodolistEnvironment::new(api.clone());
        let mut state = RootState::default();

        let params = LoginParams::new("free@samuraijs.com", "wrong", false);
        run_to_settled(&AuthReducer, &mut state, AuthAction::Login(params).into(), &env).await;
        assert!(!state.auth.is_logged_in);
        assert!(state.auth.last_rejection.is_some());

        let params = LoginParams::new("free@samuraijs.com", "free", false);
        run_to_settled(&AuthReducer, &mut state, AuthAction::Login(params).into(), &env).await;
        assert!(state.auth.is_logged_in);
        assert!(api.is_logged_in());
        assert_eq!(state.app.error, None);
    }
}
