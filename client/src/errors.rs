//! Request failures and the shared error routine
//!
//! Every thunk settles with a `Result<T, RequestError>`. Failures never leave
//! the reducer: they are written to the app slice by
//! [`handle_request_error`], which keeps the two failure kinds on separate
//! log and metric paths.

use crate::app_status::{AppState, RequestStatus};
use crate::root::RootState;
use todolist_api::{ApiError, FieldError};

/// Message shown when the server gave no usable message
pub const DEFAULT_ERROR_MESSAGE: &str = "Some error occurred";

/// Why a request failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The server answered with a non-zero result code
    #[error("request rejected: {}", .messages.join("; "))]
    Domain {
        /// Human-readable messages, most relevant first
        messages: Vec<String>,
        /// Per-field validation errors
        fields_errors: Vec<FieldError>,
    },

    /// No valid response was received
    #[error("network error: {message}")]
    Transport {
        /// Description of the failure
        message: String,
    },
}

impl RequestError {
    /// Build a domain rejection carrying a single message
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Domain {
            messages: vec![message.into()],
            fields_errors: Vec::new(),
        }
    }

    /// Build a transport failure
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

impl From<ApiError> for RequestError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Rejected {
                messages,
                fields_errors,
                ..
            } => Self::Domain {
                messages,
                fields_errors,
            },
            other => Self::Transport {
                message: other.to_string(),
            },
        }
    }
}

/// Record a domain rejection on the app slice
///
/// The error becomes the first message, or [`DEFAULT_ERROR_MESSAGE`] when the
/// server sent none.
pub fn handle_server_app_error(app: &mut AppState, messages: &[String]) {
    let message = messages
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());

    tracing::warn!(error = %message, "Request rejected by server");
    metrics::counter!("todolist.requests.domain_errors").increment(1);

    app.set_error(Some(message));
    app.set_status(RequestStatus::Failed);
}

/// Record a transport failure on the app slice
pub fn handle_server_network_error(app: &mut AppState, message: &str) {
    let message = if message.is_empty() {
        DEFAULT_ERROR_MESSAGE
    } else {
        message
    };

    tracing::error!(error = %message, "Request failed before a response was received");
    metrics::counter!("todolist.requests.network_errors").increment(1);

    app.set_error(Some(message.to_string()));
    app.set_status(RequestStatus::Failed);
}

/// Route a failed request to the matching error path
pub fn handle_request_error(app: &mut AppState, error: &RequestError) {
    match error {
        RequestError::Domain { messages, .. } => handle_server_app_error(app, messages),
        RequestError::Transport { message } => handle_server_network_error(app, message),
    }
}

/// Finish a request: run `apply` and mark success, or take the error path
///
/// `apply` only runs on success, so a failed request changes nothing but the
/// app slice.
pub(crate) fn settle<T>(
    state: &mut RootState,
    result: Result<T, RequestError>,
    apply: impl FnOnce(&mut RootState, T),
) {
    match result {
        Ok(value) => {
            apply(state, value);
            state.app.set_status(RequestStatus::Succeeded);
        },
        Err(error) => handle_request_error(&mut state.app, &error),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_becomes_domain_error() {
        let error = RequestError::from(ApiError::Rejected {
            result_code: 1,
            messages: vec!["bad password".to_string()],
            fields_errors: vec![FieldError {
                field: "password".to_string(),
                error: "too short".to_string(),
            }],
        });

        match error {
            RequestError::Domain {
                messages,
                fields_errors,
            } => {
                assert_eq!(messages, vec!["bad password".to_string()]);
                assert_eq!(fields_errors[0].field, "password");
            },
            RequestError::Transport { .. } => panic!("expected a domain error"),
        }
    }

    #[test]
    fn test_status_and_parse_failures_are_transport_errors() {
        let status = RequestError::from(ApiError::Status {
            status: 502,
            message: "bad gateway".to_string(),
        });
        let parse = RequestError::from(ApiError::ResponseParseFailed("eof".to_string()));

        assert!(matches!(status, RequestError::Transport { .. }));
        assert!(matches!(parse, RequestError::Transport { .. }));
    }

    #[test]
    fn test_app_error_uses_first_message() {
        let mut app = AppState::default();
        handle_server_app_error(&mut app, &["first".to_string(), "second".to_string()]);

        assert_eq!(app.error.as_deref(), Some("first"));
        assert_eq!(app.status, RequestStatus::Failed);
    }

    #[test]
    fn test_app_error_without_messages_uses_default() {
        let mut app = AppState::default();
        handle_server_app_error(&mut app, &[]);

        assert_eq!(app.error.as_deref(), Some(DEFAULT_ERROR_MESSAGE));
    }

    #[test]
    fn test_network_error_keeps_transport_message() {
        let mut app = AppState::default();
        handle_request_error(&mut app, &RequestError::transport("connection refused"));

        assert_eq!(app.error.as_deref(), Some("connection refused"));
        assert_eq!(app.status, RequestStatus::Failed);
    }

    #[test]
    fn test_empty_network_message_uses_default() {
        let mut app = AppState::default();
        handle_server_network_error(&mut app, "");

        assert_eq!(app.error.as_deref(), Some(DEFAULT_ERROR_MESSAGE));
    }
}
