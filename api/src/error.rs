//! Error types for the todolist API client

use crate::types::FieldError;
use thiserror::Error;

/// Errors that can occur when talking to the todolist API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connection, TLS, ...)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The server answered with a non-2xx HTTP status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The server answered with a non-zero result code
    #[error("Rejected by server (result code {result_code}): {}", .messages.join("; "))]
    Rejected {
        /// Result code from the response envelope
        result_code: i32,
        /// Human-readable messages, first one is the most relevant
        messages: Vec<String>,
        /// Per-field validation errors
        fields_errors: Vec<FieldError>,
    },
}

impl ApiError {
    /// Returns true if the server understood the request and refused it
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
