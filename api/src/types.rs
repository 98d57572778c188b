//! Wire types for the todolist API

use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Result code the server uses for a successful operation
pub const RESULT_CODE_SUCCESS: i32 = 0;

/// Per-field validation error from the response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending request field
    pub field: String,
    /// Validation message
    pub error: String,
}

/// Response envelope shared by every mutating endpoint
///
/// `data` stays untyped until the result code has been checked, since a
/// rejected request carries `{}` regardless of the success payload's shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    /// 0 on success, anything else is a rejection
    pub result_code: i32,
    /// Messages explaining a rejection
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<String>,
    /// Per-field validation errors
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields_errors: Vec<FieldError>,
    /// Payload, shaped per endpoint
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ApiResponse {
    /// Check the result code and decode the payload
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] for a non-zero result code and
    /// [`ApiError::ResponseParseFailed`] if the payload has the wrong shape.
    pub fn into_data<D: DeserializeOwned>(self) -> Result<D, ApiError> {
        if self.result_code != RESULT_CODE_SUCCESS {
            return Err(ApiError::Rejected {
                result_code: self.result_code,
                messages: self.messages,
                fields_errors: self.fields_errors,
            });
        }

        serde_json::from_value(self.data).map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
    }

    /// Check the result code of an endpoint whose payload carries nothing
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] for a non-zero result code.
    pub fn into_unit(self) -> Result<(), ApiError> {
        if self.result_code != RESULT_CODE_SUCCESS {
            return Err(ApiError::Rejected {
                result_code: self.result_code,
                messages: self.messages,
                fields_errors: self.fields_errors,
            });
        }
        Ok(())
    }
}

/// Payload of endpoints that return the created or updated record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item<T> {
    /// The record
    pub item: T,
}

/// A todolist as stored on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todolist {
    /// Server-assigned id
    pub id: String,
    /// Title
    pub title: String,
    /// Creation timestamp, ISO-8601 without offset
    pub added_date: String,
    /// Server-side ordering key
    pub order: i64,
}

/// Task progress, numeric-coded on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskStatus {
    /// Not started
    #[default]
    New,
    /// Being worked on
    InProgress,
    /// Done
    Completed,
    /// Not yet published
    Draft,
}

impl TryFrom<u8> for TaskStatus {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::New),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Draft),
            other => Err(UnknownCode { kind: "task status", code: other }),
        }
    }
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::New => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
            TaskStatus::Draft => 3,
        }
    }
}

/// Task priority, numeric-coded on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskPriority {
    /// Low
    #[default]
    Low,
    /// Middle
    Middle,
    /// High
    High,
    /// Urgent
    Urgent,
    /// Later
    Later,
}

impl TryFrom<u8> for TaskPriority {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Low),
            1 => Ok(Self::Middle),
            2 => Ok(Self::High),
            3 => Ok(Self::Urgent),
            4 => Ok(Self::Later),
            other => Err(UnknownCode { kind: "task priority", code: other }),
        }
    }
}

impl From<TaskPriority> for u8 {
    fn from(priority: TaskPriority) -> Self {
        match priority {
            TaskPriority::Low => 0,
            TaskPriority::Middle => 1,
            TaskPriority::High => 2,
            TaskPriority::Urgent => 3,
            TaskPriority::Later => 4,
        }
    }
}

/// A numeric code outside the known range of a wire enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code {code}")]
pub struct UnknownCode {
    kind: &'static str,
    code: u8,
}

/// A task as stored on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned id
    pub id: String,
    /// Owning todolist
    pub todo_list_id: String,
    /// Title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Progress
    pub status: TaskStatus,
    /// Priority
    pub priority: TaskPriority,
    /// Planned start
    #[serde(default)]
    pub start_date: Option<String>,
    /// Due date
    #[serde(default)]
    pub deadline: Option<String>,
    /// Server-side ordering key
    pub order: i64,
    /// Creation timestamp, ISO-8601 without offset
    pub added_date: String,
}

/// Full writable model of a task
///
/// The update endpoint replaces every writable field, so callers always send
/// all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskModel {
    /// Title
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Progress
    pub status: TaskStatus,
    /// Priority
    pub priority: TaskPriority,
    /// Planned start
    pub start_date: Option<String>,
    /// Due date
    pub deadline: Option<String>,
}

impl From<&Task> for UpdateTaskModel {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            start_date: task.start_date.clone(),
            deadline: task.deadline.clone(),
        }
    }
}

/// Response of the task listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksPage {
    /// Tasks of the requested todolist
    pub items: Vec<Task>,
    /// Total number of tasks on the server
    #[serde(default)]
    pub total_count: u64,
    /// Set when the server could not produce the page
    #[serde(default)]
    pub error: Option<String>,
}

/// Credentials for `auth/login`
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginParams {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// Keep the session cookie after the browser closes
    pub remember_me: bool,
    /// Captcha answer, required after repeated failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha: Option<String>,
}

impl LoginParams {
    /// Credentials without a captcha answer
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>, remember_me: bool) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            remember_me,
            captcha: None,
        }
    }
}

impl std::fmt::Debug for LoginParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginParams")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("remember_me", &self.remember_me)
            .field("captcha", &self.captcha)
            .finish()
    }
}

/// Payload of `auth/me`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MeData {
    /// User id
    pub id: i64,
    /// Account email
    pub email: String,
    /// Login name
    pub login: String,
}

/// Payload of `auth/login`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    /// Id of the user that logged in
    pub user_id: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_decodes_numeric_codes() {
        let task: Task = serde_json::from_value(json!({
            "id": "t-1",
            "todoListId": "tl-1",
            "title": "Buy milk",
            "description": null,
            "status": 2,
            "priority": 4,
            "startDate": null,
            "deadline": null,
            "order": 0,
            "addedDate": "2024-01-01T10:00:00"
        }))
        .unwrap();

        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.priority, TaskPriority::Later);
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_unknown_status_code_is_rejected() {
        let result = serde_json::from_value::<TaskStatus>(json!(7));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_model_serializes_camel_case() {
        let model = UpdateTaskModel {
            title: "Buy milk".into(),
            description: None,
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            start_date: Some("2024-01-02T00:00:00".into()),
            deadline: None,
        };

        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["status"], json!(1));
        assert_eq!(value["priority"], json!(2));
        assert_eq!(value["startDate"], json!("2024-01-02T00:00:00"));
        assert!(value["deadline"].is_null());
    }

    #[test]
    fn test_rejected_envelope_keeps_messages() {
        let response: ApiResponse = serde_json::from_value(json!({
            "resultCode": 1,
            "messages": ["Incorrect Email or Password"],
            "fieldsErrors": [{"field": "email", "error": "invalid"}],
            "data": {}
        }))
        .unwrap();

        match response.into_data::<LoginData>() {
            Err(ApiError::Rejected { result_code, messages, fields_errors }) => {
                assert_eq!(result_code, 1);
                assert_eq!(messages, vec!["Incorrect Email or Password".to_string()]);
                assert_eq!(fields_errors[0].field, "email");
            },
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_null_envelope_lists_read_as_empty() {
        let response: ApiResponse = serde_json::from_value(json!({
            "resultCode": 1,
            "messages": ["Incorrect Email or Password"],
            "fieldsErrors": null,
            "data": {}
        }))
        .unwrap();

        match response.into_data::<LoginData>() {
            Err(ApiError::Rejected { messages, fields_errors, .. }) => {
                assert_eq!(messages, vec!["Incorrect Email or Password".to_string()]);
                assert!(fields_errors.is_empty());
            },
            other => panic!("expected rejection, got {other:?}"),
        }

        let response: ApiResponse = serde_json::from_value(json!({
            "resultCode": 0,
            "messages": null,
            "data": {}
        }))
        .unwrap();
        assert!(response.into_unit().is_ok());
    }

    #[test]
    fn test_login_params_skip_missing_captcha() {
        let params = LoginParams::new("a@b.c", "secret", true);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["rememberMe"], json!(true));
        assert!(value.get("captcha").is_none());
        assert!(!format!("{params:?}").contains("secret"));
    }
}
