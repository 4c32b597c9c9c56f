use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";
const INVALID_TOKEN_MESSAGE: &str = "Given token not valid";
const INVALID_TOKEN_CODE: &str = "token_not_valid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    RequestFailed,
    Http,
    SessionExpired,
    Validation,
    Parse,
    Storage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{error}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<ApiError> for String {
    fn from(error: ApiError) -> Self {
        error.error
    }
}

impl ApiError {
    fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            error: msg.into(),
            status: None,
            details: None,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, msg)
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestFailed, msg)
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, msg)
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, msg)
    }

    pub fn session_expired() -> Self {
        Self::new(ErrorKind::SessionExpired, SESSION_EXPIRED_MESSAGE)
    }

    pub fn http(status: u16, msg: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(ErrorKind::Http, msg)
        }
    }

    /// Builds the error for a non-success response from its raw body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let details = serde_json::from_slice::<Value>(body.as_bytes()).ok();
        let error = match &details {
            Some(value) => extract_error_message(value).unwrap_or_else(|| generic_message(status)),
            None if !body.trim().is_empty() => body.to_string(),
            None => generic_message(status),
        };
        Self {
            details,
            ..Self::http(status, error)
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::Http
            && (self.status == Some(404) || self.error.to_lowercase().contains("not found"))
    }

    pub fn is_auth_failure(&self) -> bool {
        if self.kind != ErrorKind::Http {
            return false;
        }
        let invalid_token_code = self
            .details
            .as_ref()
            .and_then(|d| d.get("code"))
            .and_then(Value::as_str)
            == Some(INVALID_TOKEN_CODE);
        self.status == Some(401) || self.error.contains(INVALID_TOKEN_MESSAGE) || invalid_token_code
    }

    pub fn is_session_expired(&self) -> bool {
        self.kind == ErrorKind::SessionExpired
    }
}

fn generic_message(status: u16) -> String {
    format!("HTTP error status {status}")
}

fn message_from(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let joined = join_messages(items.iter());
            (!joined.is_empty()).then_some(joined)
        }
        other => Some(other.to_string()),
    }
}

fn join_messages<'a>(values: impl Iterator<Item = &'a Value>) -> String {
    values
        .filter_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Picks the human-readable message out of a JSON error body.
///
/// Order: `detail`, `error`, `message`, a bare JSON string, `non_field_errors`,
/// then every first-level value flattened one level.
pub fn extract_error_message(body: &Value) -> Option<String> {
    for key in ["detail", "error", "message"] {
        if let Some(msg) = body.get(key).and_then(message_from) {
            return Some(msg);
        }
    }
    if let Value::String(s) = body {
        return (!s.is_empty()).then(|| s.clone());
    }
    if let Some(msg) = body.get("non_field_errors").and_then(message_from) {
        return Some(msg);
    }
    let first_level: Vec<&Value> = match body {
        Value::Object(map) => map.values().collect(),
        Value::Array(items) => items.iter().collect(),
        _ => Vec::new(),
    };
    let flattened: Vec<&Value> = first_level
        .into_iter()
        .flat_map(|v| match v {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![other],
        })
        .collect();
    let joined = join_messages(flattened.into_iter());
    (!joined.is_empty()).then_some(joined)
}
