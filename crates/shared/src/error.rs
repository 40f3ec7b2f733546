use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// `{ "error": "..." }` body returned by the analysis service on failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    /// Extracts the error message from an arbitrary JSON body, if it carries one.
    pub fn from_value(value: &Value) -> Option<String> {
        match value.get("error")? {
            Value::Null => None,
            Value::String(message) => Some(message.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Backend message when present, otherwise `fallback`.
    pub fn from_body(body: Option<&Value>, fallback: &str) -> Self {
        let message = body
            .and_then(ErrorBody::from_value)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        Self { message }
    }
}

impl From<ServiceError> for ErrorBody {
    fn from(value: ServiceError) -> Self {
        Self {
            error: Some(value.message),
        }
    }
}
