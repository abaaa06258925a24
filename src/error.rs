//! Result protocol — the uniform envelope every API operation returns.
//!
//! Nothing in this crate surfaces a transport or HTTP failure as a panic or
//! a bare `Err` crossing the client boundary: every operation resolves to an
//! [`ApiResult`], and callers branch on [`ApiResult::is_success`] /
//! [`ApiResult::is_error`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Error code for transport-level failures (unreachable host, DNS, timeout).
pub const CODE_NETWORK_ERROR: &str = "NETWORK_ERROR";

/// Error code for a 401 response. Receiving one also clears the session token.
pub const CODE_UNAUTHORIZED: &str = "UNAUTHORIZED";

const MSG_NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";
const MSG_UNAUTHORIZED: &str = "Your session has expired. Please log in again.";
const MSG_GENERIC: &str = "Something went wrong. Please try again.";

/// A surfaced API error: human-readable message plus a stable code the UI
/// can branch on (`NETWORK_ERROR`, `UNAUTHORIZED`, `HTTP_<status>`, or a
/// server-supplied code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub message: String,
    pub code: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
        }
    }

    /// Transport-level failure. Also covers unparseable response bodies,
    /// which the original client folded into the same catch-all.
    pub fn network() -> Self {
        Self::new(MSG_NETWORK_ERROR, CODE_NETWORK_ERROR)
    }

    pub fn unauthorized() -> Self {
        Self::new(MSG_UNAUTHORIZED, CODE_UNAUTHORIZED)
    }

    /// Non-2xx response: message from the body's `message`/`detail` field
    /// when present, code from the body's `code` else `HTTP_<status>`.
    pub fn from_status(status: u16, body: &Value) -> Self {
        let message = body
            .get("message")
            .or_else(|| body.get("detail"))
            .and_then(Value::as_str)
            .unwrap_or(MSG_GENERIC)
            .to_string();
        let code = body
            .get("code")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| format!("HTTP_{status}"));
        Self { message, code }
    }
}

/// The envelope returned by every operation: exactly one of a payload or an
/// error. Serializes as `{"data": ...}` / `{"error": {...}}`, matching the
/// wire shape of the web client it replaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiResult<T> {
    Data(T),
    Error(ApiError),
}

impl<T> ApiResult<T> {
    /// Discriminator: carries a payload.
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Data(_))
    }

    /// Discriminator: carries an error.
    pub fn is_error(&self) -> bool {
        matches!(self, ApiResult::Error(_))
    }

    /// Consume into the payload, discarding an error.
    pub fn data(self) -> Option<T> {
        match self {
            ApiResult::Data(data) => Some(data),
            ApiResult::Error(_) => None,
        }
    }

    /// Consume into the error, discarding a payload.
    pub fn error(self) -> Option<ApiError> {
        match self {
            ApiResult::Data(_) => None,
            ApiResult::Error(err) => Some(err),
        }
    }

    pub fn as_data(&self) -> Option<&T> {
        match self {
            ApiResult::Data(data) => Some(data),
            ApiResult::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ApiError> {
        match self {
            ApiResult::Data(_) => None,
            ApiResult::Error(err) => Some(err),
        }
    }

    /// Convert into a plain `Result` for callers that prefer `?`.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            ApiResult::Data(data) => Ok(data),
            ApiResult::Error(err) => Err(err),
        }
    }
}

impl ApiResult<Value> {
    /// Deserialize the raw JSON payload into a typed result. A payload that
    /// does not match the expected shape folds into the network-error
    /// catch-all, same as an unparseable body.
    pub fn decode<T: DeserializeOwned>(self) -> ApiResult<T> {
        match self {
            ApiResult::Data(value) => match serde_json::from_value(value) {
                Ok(data) => ApiResult::Data(data),
                Err(err) => {
                    debug!(error = %err, "Response payload did not match expected shape");
                    ApiResult::Error(ApiError::network())
                }
            },
            ApiResult::Error(err) => ApiResult::Error(err),
        }
    }
}

impl<T> From<ApiError> for ApiResult<T> {
    fn from(err: ApiError) -> Self {
        ApiResult::Error(err)
    }
}
