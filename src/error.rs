//! Failure envelope and error normalization
//!
//! Every failed operation collapses into a single [`ErrorResponse`] shape:
//! transport faults, non-2xx responses with structured bodies, non-2xx
//! responses with unparseable bodies, and undecodable success bodies all
//! normalize here. Normalization is total; it never raises further errors.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Result alias for AzamPay operations: a tagged union of the success
/// envelope and the canonical failure envelope.
pub type ApiResult<T> = std::result::Result<crate::types::ApiSuccess<T>, ErrorResponse>;

/// Fallback message when no response detail is available
pub const DEFAULT_ERROR_MESSAGE: &str = "Internal server error";

/// Fallback error code when the server supplies none
pub const DEFAULT_ERROR_CODE: &str = "FAILED";

/// Fallback HTTP status when no response was received
pub const DEFAULT_ERROR_STATUS: u16 = 400;

// JSON has no cycles, but the flattener still refuses to recurse unbounded;
// past this depth values are stringified as raw JSON.
const MAX_FLATTEN_DEPTH: usize = 32;

/// Canonical failure envelope returned by every AzamPay operation
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[error("{message} (code: {code}, status: {status_code})")]
pub struct ErrorResponse {
    /// Always `false`; the discriminant mirrored from the wire shape
    pub success: bool,
    /// Flattened human-readable message
    pub message: String,
    /// Raw server or transport detail, when it differs from `message`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Server-supplied error code, `"FAILED"` when absent
    pub code: String,
    /// HTTP status of the failed response, 400 when none was received
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Remaining fields of the structured server error body
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ErrorResponse {
    /// Build a failure envelope from explicit parts
    pub fn new(message: impl Into<String>, code: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
            code: code.into(),
            status_code,
            extra: Map::new(),
        }
    }

    /// Generic failure when nothing else matched
    pub fn internal() -> Self {
        Self::new(
            DEFAULT_ERROR_MESSAGE,
            DEFAULT_ERROR_CODE,
            DEFAULT_ERROR_STATUS,
        )
    }

    /// Normalize a non-2xx response into a failure envelope.
    ///
    /// A structured JSON body contributes its `errors`/`message` fields
    /// (flattened) plus any remaining fields in `extra`; anything else falls
    /// back to the raw body text or the HTTP reason phrase.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => Self::from_structured(status, map),
            _ => {
                let text = body.trim();
                let message = if text.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or(DEFAULT_ERROR_MESSAGE)
                        .to_string()
                } else {
                    text.to_string()
                };
                Self {
                    success: false,
                    message,
                    error: status.canonical_reason().map(str::to_string),
                    code: DEFAULT_ERROR_CODE.to_string(),
                    status_code: status.as_u16(),
                    extra: Map::new(),
                }
            }
        }
    }

    fn from_structured(status: StatusCode, map: Map<String, Value>) -> Self {
        let message = map
            .get("errors")
            .map(flatten_error_message)
            .or_else(|| map.get("message").map(flatten_error_message))
            .filter(|m| !m.is_empty())
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());

        let error = map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| status.canonical_reason().map(str::to_string));

        let code = map
            .get("code")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_ERROR_CODE)
            .to_string();

        Self {
            success: false,
            message,
            error,
            code,
            status_code: status.as_u16(),
            extra: map,
        }
    }

    /// Normalize a transport-level fault (no usable response).
    ///
    /// Connection and timeout faults report the generic
    /// `"Internal server error"` message; the raw fault text is preserved in
    /// `error` for diagnostics.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        let status_code = err
            .status()
            .map(|s| s.as_u16())
            .unwrap_or(DEFAULT_ERROR_STATUS);

        let message = if err.is_connect() || err.is_timeout() || err.is_request() {
            DEFAULT_ERROR_MESSAGE.to_string()
        } else {
            err.to_string()
        };

        tracing::warn!(status = status_code, error = %err, "transport fault");

        Self {
            success: false,
            message,
            error: Some(err.to_string()),
            code: DEFAULT_ERROR_CODE.to_string(),
            status_code,
            extra: Map::new(),
        }
    }

    /// Normalize an undecodable success body
    pub fn from_decode(err: &serde_json::Error) -> Self {
        Self {
            success: false,
            message: format!("Unexpected response body: {}", err),
            error: Some(err.to_string()),
            code: DEFAULT_ERROR_CODE.to_string(),
            status_code: DEFAULT_ERROR_STATUS,
            extra: Map::new(),
        }
    }
}

/// Flatten a structured server error value into one human-readable string.
///
/// Depth-first over nested mappings: sequence elements and mapping values are
/// joined with `", "` in insertion order, scalars are stringified, nulls are
/// dropped. Terminates on arbitrarily nested input.
pub fn flatten_error_message(value: &Value) -> String {
    flatten_at(value, 0)
}

fn flatten_at(value: &Value, depth: usize) -> String {
    if depth >= MAX_FLATTEN_DEPTH {
        return value.to_string();
    }
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| flatten_at(item, depth + 1))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .values()
            .map(|item| flatten_at(item, depth + 1))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
