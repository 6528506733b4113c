//! Response envelope
//!
//! Every response body from the agent server is wrapped as
//! `{ success, data?, error?, message? }`. This module turns a status and
//! body into either the decoded `data` or a [`ClientError`].

use crate::error::ClientError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Fallback message for a rejected envelope that carries no `error`
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed";

/// Uniform wrapper around every response body
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// Whether the server considers the call successful
    #[serde(default)]
    pub success: bool,
    /// Payload; ignored unless `success` is true
    #[serde(default)]
    pub data: Option<Value>,
    /// Error description on failure
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    /// Unwrap the payload of a success-status response
    pub fn into_result<T: DeserializeOwned>(self, status: StatusCode) -> Result<T, ClientError> {
        if !self.success {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: non_empty(self.error)
                    .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            });
        }

        serde_json::from_value(self.data.unwrap_or(Value::Null))
            .map_err(|e| ClientError::Decode(format!("unexpected data shape: {}", e)))
    }
}

/// Turn an HTTP status and body into the decoded payload or a failure
pub fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ClientError> {
    if !status.is_success() {
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(status, body),
        });
    }

    let envelope: Envelope = serde_json::from_str(body).map_err(|e| {
        ClientError::Decode(format!("invalid envelope: {} - Response body: {}", e, body))
    })?;
    envelope.into_result(status)
}

/// Best-effort message for a non-success status
///
/// Prefers the envelope's `message`, then its `error`, then
/// `HTTP <code>: <reason>`.
pub fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Envelope>(body)
        .ok()
        .and_then(|envelope| non_empty(envelope.message).or_else(|| non_empty(envelope.error)))
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            )
        })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
