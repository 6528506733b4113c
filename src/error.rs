//! Error types for the agent service client
//!
//! One enum covers both halves of the client. The request executor uses
//! [`ClientError::is_transient`] to decide which failures are worth another
//! attempt.

use std::time::Duration;
use thiserror::Error;

/// Errors returned by the request executor and the event stream
#[derive(Error, Debug)]
pub enum ClientError {
    /// The HTTP call could not be completed (connection refused, DNS,
    /// body read interrupted)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A single attempt did not complete within the configured timeout
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The server answered with a non-success status, or with a success
    /// status whose envelope reported `success: false`
    #[error("{message}")]
    Api {
        /// HTTP status code observed on the response
        status: u16,
        /// Message extracted from the envelope, or synthesized from the status
        message: String,
    },

    /// A success response body was not a valid envelope, or its `data`
    /// did not have the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// `send` was called while the event stream was not open
    #[error("Event stream is not connected")]
    NotConnected,

    /// A request body or outbound frame could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A URL or header value derived from configuration or credentials
    /// is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The WebSocket handshake or transport failed
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

impl ClientError {
    /// Whether this failure may succeed if the same request is attempted again
    ///
    /// Timeouts, transport failures, server errors (5xx) and rate limiting
    /// (429) qualify. Client-side rejections and local errors do not.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Transport(_) | ClientError::Timeout(_) => true,
            ClientError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Whether this failure came from a physical request attempt
    ///
    /// Local failures (encoding, configuration, stream state) happen before
    /// or outside any attempt and are never retried.
    pub fn is_attempt_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_)
                | ClientError::Timeout(_)
                | ClientError::Api { .. }
                | ClientError::Decode(_)
        )
    }

    /// HTTP status associated with this failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
