//! Stream frames
//!
//! One discrete unit on the event stream: `{ type, data, timestamp,
//! session_id? }`. The `type` string is the only routing key; a frame is
//! delivered whenever `type` is a string, whatever shape the metadata has.

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

/// Event types the server is known to send
///
/// Any other type string is still routed to its subscribers verbatim.
pub mod events {
    /// A chat message from or to an agent
    pub const MESSAGE: &str = "message";
    /// An agent's state changed
    pub const AGENT_UPDATE: &str = "agent_update";
    /// Server-sent error, or a transport error raised by the client
    pub const ERROR: &str = "error";
    /// Connection lifecycle (synthesized by the client)
    pub const CONNECTION: &str = "connection";
    /// Server keepalive
    pub const HEARTBEAT: &str = "heartbeat";

    /// All recognized event types
    pub const ALL: [&str; 5] = [MESSAGE, AGENT_UPDATE, ERROR, CONNECTION, HEARTBEAT];
}

/// A frame on the event stream
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StreamFrame {
    /// Routing key
    #[serde(rename = "type")]
    pub event_type: String,
    /// Payload handed to subscribers
    #[serde(default)]
    pub data: Value,
    /// Server-formatted timestamp (RFC 3339 for frames built locally).
    /// Numeric timestamps are kept as their decimal text; other non-string
    /// values decode as empty.
    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: String,
    /// Chat session the frame belongs to; non-string ids other than
    /// numbers decode as `None`
    #[serde(
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_id: Option<String>,
}

impl StreamFrame {
    /// Build an outbound frame stamped with the current UTC time
    pub fn new(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
            timestamp: Utc::now().to_rfc3339(),
            session_id: None,
        }
    }

    /// Scope the frame to a chat session
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Decode a frame from its wire form
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// Status reported in `connection` events
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// The stream is open
    Connected,
    /// The stream closed or failed
    Disconnected,
}

/// Payload of a synthesized `connection` event
pub(crate) fn connection_payload(status: ConnectionStatus) -> Value {
    json!({ "status": status })
}

/// Payload of a synthesized `error` event
pub(crate) fn error_payload(message: &str) -> Value {
    json!({ "error": message })
}

/// Read the status out of a `connection` event payload
pub fn connection_status(data: &Value) -> Option<ConnectionStatus> {
    serde_json::from_value(data.get("status")?.clone()).ok()
}
