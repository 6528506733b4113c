//! Message records
//!
//! Messages exchanged with an agent, including tool calls the agent made.

use crate::models::Metadata;
use serde::{Deserialize, Serialize};

/// Opaque server-assigned message identifier
pub type MessageId = String;

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user
    User,
    /// Message from the agent
    Assistant,
    /// System instruction
    System,
    /// Result of a tool call
    Tool,
}

impl MessageRole {
    /// Convert the role to its wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
            MessageRole::Tool => "tool",
        }
    }
}

/// Function invocation inside a tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the tool being called
    pub name: String,
    /// JSON-encoded arguments, passed through as received
    pub arguments: String,
}

/// A tool call made by the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call identifier, referenced by the tool's reply
    pub id: String,
    /// Call kind; always "function" in this protocol
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    /// The function invocation
    pub function: FunctionCall,
}

fn function_kind() -> String {
    "function".to_string()
}

/// A single message in an agent conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for the message
    pub id: MessageId,
    /// Agent the message belongs to
    pub agent_id: String,
    /// User the conversation belongs to
    pub user_id: String,
    /// Role of the sender
    pub role: MessageRole,
    /// Text content, absent for pure tool-call messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tool calls made in this message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Tool call this message answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Server-formatted creation timestamp
    pub created_at: String,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: Metadata,
}

/// Body of `POST /agents/{id}/messages`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Message text
    pub content: String,
    /// Role of the sender
    pub role: MessageRole,
    /// Free-form metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl SendMessageRequest {
    /// A plain user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: MessageRole::User,
            metadata: None,
        }
    }
}

/// Optional filters for `GET /agents/{id}/messages`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageQuery {
    /// Only messages from this chat session
    pub session_id: Option<String>,
    /// Maximum number of messages to return
    pub limit: Option<u32>,
}

impl MessageQuery {
    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(session_id) = self.session_id.as_ref().filter(|v| !v.is_empty()) {
            pairs.push(("session_id".to_string(), session_id.clone()));
        }
        // A zero limit means "no limit" on the wire, same as leaving it out
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_message_decodes() {
        let json = r#"{
            "id": "m1",
            "agent_id": "a1",
            "user_id": "u1",
            "role": "assistant",
            "tool_calls": [{
                "id": "call-1",
                "type": "function",
                "function": {"name": "web_search", "arguments": "{\"q\":\"rust\"}"}
            }],
            "created_at": "2024-05-01T10:00:00Z"
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.content, None);
        let calls = message.tool_calls.unwrap();
        assert_eq!(calls[0].kind, "function");
        assert_eq!(calls[0].function.arguments, r#"{"q":"rust"}"#);
        assert!(message.metadata.is_empty());
    }

    #[test]
    fn test_message_query_pairs() {
        let query = MessageQuery {
            session_id: Some("s-9".to_string()),
            limit: Some(50),
        };
        assert_eq!(
            query.query_pairs(),
            vec![
                ("session_id".to_string(), "s-9".to_string()),
                ("limit".to_string(), "50".to_string()),
            ]
        );
        let zero = MessageQuery {
            session_id: None,
            limit: Some(0),
        };
        assert!(zero.query_pairs().is_empty());
    }
}
