//! Chat session records

use crate::models::message::Message;
use crate::models::Metadata;
use serde::{Deserialize, Serialize};

/// Opaque server-assigned chat session identifier
pub type SessionId = String;

/// A conversation thread with an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique identifier for the session
    pub id: SessionId,
    /// Agent the session talks to
    pub agent_id: String,
    /// User who owns the session
    pub user_id: String,
    /// Session title
    #[serde(default)]
    pub title: String,
    /// Messages in the session, if the server included them
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Server-formatted creation timestamp
    pub created_at: String,
    /// Server-formatted update timestamp
    pub updated_at: String,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: Metadata,
}

/// Body of `POST /agents/{id}/sessions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Optional title; the server picks one when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
