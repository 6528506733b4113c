//! Agent records
//!
//! Defines the agent resource and the request shapes used to create,
//! update and list agents.

use crate::models::memory::{MemoryBlock, NewMemoryBlock};
use crate::models::Metadata;
use serde::{Deserialize, Serialize};

/// Opaque server-assigned agent identifier
pub type AgentId = String;

/// Lifecycle status reported by the server for an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Agent is available for conversations
    Active,
    /// Agent exists but is not serving
    Inactive,
    /// Agent is being trained
    Training,
    /// Agent is in an error state
    Error,
    /// Status value this client does not recognize
    #[serde(other)]
    Unknown,
}

/// A stateful agent hosted on the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier for the agent
    pub id: AgentId,
    /// Display name of the agent
    pub name: String,
    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// LLM model backing the agent
    pub model: String,
    /// Embedding model used for archival memory
    pub embedding_model: String,
    /// Core memory blocks attached to the agent
    #[serde(default)]
    pub memory_blocks: Vec<MemoryBlock>,
    /// Names of the tools the agent may call
    #[serde(default)]
    pub tools: Vec<String>,
    /// System prompt, if overridden
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Server-formatted creation timestamp (passed through verbatim)
    pub created_at: String,
    /// Server-formatted update timestamp (passed through verbatim)
    pub updated_at: String,
    /// Owning user
    pub user_id: String,
    /// Owning organization, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Current lifecycle status
    pub status: AgentStatus,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: Metadata,
}

/// Body of `POST /agents`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    /// Name for the new agent
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// LLM model to back the agent
    pub model: String,
    /// Embedding model for archival memory
    pub embedding_model: String,
    /// Initial memory blocks
    #[serde(default)]
    pub memory_blocks: Vec<NewMemoryBlock>,
    /// Tool names to enable
    #[serde(default)]
    pub tools: Vec<String>,
    /// System prompt override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Free-form metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Body of `PATCH /agents/{id}`; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentUpdate {
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New LLM model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// New embedding model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
    /// Replacement tool list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
    /// New system prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// New status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AgentStatus>,
    /// Replacement metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Optional filters for `GET /agents`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentListFilter {
    /// Only agents owned by this user
    pub user_id: Option<String>,
    /// Only agents in this organization
    pub organization_id: Option<String>,
}

impl AgentListFilter {
    /// Filter on the owning user
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            organization_id: None,
        }
    }

    /// Query pairs for the set filters, in wire order
    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(user_id) = self.user_id.as_ref().filter(|v| !v.is_empty()) {
            pairs.push(("user_id".to_string(), user_id.clone()));
        }
        if let Some(org) = self.organization_id.as_ref().filter(|v| !v.is_empty()) {
            pairs.push(("organization_id".to_string(), org.clone()));
        }
        pairs
    }
}
