//! Memory block records

use serde::{Deserialize, Serialize};

/// Opaque server-assigned memory block identifier
pub type BlockId = String;

/// A block of an agent's core memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryBlock {
    /// Unique identifier for the block
    pub id: BlockId,
    /// Block label (e.g. "human", "persona")
    pub label: String,
    /// Block contents
    pub value: String,
    /// Optional description of what the block holds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the block is a reusable template
    #[serde(default)]
    pub template: bool,
    /// Server-formatted creation timestamp
    pub created_at: String,
    /// Server-formatted update timestamp
    pub updated_at: String,
}

/// A memory block to create: everything except the server-assigned fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMemoryBlock {
    /// Block label
    pub label: String,
    /// Block contents
    pub value: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the block is a reusable template
    #[serde(default)]
    pub template: bool,
}

impl NewMemoryBlock {
    /// Create a non-template block with the given label and value
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            description: None,
            template: false,
        }
    }
}

/// Body of `PATCH /agents/{id}/memory/{blockId}`; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryBlockUpdate {
    /// New label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// New contents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New template flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<bool>,
}
