//! Protocol-facing records
//!
//! Plain serde types mirroring the agent server's resources.

pub mod agent;
pub mod memory;
pub mod message;
pub mod server;
pub mod session;
pub mod tool;

pub use agent::{Agent, AgentId, AgentListFilter, AgentStatus, AgentUpdate, CreateAgentRequest};
pub use memory::{BlockId, MemoryBlock, MemoryBlockUpdate, NewMemoryBlock};
pub use message::{
    FunctionCall, Message, MessageId, MessageQuery, MessageRole, SendMessageRequest, ToolCall,
};
pub use server::{HealthReport, HealthStatus, ServerStats};
pub use session::{ChatSession, CreateSessionRequest, SessionId};
pub use tool::{Tool, ToolParameters};

/// Free-form metadata attached to server records
pub type Metadata = serde_json::Map<String, serde_json::Value>;
