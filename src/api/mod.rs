//! Resource API
//!
//! Typed operations over the agent server's HTTP surface. Each operation is
//! a thin mapping to a method, path and body that runs through the shared
//! [`RequestExecutor`]. Operations are grouped by resource:
//! agents, memory blocks, messages, chat sessions, tools and server status.

pub mod agents;
pub mod memory;
pub mod messages;
pub mod server;
pub mod sessions;
pub mod tools;

use crate::auth::{CredentialProvider, NoCredentials};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::executor::{ApiRequest, RequestExecutor};
use crate::models::{
    Agent, AgentListFilter, AgentUpdate, ChatSession, CreateAgentRequest, HealthReport,
    MemoryBlock, MemoryBlockUpdate, Message, MessageQuery, NewMemoryBlock, SendMessageRequest,
    ServerStats, Tool,
};
use crate::stream::EventStream;
use async_trait::async_trait;
use serde::de::IgnoredAny;
use std::sync::Arc;

/// Operations the UI layer needs from the agent server
///
/// Implemented by [`AgentServiceClient`]; consumers that want a test double
/// can depend on this trait instead of the concrete client.
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// `POST /agents`
    async fn create_agent(&self, request: &CreateAgentRequest) -> Result<Agent, ClientError>;
    /// `GET /agents/{id}`
    async fn get_agent(&self, agent_id: &str) -> Result<Agent, ClientError>;
    /// `PATCH /agents/{id}`
    async fn update_agent(&self, agent_id: &str, update: &AgentUpdate)
        -> Result<Agent, ClientError>;
    /// `DELETE /agents/{id}`
    async fn delete_agent(&self, agent_id: &str) -> Result<(), ClientError>;
    /// `GET /agents`
    async fn list_agents(&self, filter: &AgentListFilter) -> Result<Vec<Agent>, ClientError>;

    /// `GET /agents/{id}/memory`
    async fn get_memory_blocks(&self, agent_id: &str) -> Result<Vec<MemoryBlock>, ClientError>;
    /// `POST /agents/{id}/memory`
    async fn create_memory_block(
        &self,
        agent_id: &str,
        block: &NewMemoryBlock,
    ) -> Result<MemoryBlock, ClientError>;
    /// `PATCH /agents/{id}/memory/{blockId}`
    async fn update_memory_block(
        &self,
        agent_id: &str,
        block_id: &str,
        update: &MemoryBlockUpdate,
    ) -> Result<MemoryBlock, ClientError>;
    /// `DELETE /agents/{id}/memory/{blockId}`
    async fn delete_memory_block(&self, agent_id: &str, block_id: &str) -> Result<(), ClientError>;

    /// `POST /agents/{id}/messages`
    async fn send_message(
        &self,
        agent_id: &str,
        message: &SendMessageRequest,
    ) -> Result<Message, ClientError>;
    /// `GET /agents/{id}/messages`
    async fn get_messages(
        &self,
        agent_id: &str,
        query: &MessageQuery,
    ) -> Result<Vec<Message>, ClientError>;

    /// `POST /agents/{id}/sessions`
    async fn create_chat_session(
        &self,
        agent_id: &str,
        title: Option<&str>,
    ) -> Result<ChatSession, ClientError>;
    /// `GET /agents/{id}/sessions`
    async fn get_chat_sessions(&self, agent_id: &str) -> Result<Vec<ChatSession>, ClientError>;
    /// `DELETE /sessions/{sessionId}`
    async fn delete_chat_session(&self, session_id: &str) -> Result<(), ClientError>;

    /// `GET /tools`
    async fn get_available_tools(&self) -> Result<Vec<Tool>, ClientError>;
    /// `POST /tools`
    async fn create_custom_tool(&self, tool: &Tool) -> Result<Tool, ClientError>;

    /// `GET /stats`
    async fn get_server_stats(&self) -> Result<ServerStats, ClientError>;
    /// `GET /health`
    async fn health_check(&self) -> Result<HealthReport, ClientError>;
}

/// Client for the agent server's resource API
///
/// Cheap to clone; clones share the connection pool, configuration and
/// credential provider.
#[derive(Clone)]
pub struct AgentServiceClient {
    executor: RequestExecutor,
    credentials: Arc<dyn CredentialProvider>,
}

impl AgentServiceClient {
    /// Create a client that only uses the configured static API key
    pub fn new(config: ClientConfig) -> Self {
        Self::with_credentials(config, Arc::new(NoCredentials))
    }

    /// Create a client that asks `credentials` for a bearer token on every call
    pub fn with_credentials(config: ClientConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        let executor = RequestExecutor::new(Arc::new(config), credentials.clone());
        Self {
            executor,
            credentials,
        }
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        self.executor.config()
    }

    /// The underlying request executor
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Create an event stream for the same server and credentials
    ///
    /// The stream is independent of this client: it has its own connection
    /// and listener registry.
    pub fn event_stream(&self) -> EventStream {
        EventStream::new(self.config().clone(), self.credentials.clone())
    }

    /// Run a request whose payload the caller does not need
    pub(crate) async fn execute_discarding(&self, request: ApiRequest) -> Result<(), ClientError> {
        self.executor.execute::<IgnoredAny>(request).await.map(|_| ())
    }
}

#[async_trait]
impl AgentApi for AgentServiceClient {
    async fn create_agent(&self, request: &CreateAgentRequest) -> Result<Agent, ClientError> {
        Self::create_agent(self, request).await
    }

    async fn get_agent(&self, agent_id: &str) -> Result<Agent, ClientError> {
        Self::get_agent(self, agent_id).await
    }

    async fn update_agent(
        &self,
        agent_id: &str,
        update: &AgentUpdate,
    ) -> Result<Agent, ClientError> {
        Self::update_agent(self, agent_id, update).await
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<(), ClientError> {
        Self::delete_agent(self, agent_id).await
    }

    async fn list_agents(&self, filter: &AgentListFilter) -> Result<Vec<Agent>, ClientError> {
        Self::list_agents(self, filter).await
    }

    async fn get_memory_blocks(&self, agent_id: &str) -> Result<Vec<MemoryBlock>, ClientError> {
        Self::get_memory_blocks(self, agent_id).await
    }

    async fn create_memory_block(
        &self,
        agent_id: &str,
        block: &NewMemoryBlock,
    ) -> Result<MemoryBlock, ClientError> {
        Self::create_memory_block(self, agent_id, block).await
    }

    async fn update_memory_block(
        &self,
        agent_id: &str,
        block_id: &str,
        update: &MemoryBlockUpdate,
    ) -> Result<MemoryBlock, ClientError> {
        Self::update_memory_block(self, agent_id, block_id, update).await
    }

    async fn delete_memory_block(&self, agent_id: &str, block_id: &str) -> Result<(), ClientError> {
        Self::delete_memory_block(self, agent_id, block_id).await
    }

    async fn send_message(
        &self,
        agent_id: &str,
        message: &SendMessageRequest,
    ) -> Result<Message, ClientError> {
        Self::send_message(self, agent_id, message).await
    }

    async fn get_messages(
        &self,
        agent_id: &str,
        query: &MessageQuery,
    ) -> Result<Vec<Message>, ClientError> {
        Self::get_messages(self, agent_id, query).await
    }

    async fn create_chat_session(
        &self,
        agent_id: &str,
        title: Option<&str>,
    ) -> Result<ChatSession, ClientError> {
        Self::create_chat_session(self, agent_id, title).await
    }

    async fn get_chat_sessions(&self, agent_id: &str) -> Result<Vec<ChatSession>, ClientError> {
        Self::get_chat_sessions(self, agent_id).await
    }

    async fn delete_chat_session(&self, session_id: &str) -> Result<(), ClientError> {
        Self::delete_chat_session(self, session_id).await
    }

    async fn get_available_tools(&self) -> Result<Vec<Tool>, ClientError> {
        Self::get_available_tools(self).await
    }

    async fn create_custom_tool(&self, tool: &Tool) -> Result<Tool, ClientError> {
        Self::create_custom_tool(self, tool).await
    }

    async fn get_server_stats(&self) -> Result<ServerStats, ClientError> {
        Self::get_server_stats(self).await
    }

    async fn health_check(&self) -> Result<HealthReport, ClientError> {
        Self::health_check(self).await
    }
}
