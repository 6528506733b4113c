//! Agent operations
//!
//! Create, read, update, delete and list agents.

use crate::api::AgentServiceClient;
use crate::error::ClientError;
use crate::executor::{segment, ApiRequest};
use crate::models::{Agent, AgentListFilter, AgentUpdate, CreateAgentRequest};

impl AgentServiceClient {
    /// POST /agents - Create an agent
    pub async fn create_agent(&self, request: &CreateAgentRequest) -> Result<Agent, ClientError> {
        let request = ApiRequest::post("/agents").json(request)?;
        self.executor().execute(request).await
    }

    /// GET /agents/:id - Fetch one agent
    pub async fn get_agent(&self, agent_id: &str) -> Result<Agent, ClientError> {
        let path = format!("/agents/{}", segment(agent_id));
        self.executor().execute(ApiRequest::get(path)).await
    }

    /// PATCH /agents/:id - Partially update an agent
    pub async fn update_agent(
        &self,
        agent_id: &str,
        update: &AgentUpdate,
    ) -> Result<Agent, ClientError> {
        let path = format!("/agents/{}", segment(agent_id));
        let request = ApiRequest::patch(path).json(update)?;
        self.executor().execute(request).await
    }

    /// DELETE /agents/:id - Delete an agent
    pub async fn delete_agent(&self, agent_id: &str) -> Result<(), ClientError> {
        let path = format!("/agents/{}", segment(agent_id));
        self.execute_discarding(ApiRequest::delete(path)).await
    }

    /// GET /agents - List agents, optionally filtered by user and organization
    pub async fn list_agents(&self, filter: &AgentListFilter) -> Result<Vec<Agent>, ClientError> {
        let request = ApiRequest::get("/agents").query(filter.query_pairs());
        self.executor().execute(request).await
    }
}
