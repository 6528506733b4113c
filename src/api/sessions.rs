//! Chat session operations
//!
//! Sessions are created and listed under an agent but deleted by their own id.

use crate::api::AgentServiceClient;
use crate::error::ClientError;
use crate::executor::{segment, ApiRequest};
use crate::models::{ChatSession, CreateSessionRequest};

impl AgentServiceClient {
    /// POST /agents/:id/sessions - Start a chat session
    pub async fn create_chat_session(
        &self,
        agent_id: &str,
        title: Option<&str>,
    ) -> Result<ChatSession, ClientError> {
        let path = format!("/agents/{}/sessions", segment(agent_id));
        let body = CreateSessionRequest {
            title: title.map(str::to_string),
        };
        let request = ApiRequest::post(path).json(&body)?;
        self.executor().execute(request).await
    }

    /// GET /agents/:id/sessions - List an agent's chat sessions
    pub async fn get_chat_sessions(&self, agent_id: &str) -> Result<Vec<ChatSession>, ClientError> {
        let path = format!("/agents/{}/sessions", segment(agent_id));
        self.executor().execute(ApiRequest::get(path)).await
    }

    /// DELETE /sessions/:session_id - Delete a chat session
    pub async fn delete_chat_session(&self, session_id: &str) -> Result<(), ClientError> {
        let path = format!("/sessions/{}", segment(session_id));
        self.execute_discarding(ApiRequest::delete(path)).await
    }
}
