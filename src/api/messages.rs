//! Message operations

use crate::api::AgentServiceClient;
use crate::error::ClientError;
use crate::executor::{segment, ApiRequest};
use crate::models::{Message, MessageQuery, SendMessageRequest};

impl AgentServiceClient {
    /// POST /agents/:id/messages - Send a message to an agent
    ///
    /// Returns the message as recorded by the server. The agent's reply,
    /// if any, arrives on the event stream.
    pub async fn send_message(
        &self,
        agent_id: &str,
        message: &SendMessageRequest,
    ) -> Result<Message, ClientError> {
        let path = format!("/agents/{}/messages", segment(agent_id));
        let request = ApiRequest::post(path).json(message)?;
        self.executor().execute(request).await
    }

    /// GET /agents/:id/messages - List messages, optionally for one session
    /// and capped at `limit`
    pub async fn get_messages(
        &self,
        agent_id: &str,
        query: &MessageQuery,
    ) -> Result<Vec<Message>, ClientError> {
        let path = format!("/agents/{}/messages", segment(agent_id));
        let request = ApiRequest::get(path).query(query.query_pairs());
        self.executor().execute(request).await
    }
}
