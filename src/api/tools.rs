//! Tool operations

use crate::api::AgentServiceClient;
use crate::error::ClientError;
use crate::executor::ApiRequest;
use crate::models::Tool;

impl AgentServiceClient {
    /// GET /tools - List tools available to agents
    pub async fn get_available_tools(&self) -> Result<Vec<Tool>, ClientError> {
        self.executor().execute(ApiRequest::get("/tools")).await
    }

    /// POST /tools - Register a custom tool
    pub async fn create_custom_tool(&self, tool: &Tool) -> Result<Tool, ClientError> {
        let request = ApiRequest::post("/tools").json(tool)?;
        self.executor().execute(request).await
    }
}
