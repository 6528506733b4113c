//! Server status operations

use crate::api::AgentServiceClient;
use crate::error::ClientError;
use crate::executor::ApiRequest;
use crate::models::{HealthReport, ServerStats};

impl AgentServiceClient {
    /// GET /stats - Aggregate server statistics
    pub async fn get_server_stats(&self) -> Result<ServerStats, ClientError> {
        self.executor().execute(ApiRequest::get("/stats")).await
    }

    /// GET /health - Health probe
    ///
    /// Goes through the same retry policy as every other call, so an
    /// unreachable server takes the full attempt budget to report.
    pub async fn health_check(&self) -> Result<HealthReport, ClientError> {
        self.executor().execute(ApiRequest::get("/health")).await
    }
}
