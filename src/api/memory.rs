//! Memory block operations
//!
//! Memory blocks are always addressed under their owning agent.

use crate::api::AgentServiceClient;
use crate::error::ClientError;
use crate::executor::{segment, ApiRequest};
use crate::models::{MemoryBlock, MemoryBlockUpdate, NewMemoryBlock};

fn blocks_path(agent_id: &str) -> String {
    format!("/agents/{}/memory", segment(agent_id))
}

fn block_path(agent_id: &str, block_id: &str) -> String {
    format!("{}/{}", blocks_path(agent_id), segment(block_id))
}

impl AgentServiceClient {
    /// GET /agents/:id/memory - List an agent's memory blocks
    pub async fn get_memory_blocks(&self, agent_id: &str) -> Result<Vec<MemoryBlock>, ClientError> {
        self.executor()
            .execute(ApiRequest::get(blocks_path(agent_id)))
            .await
    }

    /// POST /agents/:id/memory - Add a memory block
    pub async fn create_memory_block(
        &self,
        agent_id: &str,
        block: &NewMemoryBlock,
    ) -> Result<MemoryBlock, ClientError> {
        let request = ApiRequest::post(blocks_path(agent_id)).json(block)?;
        self.executor().execute(request).await
    }

    /// PATCH /agents/:id/memory/:block_id - Partially update a memory block
    pub async fn update_memory_block(
        &self,
        agent_id: &str,
        block_id: &str,
        update: &MemoryBlockUpdate,
    ) -> Result<MemoryBlock, ClientError> {
        let request = ApiRequest::patch(block_path(agent_id, block_id)).json(update)?;
        self.executor().execute(request).await
    }

    /// DELETE /agents/:id/memory/:block_id - Remove a memory block
    pub async fn delete_memory_block(&self, agent_id: &str, block_id: &str) -> Result<(), ClientError> {
        self.execute_discarding(ApiRequest::delete(block_path(agent_id, block_id)))
            .await
    }
}
