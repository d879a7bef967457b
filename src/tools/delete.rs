/// Tool for deleting strategies
///
/// This module implements the strategy_delete MCP tool.

use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use crate::storage::StrategyStore;
use crate::tools::{parse_strategy_id, ToolError};

/// Parameters for deleting a strategy
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteStrategyParams {
    /// ID of the strategy to delete
    pub strategy_id: String,
}

/// Response from deleting a strategy
#[derive(Debug, Serialize)]
pub struct DeleteStrategyResponse {
    pub success: bool,
    pub message: String,
}

/// Permanently delete a strategy
pub async fn delete_strategy<S: StrategyStore + ?Sized>(
    store: &S,
    params: DeleteStrategyParams,
) -> Result<DeleteStrategyResponse, ToolError> {
    let id = parse_strategy_id(&params.strategy_id)?;
    store.delete_strategy(&id).await?;

    tracing::info!("Deleted strategy {}", id);

    Ok(DeleteStrategyResponse {
        success: true,
        message: "Strategy deleted.".to_string(),
    })
}
