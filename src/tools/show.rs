/// Tool for showing one strategy
///
/// This module implements the strategy_show MCP tool. Showing a strategy
/// always recomputes its hours per day first, so what the client sees is
/// never stale.

use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use crate::storage::{StorageError, StrategyStore};
use crate::tools::{parse_strategy_id, StrategyView, ToolError};

/// Parameters for showing a strategy
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ShowStrategyParams {
    /// ID of the strategy
    pub strategy_id: String,
}

/// Response from showing a strategy
#[derive(Debug, Serialize)]
pub struct ShowStrategyResponse {
    pub strategy: StrategyView,
    /// Set when hours per day could not be computed
    pub warning: Option<String>,
}

/// Load a strategy with freshly computed hours per day
pub async fn show_strategy<S: StrategyStore + ?Sized>(
    store: &S,
    params: ShowStrategyParams,
) -> Result<ShowStrategyResponse, ToolError> {
    let id = parse_strategy_id(&params.strategy_id)?;

    let warning = match store.set_hours_needed_per_day(&id).await {
        Ok(_) => None,
        Err(StorageError::Computation(e)) => Some(e.to_string()),
        Err(e) => return Err(e.into()),
    };

    // A concurrent delete between the two calls shows up as NotFound
    let strategy = store
        .load_strategy(&id)
        .await?
        .ok_or_else(|| StorageError::not_found(&id))?;

    Ok(ShowStrategyResponse {
        strategy: StrategyView::from(&strategy),
        warning,
    })
}
