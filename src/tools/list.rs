/// Tool for listing all strategies
///
/// This module implements the strategy_list MCP tool.

use serde::Serialize;
use crate::storage::StrategyStore;
use crate::tools::{StrategyView, ToolError};

/// Summary statistics over all strategies
#[derive(Debug, Serialize)]
pub struct StrategyListSummary {
    pub total_strategies: u32,
    /// Strategies whose hours per day could not be computed
    pub uncomputed: u32,
}

/// Response from listing strategies
#[derive(Debug, Serialize)]
pub struct ListStrategiesResponse {
    pub strategies: Vec<StrategyView>,
    pub summary: StrategyListSummary,
}

/// List strategies, sorted by title without regard to case
pub async fn list_strategies<S: StrategyStore + ?Sized>(
    store: &S,
) -> Result<ListStrategiesResponse, ToolError> {
    let strategies = store.sorted_strategies().await?;

    let views: Vec<StrategyView> = strategies.iter().map(StrategyView::from).collect();
    let uncomputed = views.iter().filter(|v| v.hours_per_day.is_none()).count() as u32;

    Ok(ListStrategiesResponse {
        summary: StrategyListSummary {
            total_strategies: views.len() as u32,
            uncomputed,
        },
        strategies: views,
    })
}
