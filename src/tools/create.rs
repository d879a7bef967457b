/// Tool for creating new strategies
///
/// This module implements the strategy_create MCP tool.

use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use crate::storage::{StorageError, StrategyStore};
use crate::tools::{StrategyView, ToolError};
use crate::validation::{self, StrategyForm};

/// Parameters for creating a new strategy
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateStrategyParams {
    /// Unique title, 1 to 100 characters
    pub title: String,
    /// Start date, YYYY-MM-DD
    pub start_date: String,
    /// Target date, YYYY-MM-DD
    pub target_date: String,
    /// Total hours of work left
    pub hours_left: String,
    /// Vacation days over the whole period
    pub vacation_days: String,
    /// Workdays per week, 1 to 7
    pub days_to_work: String,
}

/// Response from creating a strategy
#[derive(Debug, Serialize)]
pub struct CreateStrategyResponse {
    pub success: bool,
    pub strategy: StrategyView,
    pub message: String,
}

/// Create a new strategy using the provided store
pub async fn create_strategy<S: StrategyStore + ?Sized>(
    store: &S,
    params: CreateStrategyParams,
) -> Result<CreateStrategyResponse, ToolError> {
    let form = StrategyForm {
        title: params.title,
        start_date: params.start_date,
        target_date: params.target_date,
        hours_left: params.hours_left,
        vacation_days: params.vacation_days,
        days_to_work: params.days_to_work,
    };

    let new = validation::validate_new(&form)
        .map_err(|errors| ToolError::Validation(validation::messages(&errors)))?;

    if store.matching_title(&new.title).await? {
        return Err(unique_title_error());
    }

    let strategy = match store.create_strategy(new).await {
        Ok(strategy) => strategy,
        // Lost a race with another insert of the same title
        Err(StorageError::DuplicateTitle { .. }) => return Err(unique_title_error()),
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Created strategy '{}' ({})", strategy.title, strategy.id);

    Ok(CreateStrategyResponse {
        success: true,
        strategy: StrategyView::from(&strategy),
        message: "The strategy has been created.".to_string(),
    })
}

pub(crate) fn unique_title_error() -> ToolError {
    ToolError::Validation(vec!["The strategy title must be unique.".to_string()])
}
