/// Tool for updating existing strategies
///
/// This module implements the strategy_update MCP tool. Each field is
/// written through its own setter and hours per day is recomputed once at
/// the end.

use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use crate::storage::{StorageError, StrategyStore};
use crate::tools::create::unique_title_error;
use crate::tools::{parse_strategy_id, StrategyView, ToolError};
use crate::validation::{self, StrategyEditForm};

/// Parameters for updating an existing strategy
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateStrategyParams {
    /// ID of the strategy to update
    pub strategy_id: String,
    /// New title (optional)
    pub title: Option<String>,
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

/// Response from updating a strategy
#[derive(Debug, Serialize)]
pub struct UpdateStrategyResponse {
    pub success: bool,
    pub strategy: StrategyView,
    /// Set when hours per day could not be computed
    pub warning: Option<String>,
    pub message: String,
}

/// Update an existing strategy using the provided store
pub async fn update_strategy<S: StrategyStore + ?Sized>(
    store: &S,
    params: UpdateStrategyParams,
) -> Result<UpdateStrategyResponse, ToolError> {
    let id = parse_strategy_id(&params.strategy_id)?;

    let form = StrategyEditForm {
        title: params.title,
        start_date: params.start_date,
        target_date: params.target_date,
        hours_left: params.hours_left,
        vacation_days: params.vacation_days,
        days_to_work: params.days_to_work,
    };
    let edit = validation::validate_edit(&form)
        .map_err(|errors| ToolError::Validation(validation::messages(&errors)))?;

    let existing = store
        .load_strategy(&id)
        .await?
        .ok_or_else(|| StorageError::not_found(&id))?;

    if let Some(title) = edit.title.as_deref() {
        if title != existing.title {
            if store.matching_title(title).await? {
                return Err(unique_title_error());
            }
            match store.set_title(&id, title).await {
                Err(StorageError::DuplicateTitle { .. }) => return Err(unique_title_error()),
                other => other?,
            }
        }
    }

    store.set_start_date(&id, edit.start_date).await?;
    store.set_target_date(&id, edit.target_date).await?;
    store.set_hours_left(&id, edit.hours_left).await?;
    store.set_vacation_days(&id, edit.vacation_days).await?;
    store.set_days_to_work(&id, edit.days_to_work).await?;

    let warning = match store.set_hours_needed_per_day(&id).await {
        Ok(_) => None,
        Err(StorageError::Computation(e)) => Some(e.to_string()),
        Err(e) => return Err(e.into()),
    };

    let strategy = store
        .load_strategy(&id)
        .await?
        .ok_or_else(|| StorageError::not_found(&id))?;

    tracing::info!("Updated strategy '{}' ({})", strategy.title, strategy.id);

    Ok(UpdateStrategyResponse {
        success: true,
        message: format!("The strategy '{}' has been updated.", strategy.title),
        strategy: StrategyView::from(&strategy),
        warning,
    })
}
