/// MCP tools for strategy management
///
/// This module contains the flows that external clients call: each one
/// validates its input, drives the store and shapes a response.

pub mod create;
pub mod list;
pub mod show;
pub mod update;
pub mod delete;

// Re-export tool functions for easy access
pub use create::*;
pub use list::*;
pub use show::*;
pub use update::*;
pub use delete::*;

use serde::Serialize;
use thiserror::Error;
use crate::domain::{Strategy, StrategyId};
use crate::storage::StorageError;

/// Errors a tool call can report back to the client
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{}", .0.join(" "))]
    Validation(Vec<String>),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A strategy as shown to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyView {
    pub strategy_id: String,
    pub title: String,
    pub start_date: String,
    pub target_date: String,
    pub hours_left: u32,
    pub vacation_days: u32,
    pub days_to_work: u32,
    pub hours_per_day: Option<String>,
}

impl From<&Strategy> for StrategyView {
    fn from(strategy: &Strategy) -> Self {
        Self {
            strategy_id: strategy.id.to_string(),
            title: strategy.title.clone(),
            start_date: strategy.start_date_string(),
            target_date: strategy.target_date_string(),
            hours_left: strategy.hours_left,
            vacation_days: strategy.vacation_days,
            days_to_work: strategy.days_to_work,
            hours_per_day: strategy.hours_per_day.map(|h| format!("{:.2}", h)),
        }
    }
}

impl StrategyView {
    /// One-line human summary
    pub fn summary_line(&self) -> String {
        let hours = self.hours_per_day.as_deref().unwrap_or("n/a");
        format!(
            "{} ({} → {}): {} hours/day",
            self.title, self.start_date, self.target_date, hours
        )
    }
}

/// Parse a client-supplied id; an unparseable id can't exist in the store
pub(crate) fn parse_strategy_id(raw: &str) -> Result<StrategyId, ToolError> {
    StrategyId::from_string(raw).map_err(|_| {
        ToolError::Storage(StorageError::NotFound { what: format!("id {}", raw) })
    })
}
