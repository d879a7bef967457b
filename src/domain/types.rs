/// Core identifier and date helpers used throughout the domain layer
///
/// Dates travel through the system in one canonical string form
/// (`YYYY-MM-DD`), no matter how the caller typed them.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use uuid::Uuid;
use crate::domain::DomainError;

/// Canonical date format used for storage and display
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unique identifier for a strategy
///
/// This is a wrapper around UUID to provide type safety - a strategy ID can't
/// be confused with any other string that floats around a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrategyId(pub Uuid);

impl StrategyId {
    /// Generate a new random strategy ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a strategy ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for StrategyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StrategyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a user-supplied calendar date
///
/// Accepts `YYYY-MM-DD` and `YYYY/MM/DD`, with or without zero padding on
/// month and day (so `2023-3-15` is fine).
pub fn parse_date(input: &str) -> Result<NaiveDate, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidDate("date is required".to_string()));
    }

    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| DomainError::InvalidDate(
            format!("'{}' is not a valid date, expected YYYY-MM-DD", trimmed)
        ))
}

/// Render a date in its canonical string form
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
