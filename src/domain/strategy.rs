/// Strategy entity and related functionality
///
/// This module defines the Strategy struct: a goal with a schedule and a
/// workload, plus the derived hours-per-day figure.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use crate::domain::{format_date, DomainError, StrategyId};

/// Maximum title length accepted anywhere in the system
pub const MAX_TITLE_LEN: usize = 100;

/// A strategy represents a goal the user wants to finish by a target date
///
/// `hours_per_day` is derived from the other fields and is only refreshed
/// when the store is asked to recompute it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Unique identifier for this strategy
    pub id: StrategyId,
    /// Display title, unique within a store
    pub title: String,
    /// Day the work starts
    pub start_date: NaiveDate,
    /// Day the work should be done
    pub target_date: NaiveDate,
    /// Total remaining workload in hours
    pub hours_left: u32,
    /// Days off over the whole period
    pub vacation_days: u32,
    /// Planned workdays per week
    pub days_to_work: u32,
    /// Average hours per day needed, 2 decimal places
    pub hours_per_day: Option<Decimal>,
}

impl Strategy {
    /// Build a fresh strategy from validated input
    ///
    /// The id is assigned here; `hours_per_day` starts out uncomputed.
    pub fn from_new(new: NewStrategy) -> Self {
        Self {
            id: StrategyId::new(),
            title: new.title,
            start_date: new.start_date,
            target_date: new.target_date,
            hours_left: new.hours_left,
            vacation_days: new.vacation_days,
            days_to_work: new.days_to_work,
            hours_per_day: None,
        }
    }

    /// Canonical string form of the start date
    pub fn start_date_string(&self) -> String {
        format_date(self.start_date)
    }

    /// Canonical string form of the target date
    pub fn target_date_string(&self) -> String {
        format_date(self.target_date)
    }
}

/// Input for creating a strategy
///
/// The store accepts any values here; range checks on user input live in
/// the validation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStrategy {
    pub title: String,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    pub hours_left: u32,
    pub vacation_days: u32,
    pub days_to_work: u32,
}

impl NewStrategy {
    /// Create strategy input, checking only the title
    ///
    /// The title is trimmed and must be 1..=100 characters.
    pub fn new(
        title: impl Into<String>,
        start_date: NaiveDate,
        target_date: NaiveDate,
        hours_left: u32,
        vacation_days: u32,
        days_to_work: u32,
    ) -> Result<Self, DomainError> {
        let title = validate_title(&title.into())?;

        Ok(Self {
            title,
            start_date,
            target_date,
            hours_left,
            vacation_days,
            days_to_work,
        })
    }
}

/// Trim a title and check its length
pub fn validate_title(title: &str) -> Result<String, DomainError> {
    let trimmed = title.trim();

    if trimmed.is_empty() {
        return Err(DomainError::InvalidTitle(
            "The strategy title is required.".to_string()
        ));
    }

    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::InvalidTitle(
            format!("Strategy title must be between 1 and {} characters.", MAX_TITLE_LEN)
        ));
    }

    Ok(trimmed.to_string())
}
