/// Domain module containing core business logic and data types
///
/// This module defines the Strategy entity, its identifier, date handling
/// and the hours-per-day calculation shared by every storage backend.

pub mod strategy;
pub mod hours;
pub mod types;

// Re-export public types for easy access
pub use strategy::*;
pub use hours::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid strategy title: {0}")]
    InvalidTitle(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Cannot compute hours per day: schedule has {workable_days} workable days")]
    DegenerateSchedule { workable_days: i64 },
}
