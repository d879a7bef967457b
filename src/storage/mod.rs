/// Storage layer for persisting strategies
///
/// Two backends implement the same `StrategyStore` interface: an ephemeral
/// store living inside a host session, and a durable SQLite store.

pub mod session;
pub mod sqlite;
pub mod migrations;
pub mod seed;

// Re-export the main storage types
pub use session::{Session, SessionStore, STRATEGIES_SLOT};
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use crate::domain::{DomainError, NewStrategy, Strategy, StrategyId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Strategy not found: {what}")]
    NotFound { what: String },

    #[error("The strategy title must be unique: '{title}' already exists")]
    DuplicateTitle { title: String },

    #[error("Computation error: {0}")]
    Computation(#[from] DomainError),

    #[error("Migration error: {0}")]
    Migration(String),
}

impl StorageError {
    pub(crate) fn not_found(id: &StrategyId) -> Self {
        StorageError::NotFound { what: format!("id {}", id) }
    }

    /// True when the error means "no such record" rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }

    /// True for transport, query and serialization failures
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            StorageError::Connection(_)
                | StorageError::Query(_)
                | StorageError::Serialization(_)
                | StorageError::Session(_)
                | StorageError::Migration(_)
        )
    }
}

/// Trait defining the storage interface for strategies
///
/// Both backends implement this so callers can be handed either one at
/// startup. Setters never recompute `hours_per_day`; call
/// `set_hours_needed_per_day` after mutating anything it depends on.
#[async_trait]
pub trait StrategyStore: Send + Sync {
    /// All strategies ordered by case-insensitive title
    async fn sorted_strategies(&self) -> Result<Vec<Strategy>, StorageError>;

    /// Insert a strategy and compute its hours per day
    ///
    /// Fails with `DuplicateTitle` if the title is taken and with
    /// `Computation` if the schedule has no workable days. Nothing is stored
    /// in either case.
    async fn create_strategy(&self, new: NewStrategy) -> Result<Strategy, StorageError>;

    /// Exact-match lookup of a strategy id by title
    async fn find_id_by_title(&self, title: &str) -> Result<StrategyId, StorageError>;

    /// Load an owned copy of a strategy
    async fn load_strategy(&self, id: &StrategyId) -> Result<Option<Strategy>, StorageError>;

    /// Permanently remove a strategy
    async fn delete_strategy(&self, id: &StrategyId) -> Result<(), StorageError>;

    /// Rename a strategy
    async fn set_title(&self, id: &StrategyId, title: &str) -> Result<(), StorageError>;

    async fn set_start_date(&self, id: &StrategyId, date: NaiveDate) -> Result<(), StorageError>;

    async fn set_target_date(&self, id: &StrategyId, date: NaiveDate) -> Result<(), StorageError>;

    async fn set_hours_left(&self, id: &StrategyId, hours_left: u32) -> Result<(), StorageError>;

    async fn set_vacation_days(&self, id: &StrategyId, vacation_days: u32) -> Result<(), StorageError>;

    /// Any value is accepted; 1..=7 is enforced by validation
    async fn set_days_to_work(&self, id: &StrategyId, days_to_work: u32) -> Result<(), StorageError>;

    /// Case-sensitive check whether a title is already used
    async fn matching_title(&self, title: &str) -> Result<bool, StorageError>;

    /// Recompute and persist `hours_per_day` for one strategy
    ///
    /// On a degenerate schedule the stored value is cleared and
    /// `Computation` is returned.
    async fn set_hours_needed_per_day(&self, id: &StrategyId) -> Result<Decimal, StorageError>;
}

/// Sort strategies by lowercase title, keeping insertion order on ties
pub fn sort_by_title(strategies: &mut [Strategy]) {
    strategies.sort_by_cached_key(|s| s.title.to_lowercase());
}
