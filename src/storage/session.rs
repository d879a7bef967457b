/// Session-backed implementation of the strategy store
///
/// The host hands us a `Session`, a key/value handle whose lifetime it
/// manages. All strategies live serialized in a single slot of that session,
/// so they disappear together with it.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::{compute_hours_per_day, NewStrategy, Strategy, StrategyId};
use crate::storage::{seed, sort_by_title, StorageError, StrategyStore};

/// Session slot holding the serialized strategy list
pub const STRATEGIES_SLOT: &str = "strategies";

/// Key/value session handle
///
/// Cloning is cheap and every clone sees the same data. The lock only makes
/// the handle shareable; concurrent requests against one session must still
/// be serialized by the host.
#[derive(Debug, Clone, Default)]
pub struct Session {
    slots: Arc<RwLock<HashMap<String, Value>>>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a slot
    pub fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let slots = self.slots.read().map_err(|e| StorageError::Session(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    /// Overwrite a slot
    pub fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut slots = self.slots.write().map_err(|e| StorageError::Session(e.to_string()))?;
        slots.insert(key.to_string(), value);
        Ok(())
    }

    /// Clear a slot, returning what was in it
    pub fn remove(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let mut slots = self.slots.write().map_err(|e| StorageError::Session(e.to_string()))?;
        Ok(slots.remove(key))
    }

    /// Read-modify-write a slot under one write lock
    ///
    /// The slot is only written back when `f` succeeds.
    fn update<R>(
        &self,
        key: &str,
        f: impl FnOnce(&mut Option<Value>) -> Result<R, StorageError>,
    ) -> Result<R, StorageError> {
        let mut slots = self.slots.write().map_err(|e| StorageError::Session(e.to_string()))?;

        let mut slot = slots.get(key).cloned();
        let result = f(&mut slot)?;

        match slot {
            Some(value) => slots.insert(key.to_string(), value),
            None => slots.remove(key),
        };

        Ok(result)
    }
}

/// Strategy store living inside a session
pub struct SessionStore {
    session: Session,
}

impl SessionStore {
    /// Adopt the strategies already in the session, or start with none
    pub fn new(session: Session) -> Result<Self, StorageError> {
        Self::init(session, Vec::new())
    }

    /// Like `new`, but an empty session starts with the demo strategies
    pub fn with_seed_data(session: Session) -> Result<Self, StorageError> {
        Self::init(session, seed::seed_strategies()?)
    }

    fn init(session: Session, initial: Vec<Strategy>) -> Result<Self, StorageError> {
        session.update(STRATEGIES_SLOT, |slot| {
            if slot.is_none() {
                tracing::debug!("Initializing session slot with {} strategies", initial.len());
                *slot = Some(serde_json::to_value(&initial)?);
            }
            Ok(())
        })?;

        Ok(Self { session })
    }

    /// The session this store writes into
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn read(&self) -> Result<Vec<Strategy>, StorageError> {
        match self.session.get(STRATEGIES_SLOT)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    fn modify<R>(
        &self,
        f: impl FnOnce(&mut Vec<Strategy>) -> Result<R, StorageError>,
    ) -> Result<R, StorageError> {
        self.session.update(STRATEGIES_SLOT, |slot| {
            let mut strategies: Vec<Strategy> = match slot.take() {
                Some(value) => serde_json::from_value(value)?,
                None => Vec::new(),
            };
            let result = f(&mut strategies)?;
            *slot = Some(serde_json::to_value(&strategies)?);
            Ok(result)
        })
    }

    /// Apply a change to one strategy, failing with NotFound if it is gone
    fn modify_one(
        &self,
        id: &StrategyId,
        f: impl FnOnce(&mut Strategy),
    ) -> Result<(), StorageError> {
        self.modify(|strategies| {
            let strategy = strategies
                .iter_mut()
                .find(|s| &s.id == id)
                .ok_or_else(|| StorageError::not_found(id))?;
            f(strategy);
            Ok(())
        })
    }
}

#[async_trait]
impl StrategyStore for SessionStore {
    async fn sorted_strategies(&self) -> Result<Vec<Strategy>, StorageError> {
        let mut strategies = self.read()?;
        sort_by_title(&mut strategies);
        Ok(strategies)
    }

    async fn create_strategy(&self, new: NewStrategy) -> Result<Strategy, StorageError> {
        let mut strategy = Strategy::from_new(new);
        strategy.hours_per_day = Some(compute_hours_per_day(&strategy)?);

        self.modify(|strategies| {
            if strategies.iter().any(|s| s.title == strategy.title) {
                return Err(StorageError::DuplicateTitle { title: strategy.title.clone() });
            }
            strategies.push(strategy.clone());
            Ok(())
        })?;

        tracing::debug!("Created strategy: {} ({})", strategy.title, strategy.id);
        Ok(strategy)
    }

    async fn find_id_by_title(&self, title: &str) -> Result<StrategyId, StorageError> {
        self.read()?
            .into_iter()
            .find(|s| s.title == title)
            .map(|s| s.id)
            .ok_or_else(|| StorageError::NotFound { what: format!("title '{}'", title) })
    }

    async fn load_strategy(&self, id: &StrategyId) -> Result<Option<Strategy>, StorageError> {
        Ok(self.read()?.into_iter().find(|s| &s.id == id))
    }

    async fn delete_strategy(&self, id: &StrategyId) -> Result<(), StorageError> {
        self.modify(|strategies| {
            let index = strategies
                .iter()
                .position(|s| &s.id == id)
                .ok_or_else(|| StorageError::not_found(id))?;
            strategies.remove(index);
            Ok(())
        })?;

        tracing::debug!("Deleted strategy: {}", id);
        Ok(())
    }

    async fn set_title(&self, id: &StrategyId, title: &str) -> Result<(), StorageError> {
        self.modify(|strategies| {
            if strategies.iter().any(|s| s.title == title && &s.id != id) {
                return Err(StorageError::DuplicateTitle { title: title.to_string() });
            }
            let strategy = strategies
                .iter_mut()
                .find(|s| &s.id == id)
                .ok_or_else(|| StorageError::not_found(id))?;
            strategy.title = title.to_string();
            Ok(())
        })
    }

    async fn set_start_date(&self, id: &StrategyId, date: NaiveDate) -> Result<(), StorageError> {
        self.modify_one(id, |s| s.start_date = date)
    }

    async fn set_target_date(&self, id: &StrategyId, date: NaiveDate) -> Result<(), StorageError> {
        self.modify_one(id, |s| s.target_date = date)
    }

    async fn set_hours_left(&self, id: &StrategyId, hours_left: u32) -> Result<(), StorageError> {
        self.modify_one(id, |s| s.hours_left = hours_left)
    }

    async fn set_vacation_days(&self, id: &StrategyId, vacation_days: u32) -> Result<(), StorageError> {
        self.modify_one(id, |s| s.vacation_days = vacation_days)
    }

    async fn set_days_to_work(&self, id: &StrategyId, days_to_work: u32) -> Result<(), StorageError> {
        self.modify_one(id, |s| s.days_to_work = days_to_work)
    }

    async fn matching_title(&self, title: &str) -> Result<bool, StorageError> {
        Ok(self.read()?.iter().any(|s| s.title == title))
    }

    async fn set_hours_needed_per_day(&self, id: &StrategyId) -> Result<Decimal, StorageError> {
        self.modify(|strategies| {
            let strategy = strategies
                .iter_mut()
                .find(|s| &s.id == id)
                .ok_or_else(|| StorageError::not_found(id))?;

            let computed = compute_hours_per_day(strategy);
            strategy.hours_per_day = computed.as_ref().ok().copied();
            Ok(computed)
        })?
        .map_err(|e| {
            tracing::warn!("Cleared hours per day for {}: {}", id, e);
            StorageError::Computation(e)
        })
    }
}
