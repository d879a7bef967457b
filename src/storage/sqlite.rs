/// SQLite implementation of the strategy store
///
/// This module provides the durable backend. It handles all SQL queries and
/// the conversion between snake-case table rows and `Strategy` values.

use std::path::PathBuf;
use std::str::FromStr;
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::domain::{compute_hours_per_day, format_date, NewStrategy, Strategy, StrategyId};
use crate::storage::{migrations, seed, sort_by_title, StorageError, StrategyStore};

/// Columns read by every query that returns whole strategies
const STRATEGY_COLUMNS: &str =
    "id, strat_title, start_date, target_date, hours_left, vacation_days, days_to_work, hours_per_day";

/// SQLite-based storage implementation
///
/// The connection sits behind an async mutex so the store can be shared
/// across tasks; each operation is still a single independent round-trip.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and bring its schema up to date
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let store = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(store)
    }

    /// Private in-memory database, mostly useful for tests
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Insert the demo strategies if the table is empty
    ///
    /// Returns how many strategies were inserted.
    pub async fn seed(&self) -> Result<usize, StorageError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let existing: i64 = tx.query_row("SELECT COUNT(*) FROM strategies", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(0);
        }

        let strategies = seed::seed_strategies()?;
        for strategy in &strategies {
            insert_strategy(&tx, strategy)?;
        }
        tx.commit()?;

        tracing::info!("Seeded database with {} strategies", strategies.len());
        Ok(strategies.len())
    }
}

/// Run an UPDATE that targets one strategy, mapping "no rows" to NotFound
fn update_one(
    conn: &Connection,
    id: &StrategyId,
    sql: &str,
    values: &[&dyn rusqlite::ToSql],
) -> Result<(), StorageError> {
    let rows_affected = conn.execute(sql, values)?;

    if rows_affected == 0 {
        return Err(StorageError::not_found(id));
    }

    tracing::debug!("Updated strategy {}", id);
    Ok(())
}

/// Convert one row selected with `STRATEGY_COLUMNS`
fn row_to_strategy(row: &Row<'_>) -> rusqlite::Result<Strategy> {
    let id_str: String = row.get(0)?;
    let id = StrategyId::from_string(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let hours_per_day = row
        .get::<_, Option<String>>(7)?
        .map(|s| Decimal::from_str(&s))
        .transpose()
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Strategy {
        id,
        title: row.get(1)?,
        start_date: row.get(2)?,
        target_date: row.get(3)?,
        hours_left: row.get(4)?,
        vacation_days: row.get(5)?,
        days_to_work: row.get(6)?,
        hours_per_day,
    })
}

fn insert_strategy(conn: &Connection, strategy: &Strategy) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO strategies (
            id, strat_title, start_date, target_date, string_start_date, string_target_date,
            hours_left, vacation_days, days_to_work, hours_per_day
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            strategy.id.to_string(),
            strategy.title,
            strategy.start_date,
            strategy.target_date,
            strategy.start_date_string(),
            strategy.target_date_string(),
            strategy.hours_left,
            strategy.vacation_days,
            strategy.days_to_work,
            strategy.hours_per_day.map(|h| h.to_string()),
        ],
    )
    .map_err(|e| duplicate_or_query(e, &strategy.title))?;

    Ok(())
}

/// A UNIQUE violation on the title column becomes DuplicateTitle
fn duplicate_or_query(error: rusqlite::Error, title: &str) -> StorageError {
    match &error {
        rusqlite::Error::SqliteFailure(e, Some(message))
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                && message.contains("strategies.strat_title") =>
        {
            StorageError::DuplicateTitle { title: title.to_string() }
        }
        _ => StorageError::Query(error),
    }
}

fn title_exists(conn: &Connection, title: &str) -> Result<bool, StorageError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM strategies WHERE strat_title = ?1",
            params![title],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

#[async_trait]
impl StrategyStore for SqliteStore {
    async fn sorted_strategies(&self) -> Result<Vec<Strategy>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM strategies ORDER BY seq ASC",
            STRATEGY_COLUMNS
        ))?;

        let mut strategies = stmt
            .query_map([], row_to_strategy)?
            .collect::<Result<Vec<_>, _>>()?;

        // Sorted in Rust so both backends agree on Unicode case folding
        sort_by_title(&mut strategies);
        Ok(strategies)
    }

    async fn create_strategy(&self, new: NewStrategy) -> Result<Strategy, StorageError> {
        let mut strategy = Strategy::from_new(new);
        strategy.hours_per_day = Some(compute_hours_per_day(&strategy)?);

        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        if title_exists(&tx, &strategy.title)? {
            return Err(StorageError::DuplicateTitle { title: strategy.title });
        }
        insert_strategy(&tx, &strategy)?;
        tx.commit()?;

        tracing::debug!("Created strategy: {} ({})", strategy.title, strategy.id);
        Ok(strategy)
    }

    async fn find_id_by_title(&self, title: &str) -> Result<StrategyId, StorageError> {
        let conn = self.conn.lock().await;
        let id_str: Option<String> = conn
            .query_row(
                "SELECT id FROM strategies WHERE strat_title = ?1",
                params![title],
                |row| row.get(0),
            )
            .optional()?;

        let id_str = id_str.ok_or_else(|| StorageError::NotFound { what: format!("title '{}'", title) })?;
        StrategyId::from_string(&id_str).map_err(|e| {
            StorageError::Query(rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(e),
            ))
        })
    }

    async fn load_strategy(&self, id: &StrategyId) -> Result<Option<Strategy>, StorageError> {
        let conn = self.conn.lock().await;
        let strategy = conn
            .query_row(
                &format!("SELECT {} FROM strategies WHERE id = ?1", STRATEGY_COLUMNS),
                params![id.to_string()],
                row_to_strategy,
            )
            .optional()?;

        Ok(strategy)
    }

    async fn delete_strategy(&self, id: &StrategyId) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        let rows_affected = conn.execute(
            "DELETE FROM strategies WHERE id = ?1",
            params![id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::not_found(id));
        }

        tracing::debug!("Deleted strategy: {}", id);
        Ok(())
    }

    async fn set_title(&self, id: &StrategyId, title: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        let rows_affected = conn
            .execute(
                "UPDATE strategies SET strat_title = ?1 WHERE id = ?2",
                params![title, id.to_string()],
            )
            .map_err(|e| duplicate_or_query(e, title))?;

        if rows_affected == 0 {
            return Err(StorageError::not_found(id));
        }

        Ok(())
    }

    async fn set_start_date(&self, id: &StrategyId, date: NaiveDate) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        update_one(
            &conn,
            id,
            "UPDATE strategies SET start_date = ?1, string_start_date = ?2 WHERE id = ?3",
            params![date, format_date(date), id.to_string()],
        )
    }

    async fn set_target_date(&self, id: &StrategyId, date: NaiveDate) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        update_one(
            &conn,
            id,
            "UPDATE strategies SET target_date = ?1, string_target_date = ?2 WHERE id = ?3",
            params![date, format_date(date), id.to_string()],
        )
    }

    async fn set_hours_left(&self, id: &StrategyId, hours_left: u32) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        update_one(
            &conn,
            id,
            "UPDATE strategies SET hours_left = ?1 WHERE id = ?2",
            params![hours_left, id.to_string()],
        )
    }

    async fn set_vacation_days(&self, id: &StrategyId, vacation_days: u32) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        update_one(
            &conn,
            id,
            "UPDATE strategies SET vacation_days = ?1 WHERE id = ?2",
            params![vacation_days, id.to_string()],
        )
    }

    async fn set_days_to_work(&self, id: &StrategyId, days_to_work: u32) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        update_one(
            &conn,
            id,
            "UPDATE strategies SET days_to_work = ?1 WHERE id = ?2",
            params![days_to_work, id.to_string()],
        )
    }

    async fn matching_title(&self, title: &str) -> Result<bool, StorageError> {
        let conn = self.conn.lock().await;
        title_exists(&conn, title)
    }

    async fn set_hours_needed_per_day(&self, id: &StrategyId) -> Result<Decimal, StorageError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let strategy = tx
            .query_row(
                &format!("SELECT {} FROM strategies WHERE id = ?1", STRATEGY_COLUMNS),
                params![id.to_string()],
                row_to_strategy,
            )
            .optional()?
            .ok_or_else(|| StorageError::not_found(id))?;

        let computed = compute_hours_per_day(&strategy);
        tx.execute(
            "UPDATE strategies SET hours_per_day = ?1 WHERE id = ?2",
            params![computed.as_ref().ok().map(|h| h.to_string()), id.to_string()],
        )?;
        tx.commit()?;

        computed.map_err(|e| {
            tracing::warn!("Cleared hours per day for {}: {}", id, e);
            StorageError::Computation(e)
        })
    }
}
