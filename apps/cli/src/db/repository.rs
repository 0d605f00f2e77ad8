//! Repository pattern for database access.

use crate::db::error::DbError;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use study_core::types::{DisplayFilter, Order, Outcome, Outcomes, StudySettings};

type Result<T> = std::result::Result<T, DbError>;

/// Repository for study settings.
pub trait SettingsRepository {
    fn get_study_settings(&self) -> Result<StudySettings>;
    fn save_study_settings(&self, settings: &StudySettings) -> Result<()>;
}

/// Repository for outcomes of completed sessions.
pub trait OutcomeRepository {
    fn get_outcomes(&self) -> Result<Outcomes>;
    /// Upsert one completed session's outcomes in a single transaction.
    fn save_outcomes(&self, outcomes: &Outcomes) -> Result<usize>;
    fn clear_outcomes(&self) -> Result<usize>;
    fn outcome_counts(&self) -> Result<OutcomeCounts>;
}

/// Number of words per stored outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub remembered: usize,
    pub not_remembered: usize,
}

/// SQLite-backed repository.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_STUDY_SETTINGS)?;
        Ok(())
    }
}

impl SettingsRepository for SqliteRepository {
    fn get_study_settings(&self) -> Result<StudySettings> {
        self.conn
            .query_row(
                "SELECT display_filter, sort_order FROM study_settings WHERE id = 1",
                [],
                |row| {
                    let filter_str: String = row.get(0)?;
                    let order_str: String = row.get(1)?;

                    Ok(StudySettings {
                        filter: DisplayFilter::from_str(&filter_str).unwrap_or_default(),
                        order: Order::from_str(&order_str).unwrap_or_default(),
                    })
                },
            )
            .map_err(Into::into)
    }

    fn save_study_settings(&self, settings: &StudySettings) -> Result<()> {
        self.conn.execute(
            "UPDATE study_settings SET display_filter = ?1, sort_order = ?2 WHERE id = 1",
            params![settings.filter.as_str(), settings.order.as_str()],
        )?;
        Ok(())
    }
}

impl OutcomeRepository for SqliteRepository {
    fn get_outcomes(&self) -> Result<Outcomes> {
        let mut stmt = self
            .conn
            .prepare("SELECT word_id, outcome FROM word_outcomes")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut outcomes = Outcomes::new();
        for row in rows {
            let (word_id, outcome_str) = row?;
            let outcome = Outcome::from_str(&outcome_str).ok_or_else(|| {
                DbError::InvalidData(format!("outcome '{outcome_str}' for word {word_id}"))
            })?;
            outcomes.insert(word_id, outcome);
        }
        Ok(outcomes)
    }

    fn save_outcomes(&self, outcomes: &Outcomes) -> Result<usize> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO word_outcomes (word_id, outcome, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(word_id) DO UPDATE SET outcome = excluded.outcome, updated_at = excluded.updated_at",
            )?;
            for (word_id, outcome) in outcomes {
                stmt.execute(params![word_id, outcome.as_str(), now])?;
            }
        }
        tx.commit()?;
        Ok(outcomes.len())
    }

    fn clear_outcomes(&self) -> Result<usize> {
        let count = self.conn.execute("DELETE FROM word_outcomes", [])?;
        Ok(count)
    }

    fn outcome_counts(&self) -> Result<OutcomeCounts> {
        let mut stmt = self
            .conn
            .prepare("SELECT outcome, COUNT(*) FROM word_outcomes GROUP BY outcome")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = OutcomeCounts::default();
        for row in rows {
            let (outcome_str, count) = row?;
            match Outcome::from_str(&outcome_str) {
                Some(Outcome::Remembered) => counts.remembered = count as usize,
                Some(Outcome::NotRemembered) => counts.not_remembered = count as usize,
                None => {
                    return Err(DbError::InvalidData(format!("outcome '{outcome_str}'")));
                }
            }
        }
        Ok(counts)
    }
}
