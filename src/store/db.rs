use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use super::error::{Result, StoreError};
use crate::model::{Act, Completion, CompletionOutcome, NewAct, Profile};
use crate::streak;

// Bump when table definitions change
pub const SCHEMA_VERSION: i64 = 1;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS acts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    description TEXT,
                    date TEXT NOT NULL UNIQUE
                );

                CREATE TABLE IF NOT EXISTS completions (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id TEXT NOT NULL,
                    act_id INTEGER NOT NULL REFERENCES acts(id),
                    date TEXT NOT NULL,
                    UNIQUE (user_id, act_id)
                );

                CREATE TABLE IF NOT EXISTS profiles (
                    id TEXT PRIMARY KEY,
                    current_streak INTEGER,
                    best_streak INTEGER,
                    last_completion_date TEXT
                );

                CREATE INDEX IF NOT EXISTS idx_completions_user ON completions(user_id);

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    // --- Acts ---

    pub fn act_for_date(&self, date: NaiveDate) -> Result<Option<Act>> {
        let act = self
            .conn
            .query_row(
                "SELECT id, title, description, date FROM acts WHERE date = ?1",
                params![date],
                act_from_row,
            )
            .optional()?;
        Ok(act)
    }

    /// Acts dated within `[from, to]`, newest first
    pub fn acts_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Act>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, date FROM acts
             WHERE date >= ?1 AND date <= ?2
             ORDER BY date DESC",
        )?;
        let acts = stmt
            .query_map(params![from, to], act_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(acts)
    }

    /// Schedule an act, replacing the title/description of any act already on that date
    pub fn upsert_act(&self, act: &NewAct) -> Result<Act> {
        self.conn.execute(
            "INSERT INTO acts (title, description, date) VALUES (?1, ?2, ?3)
             ON CONFLICT(date) DO UPDATE SET title = excluded.title, description = excluded.description",
            params![act.title, act.description, act.date],
        )?;
        self.act_for_date(act.date)?
            .ok_or_else(|| StoreError::NotFound(format!("act on {}", act.date)))
    }

    // --- Completions ---

    pub fn completion_for(&self, user_id: &str, act_id: i64) -> Result<Option<Completion>> {
        let completion = self
            .conn
            .query_row(
                "SELECT user_id, act_id, date FROM completions WHERE user_id = ?1 AND act_id = ?2",
                params![user_id, act_id],
                completion_from_row,
            )
            .optional()?;
        Ok(completion)
    }

    pub fn completions_for_user(&self, user_id: &str) -> Result<Vec<Completion>> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id, act_id, date FROM completions WHERE user_id = ?1")?;
        let completions = stmt
            .query_map(params![user_id], completion_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(completions)
    }

    /// Record a completion and update the streak in one transaction.
    ///
    /// A second completion of the same act is a no-op reported as
    /// `AlreadyCompleted`; the profile is only touched when a new row lands.
    pub fn complete_act(&mut self, user_id: &str, act_id: i64, date: NaiveDate) -> Result<CompletionOutcome> {
        let tx = self.conn.transaction()?;

        let act_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM acts WHERE id = ?1)",
            params![act_id],
            |row| row.get(0),
        )?;
        if !act_exists {
            return Err(StoreError::NotFound(format!("act {}", act_id)));
        }

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO completions (user_id, act_id, date) VALUES (?1, ?2, ?3)",
            params![user_id, act_id, date],
        )?;
        if inserted == 0 {
            return Ok(CompletionOutcome::AlreadyCompleted);
        }

        tx.execute(
            "INSERT OR IGNORE INTO profiles (id, current_streak, best_streak) VALUES (?1, 0, 0)",
            params![user_id],
        )?;
        let profile = tx.query_row(
            "SELECT id, current_streak, best_streak, last_completion_date FROM profiles WHERE id = ?1",
            params![user_id],
            profile_from_row,
        )?;

        let updated = streak::apply_completion(&profile, date);
        tx.execute(
            "UPDATE profiles SET current_streak = ?1, best_streak = ?2, last_completion_date = ?3 WHERE id = ?4",
            params![
                updated.current_streak,
                updated.best_streak,
                updated.last_completion_date,
                user_id
            ],
        )?;

        tx.commit()?;
        Ok(CompletionOutcome::Recorded(updated))
    }

    // --- Profiles ---

    pub fn profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let profile = self
            .conn
            .query_row(
                "SELECT id, current_streak, best_streak, last_completion_date FROM profiles WHERE id = ?1",
                params![user_id],
                profile_from_row,
            )
            .optional()?;
        Ok(profile)
    }

    pub fn ensure_profile(&self, user_id: &str) -> Result<Profile> {
        self.conn.execute(
            "INSERT OR IGNORE INTO profiles (id, current_streak, best_streak) VALUES (?1, 0, 0)",
            params![user_id],
        )?;
        self.profile(user_id)?
            .ok_or_else(|| StoreError::NotFound(format!("profile {}", user_id)))
    }

    #[cfg(test)]
    pub(crate) fn set_profile(&self, profile: &Profile) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO profiles (id, current_streak, best_streak, last_completion_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                profile.id,
                profile.current_streak,
                profile.best_streak,
                profile.last_completion_date
            ],
        )?;
        Ok(())
    }
}

fn act_from_row(row: &Row<'_>) -> rusqlite::Result<Act> {
    Ok(Act {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        date: row.get(3)?,
    })
}

fn completion_from_row(row: &Row<'_>) -> rusqlite::Result<Completion> {
    Ok(Completion {
        user_id: row.get(0)?,
        act_id: row.get(1)?,
        date: row.get(2)?,
    })
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: row.get(0)?,
        current_streak: row.get::<_, Option<u32>>(1)?.unwrap_or(0),
        best_streak: row.get::<_, Option<u32>>(2)?.unwrap_or(0),
        last_completion_date: row.get(3)?,
    })
}
