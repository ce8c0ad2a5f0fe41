pub mod db;
pub mod error;

use chrono::NaiveDate;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::timeout;

pub use db::Database;
pub use error::{Result, StoreError};

use crate::model::{Act, Completion, CompletionOutcome, NewAct, Profile};

/// Upper bound for a single store call
pub const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Async handle to the SQLite store.
///
/// Every call runs on the blocking pool behind `STORE_TIMEOUT`, so the UI
/// loop never stalls on disk I/O.
#[derive(Clone)]
pub struct Store {
    db: Arc<Mutex<Database>>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_database(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    pub fn from_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    async fn call<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let result = timeout(
            STORE_TIMEOUT,
            tokio::task::spawn_blocking(move || {
                let mut guard = db.lock().map_err(|_| StoreError::Poisoned)?;
                f(&mut *guard)
            }),
        )
        .await;

        match result {
            Ok(Ok(inner)) => inner,
            Ok(Err(e)) => Err(StoreError::Task(e.to_string())),
            Err(_) => Err(StoreError::Timeout(STORE_TIMEOUT.as_secs())),
        }
    }

    pub async fn act_for_date(&self, date: NaiveDate) -> Result<Option<Act>> {
        tracing::debug!("store: act_for_date {}", date);
        self.call(move |db| db.act_for_date(date)).await
    }

    pub async fn acts_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Act>> {
        tracing::debug!("store: acts_between {}..={}", from, to);
        self.call(move |db| db.acts_between(from, to)).await
    }

    pub async fn upsert_act(&self, act: NewAct) -> Result<Act> {
        self.call(move |db| db.upsert_act(&act)).await
    }

    pub async fn completion_for(&self, user_id: &str, act_id: i64) -> Result<Option<Completion>> {
        let user_id = user_id.to_string();
        self.call(move |db| db.completion_for(&user_id, act_id)).await
    }

    pub async fn completions_for_user(&self, user_id: &str) -> Result<Vec<Completion>> {
        let user_id = user_id.to_string();
        self.call(move |db| db.completions_for_user(&user_id)).await
    }

    pub async fn complete_act(&self, user_id: &str, act_id: i64, date: NaiveDate) -> Result<CompletionOutcome> {
        let user_id = user_id.to_string();
        self.call(move |db| db.complete_act(&user_id, act_id, date)).await
    }

    pub async fn profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let user_id = user_id.to_string();
        self.call(move |db| db.profile(&user_id)).await
    }

    pub async fn ensure_profile(&self, user_id: &str) -> Result<Profile> {
        let user_id = user_id.to_string();
        self.call(move |db| db.ensure_profile(&user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_round_trip_through_blocking_pool() {
        let store = Store::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        let act = store
            .upsert_act(NewAct {
                date,
                title: "Leave a kind note".to_string(),
                description: Some("On a colleague's desk".to_string()),
            })
            .await
            .unwrap();

        let fetched = store.act_for_date(date).await.unwrap().unwrap();
        assert_eq!(fetched, act);

        let profile = store.ensure_profile("alice").await.unwrap();
        assert_eq!(profile, Profile::new("alice"));
    }
}
