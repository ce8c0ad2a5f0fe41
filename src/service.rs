//! Data loading and actions behind the Today, Streak and History views

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::history;
use crate::model::{Act, CompletionOutcome, HistoryEntry, Profile};
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodayState {
    /// Nothing scheduled for today; no completion possible
    NoAct,
    Ready { act: Act, completed: bool },
}

pub async fn load_today(store: &Store, user_id: &str, today: NaiveDate) -> Result<TodayState> {
    let Some(act) = store
        .act_for_date(today)
        .await
        .context("Failed to fetch today's act")?
    else {
        return Ok(TodayState::NoAct);
    };

    let completed = store
        .completion_for(user_id, act.id)
        .await
        .context("Failed to check completion")?
        .is_some();

    Ok(TodayState::Ready { act, completed })
}

pub async fn complete_act(store: &Store, user_id: &str, act: &Act, today: NaiveDate) -> Result<CompletionOutcome> {
    let outcome = store
        .complete_act(user_id, act.id, today)
        .await
        .with_context(|| format!("Failed to complete act {}", act.id))?;

    match &outcome {
        CompletionOutcome::Recorded(profile) => tracing::info!(
            "{} completed '{}' (streak {} / best {})",
            user_id,
            act.title,
            profile.current_streak,
            profile.best_streak
        ),
        CompletionOutcome::AlreadyCompleted => {
            tracing::info!("{} already completed '{}'", user_id, act.title)
        }
    }

    Ok(outcome)
}

/// Profile counters for the streak view; a user without a profile has no streak yet
pub async fn load_streak(store: &Store, user_id: &str) -> Result<Profile> {
    let profile = store
        .profile(user_id)
        .await
        .context("Failed to fetch profile")?;
    Ok(profile.unwrap_or_else(|| Profile::new(user_id)))
}

pub async fn load_history(store: &Store, user_id: &str, today: NaiveDate, days: u32) -> Result<Vec<HistoryEntry>> {
    let acts = store
        .acts_between(history::window_start(today, days), today)
        .await
        .context("Failed to fetch acts")?;
    let completions = store
        .completions_for_user(user_id)
        .await
        .context("Failed to fetch completions")?;

    Ok(history::build_history(&acts, &completions, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewAct;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    async fn schedule(store: &Store, d: u32) -> Act {
        store
            .upsert_act(NewAct {
                date: day(d),
                title: format!("Act for day {}", d),
                description: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_no_act_scheduled() {
        let store = Store::open_in_memory().unwrap();
        schedule(&store, 14).await;

        let state = load_today(&store, "alice", day(15)).await.unwrap();
        assert_eq!(state, TodayState::NoAct);
    }

    #[tokio::test]
    async fn test_today_reflects_completion() {
        let store = Store::open_in_memory().unwrap();
        let act = schedule(&store, 15).await;

        let state = load_today(&store, "alice", day(15)).await.unwrap();
        assert_eq!(state, TodayState::Ready { act: act.clone(), completed: false });

        complete_act(&store, "alice", &act, day(15)).await.unwrap();

        let state = load_today(&store, "alice", day(15)).await.unwrap();
        assert_eq!(state, TodayState::Ready { act, completed: true });
    }

    #[tokio::test]
    async fn test_streak_defaults_to_zero() {
        let store = Store::open_in_memory().unwrap();
        let profile = load_streak(&store, "alice").await.unwrap();

        assert_eq!(profile.current_streak, 0);
        assert_eq!(profile.best_streak, 0);
    }

    #[tokio::test]
    async fn test_three_day_run() {
        let store = Store::open_in_memory().unwrap();
        for d in [13, 14, 15] {
            let act = schedule(&store, d).await;
            complete_act(&store, "alice", &act, day(d)).await.unwrap();
        }

        let profile = load_streak(&store, "alice").await.unwrap();
        assert_eq!(profile.current_streak, 3);
        assert_eq!(profile.best_streak, 3);
    }

    #[tokio::test]
    async fn test_history_hides_open_today_and_window() {
        let store = Store::open_in_memory().unwrap();
        // Outside the window, inside it, today and tomorrow
        let old = store
            .upsert_act(NewAct {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                title: "Old".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let past = schedule(&store, 10).await;
        let today = schedule(&store, 15).await;
        schedule(&store, 16).await;

        let entries = load_history(&store, "alice", day(15), history::HISTORY_DAYS).await.unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.act.id).collect();
        assert_eq!(ids, vec![past.id]);
        assert!(!entries[0].completed);
        assert!(!ids.contains(&old.id));

        complete_act(&store, "alice", &today, day(15)).await.unwrap();

        let entries = load_history(&store, "alice", day(15), history::HISTORY_DAYS).await.unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.act.id).collect();
        assert_eq!(ids, vec![today.id, past.id]);
        assert!(entries[0].completed);
    }

    #[tokio::test]
    async fn test_history_with_oversized_window() {
        let store = Store::open_in_memory().unwrap();
        let past = schedule(&store, 10).await;

        let entries = load_history(&store, "alice", day(15), 100_000_000).await.unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.act.id).collect();
        assert_eq!(ids, vec![past.id]);
    }
}
