use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

use crate::model::{Act, Completion, HistoryEntry};

/// Default number of days the history view looks back
pub const HISTORY_DAYS: u32 = 30;

/// First day of the history window ending on `today`; saturates at the earliest representable date
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Merge acts with the user's completions.
///
/// Past acts are always listed. Today's act only shows up once completed so
/// the active day is never reported as missed. Anything after today is
/// dropped. Output is ordered newest first.
pub fn build_history(acts: &[Act], completions: &[Completion], today: NaiveDate) -> Vec<HistoryEntry> {
    let completed: HashSet<i64> = completions.iter().map(|c| c.act_id).collect();

    let mut entries: Vec<HistoryEntry> = acts
        .iter()
        .filter(|act| {
            if act.date < today {
                true
            } else if act.date == today {
                completed.contains(&act.id)
            } else {
                false
            }
        })
        .map(|act| HistoryEntry {
            act: act.clone(),
            completed: completed.contains(&act.id),
        })
        .collect();

    entries.sort_by(|a, b| b.act.date.cmp(&a.act.date));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn act(id: i64, d: u32) -> Act {
        Act {
            id,
            title: format!("Act {}", id),
            description: None,
            date: day(d),
        }
    }

    fn done(act_id: i64, d: u32) -> Completion {
        Completion {
            user_id: "alice".to_string(),
            act_id,
            date: day(d),
        }
    }

    #[test]
    fn test_today_hidden_until_completed() {
        let acts = vec![act(1, 13), act(2, 14), act(3, 15)];

        let history = build_history(&acts, &[], day(15));
        assert!(history.iter().all(|e| e.act.id != 3));
        assert_eq!(history.len(), 2);

        let history = build_history(&acts, &[done(3, 15)], day(15));
        assert_eq!(history[0].act.id, 3);
        assert!(history[0].completed);
    }

    #[test]
    fn test_past_acts_marked_missed_or_completed() {
        let acts = vec![act(1, 13), act(2, 14)];
        let history = build_history(&acts, &[done(1, 13)], day(15));

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].act.id, 2);
        assert!(!history[0].completed);
        assert_eq!(history[1].act.id, 1);
        assert!(history[1].completed);
    }

    #[test]
    fn test_future_acts_excluded() {
        let acts = vec![act(1, 14), act(2, 16), act(3, 20)];
        let history = build_history(&acts, &[done(2, 16)], day(15));

        assert_eq!(history.len(), 1);
        assert!(history.iter().all(|e| e.act.date <= day(15)));
    }

    #[test]
    fn test_sorted_newest_first() {
        let acts = vec![act(1, 2), act(2, 9), act(3, 5)];
        let history = build_history(&acts, &[], day(15));
        let dates: Vec<_> = history.iter().map(|e| e.act.date).collect();

        assert_eq!(dates, vec![day(9), day(5), day(2)]);
    }

    #[test]
    fn test_window_start() {
        assert_eq!(window_start(day(30), HISTORY_DAYS), NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
    }

    #[test]
    fn test_huge_window_saturates() {
        assert_eq!(window_start(day(15), 100_000_000), NaiveDate::MIN);
        assert_eq!(window_start(day(15), u32::MAX), NaiveDate::MIN);
    }
}
