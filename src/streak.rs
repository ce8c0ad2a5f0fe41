//! Streak bookkeeping for a single completion event

use chrono::{Duration, NaiveDate};

use crate::model::Profile;

/// Apply a completion made on `today` to the profile counters.
///
/// The day after the last completion extends the streak, a repeat on the
/// same day leaves it alone, and anything else starts over at 1.
pub fn apply_completion(profile: &Profile, today: NaiveDate) -> Profile {
    let yesterday = today - Duration::days(1);

    let current_streak = match profile.last_completion_date {
        Some(last) if last == yesterday => profile.current_streak + 1,
        Some(last) if last == today => profile.current_streak,
        _ => 1,
    };

    Profile {
        id: profile.id.clone(),
        current_streak,
        best_streak: profile.best_streak.max(current_streak),
        last_completion_date: Some(today),
    }
}

/// Encouragement line shown under the current streak
pub fn encouragement(current_streak: u32) -> &'static str {
    match current_streak {
        0 => "Complete today's act to start your streak!",
        1 => "Great start! Keep it going!",
        2..=6 => "You're on fire!",
        7..=29 => "Incredible dedication!",
        _ => "You're a kindness champion!",
    }
}
