use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The kindness task scheduled for a single calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Act {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// An act to be scheduled (from the CLI or an imported schedule file)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAct {
    pub date: NaiveDate,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Schedule file layout: a list of `[[acts]]` tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActSchedule {
    #[serde(default)]
    pub acts: Vec<NewAct>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub user_id: String,
    pub act_id: i64,
    pub date: NaiveDate,
}

/// Per-user streak counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub current_streak: u32,
    pub best_streak: u32,
    pub last_completion_date: Option<NaiveDate>,
}

impl Profile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            current_streak: 0,
            best_streak: 0,
            last_completion_date: None,
        }
    }
}

/// One row of the history list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub act: Act,
    pub completed: bool,
}

/// What happened when the user asked to complete an act
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// New completion row written, profile updated
    Recorded(Profile),
    /// The (user, act) pair was already completed; nothing changed
    AlreadyCompleted,
}
