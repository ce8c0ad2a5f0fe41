use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::model::{Act, CompletionOutcome, HistoryEntry, Profile};
use crate::service::{self, TodayState};
use crate::store::Store;

/// How long a status notice stays on the info line
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Today,
    Streak,
    History,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Today, Tab::Streak, Tab::History];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Today => "Today",
            Tab::Streak => "Streak",
            Tab::History => "History",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Today => 0,
            Tab::Streak => 1,
            Tab::History => 2,
        }
    }

    fn next(self) -> Self {
        match self {
            Tab::Today => Tab::Streak,
            Tab::Streak => Tab::History,
            Tab::History => Tab::Today,
        }
    }

    fn prev(self) -> Self {
        match self {
            Tab::Today => Tab::History,
            Tab::Streak => Tab::Today,
            Tab::History => Tab::Streak,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    Celebrate,
}

/// What the Today tab is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodayView {
    Loading,
    NoAct,
    Failed,
    Ready { act: Act, completed: bool },
}

pub struct App {
    pub tab: Tab,
    pub popup: Popup,

    store: Store,
    pub config: AppConfig,
    clock: fn() -> NaiveDate,
    pub date: NaiveDate,

    // Today tab
    pub today: TodayView,

    // Streak tab (None until first load)
    pub profile: Option<Profile>,

    // History tab
    pub history: Option<Vec<HistoryEntry>>,
    pub history_selected: usize,

    // Bumped after a completion; streak/history reload when they see a new value
    pub refresh_trigger: u64,
    streak_seen: Option<u64>,
    history_seen: Option<u64>,

    // Status notice (auto-clears after STATUS_TIMEOUT)
    pub status_message: Option<String>,
    pub status_is_error: bool,
    status_message_time: Option<Instant>,
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl App {
    pub async fn new(store: Store, config: AppConfig) -> Result<Self> {
        Self::with_clock(store, config, local_today).await
    }

    pub async fn with_clock(store: Store, config: AppConfig, clock: fn() -> NaiveDate) -> Result<Self> {
        let mut app = Self {
            tab: Tab::Today,
            popup: Popup::None,

            store,
            config,
            clock,
            date: clock(),

            today: TodayView::Loading,

            profile: None,

            history: None,
            history_selected: 0,

            refresh_trigger: 0,
            streak_seen: None,
            history_seen: None,

            status_message: None,
            status_is_error: false,
            status_message_time: None,
        };

        app.load_today().await;
        app.tick().await?;
        Ok(app)
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = false;
        self.status_message_time = Some(Instant::now());
    }

    fn set_error(&mut self, msg: impl Into<String>) {
        self.set_status(msg);
        self.status_is_error = true;
    }

    pub fn user_id(&self) -> &str {
        &self.config.user_id
    }

    /// The act the completion action applies to, if one is available
    pub fn completable_act(&self) -> Option<&Act> {
        match &self.today {
            TodayView::Ready { act, completed: false } => Some(act),
            _ => None,
        }
    }

    pub async fn load_today(&mut self) {
        match service::load_today(&self.store, &self.config.user_id, self.date).await {
            Ok(TodayState::NoAct) => self.today = TodayView::NoAct,
            Ok(TodayState::Ready { act, completed }) => self.today = TodayView::Ready { act, completed },
            Err(e) => {
                tracing::error!("Error fetching today act: {:#}", e);
                self.today = TodayView::Failed;
                self.set_error("Couldn't load today's act");
            }
        }
    }

    async fn load_streak(&mut self) {
        match service::load_streak(&self.store, &self.config.user_id).await {
            Ok(profile) => self.profile = Some(profile),
            Err(e) => {
                tracing::error!("Error fetching streaks: {:#}", e);
                self.set_error("Couldn't load your streak");
            }
        }
    }

    async fn load_history(&mut self) {
        let days = self.config.history_days;
        match service::load_history(&self.store, &self.config.user_id, self.date, days).await {
            Ok(entries) => {
                self.history_selected = self.history_selected.min(entries.len().saturating_sub(1));
                self.history = Some(entries);
            }
            Err(e) => {
                tracing::error!("Error fetching history: {:#}", e);
                self.set_error("Couldn't load your history");
            }
        }
    }

    /// Record today's completion and bump the refresh counter.
    ///
    /// The event loop awaits this call, so further key presses queue until the
    /// store answers and a repeat press sees the act as completed.
    pub async fn complete_today(&mut self) -> Result<()> {
        let Some(act) = self.completable_act().cloned() else {
            return Ok(());
        };

        match service::complete_act(&self.store, &self.config.user_id, &act, self.date).await {
            Ok(outcome) => {
                self.today = TodayView::Ready { act: act.clone(), completed: true };
                match outcome {
                    CompletionOutcome::Recorded(profile) => {
                        self.popup = Popup::Celebrate;
                        if self.config.notifications {
                            notify_completed(&act, &profile);
                        }
                        self.set_status("Amazing! You've completed today's act of kindness!");
                    }
                    CompletionOutcome::AlreadyCompleted => self.set_status("Already completed today"),
                }
                self.refresh_trigger += 1;
            }
            Err(e) => {
                tracing::error!("Error completing act: {:#}", e);
                self.set_error("Couldn't mark as complete. Please try again.");
            }
        }
        Ok(())
    }

    /// Reload everything from the store
    pub async fn refresh(&mut self) -> Result<()> {
        self.load_today().await;
        self.refresh_trigger += 1;
        self.tick().await
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        match key.code {
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.tab = self.tab.prev(),
            KeyCode::Char('1') => self.tab = Tab::Today,
            KeyCode::Char('2') => self.tab = Tab::Streak,
            KeyCode::Char('3') => self.tab = Tab::History,

            KeyCode::Char(' ') | KeyCode::Enter if self.tab == Tab::Today => {
                self.complete_today().await?;
            }

            KeyCode::Char('j') | KeyCode::Down if self.tab == Tab::History => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up if self.tab == Tab::History => self.move_up(),

            KeyCode::Char('R') | KeyCode::Char('r') => {
                self.refresh().await?;
                self.set_status("Refreshed");
            }

            KeyCode::Char('?') => self.popup = Popup::Help,

            _ => {}
        }
        Ok(())
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q')) {
                    self.popup = Popup::None;
                }
            }
            // Any key dismisses the celebration
            Popup::Celebrate => self.popup = Popup::None,
            Popup::None => {}
        }
        Ok(())
    }

    fn move_down(&mut self) {
        let len = self.history.as_ref().map(Vec::len).unwrap_or(0);
        if len > 0 && self.history_selected + 1 < len {
            self.history_selected += 1;
        }
    }

    fn move_up(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    /// Periodic housekeeping: clear stale notices, follow the date, reload views on refresh
    pub async fn tick(&mut self) -> Result<()> {
        if let Some(at) = self.status_message_time {
            if at.elapsed() >= STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
                self.status_is_error = false;
            }
        }

        let date = (self.clock)();
        if date != self.date {
            tracing::info!("Date rolled over to {}", date);
            self.date = date;
            self.load_today().await;
            self.refresh_trigger += 1;
        }

        if self.streak_seen != Some(self.refresh_trigger) {
            self.streak_seen = Some(self.refresh_trigger);
            self.load_streak().await;
        }
        if self.history_seen != Some(self.refresh_trigger) {
            self.history_seen = Some(self.refresh_trigger);
            self.load_history().await;
        }
        Ok(())
    }
}

/// Desktop notification for a fresh completion; failures are only logged
pub fn notify_completed(act: &Act, profile: &Profile) {
    let body = format!("{} (streak: {})", act.title, profile.current_streak);
    if let Err(e) = notify_rust::Notification::new()
        .summary("Kindify")
        .body(&body)
        .icon("emblem-favorite")
        .show()
    {
        tracing::warn!("Could not show notification: {}", e);
    }
}
