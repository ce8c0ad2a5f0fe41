mod app;
mod config;
mod history;
mod model;
mod service;
mod store;
mod streak;
mod theme;
mod ui;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use config::AppConfig;
use model::{ActSchedule, CompletionOutcome, NewAct};
use service::TodayState;
use store::Store;

#[derive(Parser, Debug)]
#[command(name = "kindify")]
#[command(version)]
#[command(about = "One small act of kindness a day, with a streak to keep")]
struct Args {
    /// Print today's act and streak as JSON (for status bars)
    #[arg(short, long)]
    status: bool,

    /// Mark today's act as complete
    #[arg(short, long)]
    complete: bool,

    /// Print recent history
    #[arg(long)]
    history: bool,

    /// Schedule an act: --add-act 2026-10-19 "Hold the door"
    #[arg(long, num_args = 2, value_names = ["DATE", "TITLE"])]
    add_act: Option<Vec<String>>,

    /// Description for --add-act
    #[arg(long, requires = "add_act")]
    description: Option<String>,

    /// Schedule acts from a TOML file of [[acts]] entries
    #[arg(long, value_name = "FILE")]
    import_acts: Option<PathBuf>,

    /// Track this user instead of the configured one
    #[arg(short, long)]
    user: Option<String>,

    /// Use this database file instead of the configured one
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load().unwrap_or_default();
    if let Some(user) = args.user.clone() {
        config.user_id = user;
    }
    if let Some(db) = args.db.clone() {
        config.database_path = Some(db);
    }

    let db_path = config.database_path()?;
    let store = Store::open(&db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
    let today = chrono::Local::now().date_naive();

    if let Some(values) = args.add_act {
        return add_act(&store, &values, args.description).await;
    }

    if let Some(path) = args.import_acts {
        return import_acts(&store, &path).await;
    }

    if args.complete {
        return complete_today(&store, &config, today).await;
    }

    if args.status {
        return print_status(&store, &config, today).await;
    }

    if args.history {
        return print_history(&store, &config, today).await;
    }

    run_tui(store, config).await
}

async fn add_act(store: &Store, values: &[String], description: Option<String>) -> Result<()> {
    let [date, title] = values else {
        anyhow::bail!("--add-act takes a DATE and a TITLE");
    };
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date))?;

    let act = store
        .upsert_act(NewAct {
            date,
            title: title.clone(),
            description,
        })
        .await?;

    tracing::info!("Scheduled act {} for {}", act.id, act.date);
    println!("Scheduled \"{}\" for {}", act.title, act.date);
    Ok(())
}

async fn import_acts(store: &Store, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let schedule: ActSchedule = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let count = schedule.acts.len();
    for act in schedule.acts {
        store.upsert_act(act).await?;
    }

    tracing::info!("Imported {} acts from {}", count, path.display());
    println!("Imported {} acts", count);
    Ok(())
}

async fn complete_today(store: &Store, config: &AppConfig, today: NaiveDate) -> Result<()> {
    let TodayState::Ready { act, .. } = service::load_today(store, &config.user_id, today).await? else {
        println!("No act scheduled for today");
        return Ok(());
    };

    match service::complete_act(store, &config.user_id, &act, today).await? {
        CompletionOutcome::Recorded(profile) => {
            println!(
                "Completed \"{}\"! Streak: {} (best {})",
                act.title, profile.current_streak, profile.best_streak
            );
            if config.notifications {
                app::notify_completed(&act, &profile);
            }
        }
        CompletionOutcome::AlreadyCompleted => println!("Already completed \"{}\" today", act.title),
    }
    Ok(())
}

async fn print_status(store: &Store, config: &AppConfig, today: NaiveDate) -> Result<()> {
    let state = service::load_today(store, &config.user_id, today).await?;
    let profile = service::load_streak(store, &config.user_id).await?;

    let (act, completed) = match &state {
        TodayState::Ready { act, completed } => (Some(act), *completed),
        TodayState::NoAct => (None, false),
    };

    let class = match (act, completed) {
        (None, _) => "none",
        (Some(_), true) => "completed",
        (Some(_), false) => "pending",
    };

    let tooltip = match act {
        Some(act) if completed => format!("✓ {}\nStreak {} · Best {}", act.title, profile.current_streak, profile.best_streak),
        Some(act) => format!("{}\nStreak {} · Best {}", act.title, profile.current_streak, profile.best_streak),
        None => "No act scheduled for today".to_string(),
    };

    let output = serde_json::json!({
        "text": profile.current_streak.to_string(),
        "tooltip": tooltip,
        "class": class,
        "alt": class,
        "date": today,
        "act": act,
        "completed": completed,
        "current_streak": profile.current_streak,
        "best_streak": profile.best_streak,
    });

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

async fn print_history(store: &Store, config: &AppConfig, today: NaiveDate) -> Result<()> {
    let entries = service::load_history(store, &config.user_id, today, config.history_days).await?;

    if entries.is_empty() {
        println!("No history yet");
        return Ok(());
    }

    for entry in entries {
        let mark = if entry.completed { "✓ Completed" } else { "✗ Missed   " };
        println!("{}  {}  {}", entry.act.date, mark, entry.act.title);
    }
    Ok(())
}

async fn run_tui(store: Store, config: AppConfig) -> Result<()> {
    // Load before touching the terminal so errors print normally
    let mut app = App::new(store, config).await?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            if let Err(e) = app.handle_key(key).await {
                                tracing::error!("Key handling failed: {:#}", e);
                            }
                        }
                    }
                }
            }
        }

        if let Err(e) = app.tick().await {
            tracing::error!("Refresh failed: {:#}", e);
        }
    }
}
