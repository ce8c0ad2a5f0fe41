mod components;

use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Popup, Tab, TodayView};
use crate::streak;
use crate::theme::Theme;
use components::{centered_rect, key_hints, short_date};

static THEME: OnceLock<Theme> = OnceLock::new();

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::load)
}

fn primary() -> Color { theme().primary }
fn celebration() -> Color { theme().celebration }
fn success() -> Color { theme().success }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn inactive() -> Color { theme().inactive }

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Tabs
            Constraint::Min(6),    // Active view
            Constraint::Length(1), // Info line
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    draw_title(f, app, chunks[0]);
    draw_tabs(f, app, chunks[1]);
    match app.tab {
        Tab::Today => draw_today(f, app, chunks[2]),
        Tab::Streak => draw_streak(f, app, chunks[2]),
        Tab::History => draw_history(f, app, chunks[2]),
    }
    draw_info_line(f, app, chunks[3]);
    draw_footer(f, app, chunks[4]);

    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f),
        Popup::Celebrate => draw_celebrate_popup(f, app),
    }
}

fn draw_title(f: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" ♥ Kindify", Style::default().fg(primary()).add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {} · {}", app.user_id(), app.date.format("%A, %B %-d")), Style::default().fg(text_dim())),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!(" {} {} ", i + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(inactive())),
        )
        .style(Style::default().fg(text_dim()))
        .highlight_style(Style::default().fg(primary()).add_modifier(Modifier::BOLD))
        .divider(Span::styled("│", Style::default().fg(inactive())));

    f.render_widget(tabs, area);
}

fn view_block(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(format!(" {} ", title), Style::default().fg(primary()).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(primary()))
}

fn centered_message(f: &mut Frame, area: Rect, block: Block, lines: Vec<Line>) {
    let mut padded = vec![Line::from(""); (area.height as usize / 3).saturating_sub(1)];
    padded.extend(lines);
    let content = Paragraph::new(padded)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(content, area);
}

fn draw_today(f: &mut Frame, app: &App, area: Rect) {
    let block = view_block("Today's Act of Kindness");

    match &app.today {
        TodayView::Loading => centered_message(f, area, block, vec![
            Line::from(Span::styled("Loading today's kindness...", Style::default().fg(text_dim()))),
        ]),
        TodayView::NoAct => centered_message(f, area, block, vec![
            Line::from(Span::styled("♡", Style::default().fg(text_dim()))),
            Line::from(Span::styled("No act scheduled for today", Style::default().fg(text_dim()))),
        ]),
        TodayView::Failed => centered_message(f, area, block, vec![
            Line::from(Span::styled("Couldn't load today's act", Style::default().fg(danger()))),
            Line::from(Span::styled("Press r to try again", Style::default().fg(text_dim()))),
        ]),
        TodayView::Ready { act, completed } => {
            let mut lines = vec![
                Line::from(Span::styled("Small acts, big impact", Style::default().fg(text_dim()))),
                Line::from(""),
                Line::from(Span::styled(act.title.as_str(), Style::default().fg(primary()).add_modifier(Modifier::BOLD))),
            ];
            if let Some(description) = &act.description {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(description.as_str(), Style::default().fg(text()))));
            }
            lines.push(Line::from(""));

            if *completed {
                lines.push(Line::from(Span::styled("✓ Completed!", Style::default().fg(success()).add_modifier(Modifier::BOLD))));
                lines.push(Line::from(Span::styled(
                    "You've made the world a little brighter today",
                    Style::default().fg(text_dim()),
                )));
            } else {
                lines.push(Line::from(vec![
                    Span::styled("[ Space ]", Style::default().fg(primary()).add_modifier(Modifier::BOLD)),
                    Span::styled(" Mark as Complete", Style::default().fg(text())),
                ]));
            }

            centered_message(f, area, block, lines);
        }
    }
}

fn draw_streak(f: &mut Frame, app: &App, area: Rect) {
    let Some(profile) = &app.profile else {
        centered_message(f, area, view_block("Your Kindness Streak"), vec![
            Line::from(Span::styled("Loading your progress...", Style::default().fg(text_dim()))),
        ]);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(4)])
        .split(area);

    let mut current = vec![
        Line::from(Span::styled(
            profile.current_streak.to_string(),
            Style::default().fg(primary()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("Current Streak", Style::default().fg(text()).add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(streak::encouragement(profile.current_streak), Style::default().fg(text_dim()))),
    ];
    if profile.current_streak > 0 {
        current.push(Line::from(""));
        current.push(Line::from(Span::styled(
            "Keep going! Complete your act every day to maintain your streak",
            Style::default().fg(text_dim()),
        )));
    }
    centered_message(f, chunks[0], view_block("Your Kindness Streak"), current);

    let best = Paragraph::new(vec![
        Line::from(Span::styled("Best Streak", Style::default().fg(text_dim()))),
        Line::from(Span::styled(
            profile.best_streak.to_string(),
            Style::default().fg(celebration()).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(Span::styled(" 🏆 ", Style::default().fg(celebration())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(celebration())),
    );
    f.render_widget(best, chunks[1]);
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let block = view_block("Your Kindness Journey");

    let Some(entries) = &app.history else {
        centered_message(f, area, block, vec![
            Line::from(Span::styled("Loading your history...", Style::default().fg(text_dim()))),
        ]);
        return;
    };

    if entries.is_empty() {
        centered_message(f, area, block, vec![
            Line::from(Span::styled("No history yet", Style::default().fg(text_dim()))),
            Line::from(Span::styled("Start completing acts to build your history", Style::default().fg(text_dim()))),
        ]);
        return;
    }

    let rows: Vec<Row> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let (icon, status, color) = if entry.completed {
                ("✓", "Completed", success())
            } else {
                ("✗", "Missed", text_dim())
            };
            let title_color = if entry.completed { text() } else { text_dim() };

            let row_style = if i == app.history_selected {
                Style::default().bg(bg_selected()).fg(text())
            } else {
                Style::default()
            };

            Row::new(vec![
                Span::styled(icon, Style::default().fg(color)),
                Span::styled(entry.act.title.as_str(), Style::default().fg(title_color)),
                Span::styled(status, Style::default().fg(color)),
                Span::styled(short_date(entry.act.date), Style::default().fg(text_dim())),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(10),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths).block(block);
    let mut state = TableState::default().with_selected(Some(app.history_selected));
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(ref status) = app.status_message {
        let color = if app.status_is_error { danger() } else { success() };
        Line::from(Span::styled(status.as_str(), Style::default().fg(color)))
    } else {
        Line::from(Span::styled("Ready", Style::default().fg(text_dim())))
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<(&str, &str)> = match app.tab {
        Tab::Today => vec![("Space", "Complete"), ("Tab", "Next"), ("r", "Refresh"), ("?", "Help"), ("q", "Quit")],
        Tab::Streak => vec![("Tab", "Next"), ("r", "Refresh"), ("?", "Help"), ("q", "Quit")],
        Tab::History => vec![("↑↓", "Scroll"), ("Tab", "Next"), ("r", "Refresh"), ("?", "Help"), ("q", "Quit")],
    };

    let footer = Paragraph::new(Line::from(key_hints(&hints, area.width, primary(), text_dim())))
        .alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_celebrate_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(50, 30, f.area());
    f.render_widget(Clear, popup_area);

    let streak_line = match &app.profile {
        Some(p) if p.current_streak > 0 => format!("Streak: {} day(s)", p.current_streak),
        _ => String::new(),
    };

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("✨ 🎉 ✨", Style::default().fg(celebration()))),
        Line::from(Span::styled(
            "Amazing! You've completed today's act of kindness!",
            Style::default().fg(text()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(streak_line, Style::default().fg(primary()))),
        Line::from(""),
        Line::from(Span::styled("Press any key", Style::default().fg(text_dim()))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Well done ", Style::default().fg(celebration())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(celebration())),
    );

    f.render_widget(content, popup_area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 30 { 95 } else { 75 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(primary()).add_modifier(Modifier::BOLD)))
    };
    let entry = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(key, Style::default().fg(primary())),
            Span::raw(desc),
        ])
    };

    let help_text = vec![
        section("═══ Navigation ═══"),
        entry("  Tab/→/l   ", "Next tab (Today → Streak → History)"),
        entry("  S-Tab/←/h ", "Previous tab"),
        entry("  1 2 3     ", "Jump to a tab"),
        entry("  ↑/↓ j/k   ", "Scroll history"),
        Line::from(""),
        section("═══ Actions ═══"),
        entry("  Space     ", "Mark today's act as complete"),
        entry("  r         ", "Reload from the database"),
        entry("  ?         ", "This help"),
        entry("  q         ", "Quit"),
        Line::from(""),
        section("═══ Command Line ═══"),
        entry("  kindify --status                 ", "JSON summary for status bars"),
        entry("  kindify --complete               ", "Complete today's act"),
        entry("  kindify --history                ", "Print recent history"),
        entry("  kindify --add-act DATE TITLE     ", "Schedule an act"),
        entry("  kindify --import-acts FILE       ", "Schedule acts from TOML"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(primary())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(primary())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" ♥ Kindify Help ", Style::default().fg(primary())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(primary())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::model::NewAct;
    use crate::store::Store;
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    fn config() -> AppConfig {
        AppConfig {
            user_id: "alice".to_string(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_renders_no_act_message() {
        let store = Store::open_in_memory().unwrap();
        let app = App::with_clock(store, config(), fixed_today).await.unwrap();

        assert!(rendered(&app).contains("No act scheduled for today"));
    }

    #[tokio::test]
    async fn test_renders_each_tab() {
        let store = Store::open_in_memory().unwrap();
        store
            .upsert_act(NewAct {
                date: fixed_today(),
                title: "Water a neighbour's plants".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let mut app = App::with_clock(store, config(), fixed_today).await.unwrap();

        assert!(rendered(&app).contains("Mark as Complete"));

        app.tab = Tab::Streak;
        assert!(rendered(&app).contains("Complete today's act to start your streak!"));

        app.tab = Tab::History;
        assert!(rendered(&app).contains("No history yet"));
    }

    #[tokio::test]
    async fn test_renders_completed_after_space() {
        let store = Store::open_in_memory().unwrap();
        store
            .upsert_act(NewAct {
                date: fixed_today(),
                title: "Call an old friend".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let mut app = App::with_clock(store, config(), fixed_today).await.unwrap();

        app.handle_key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)).await.unwrap();
        assert!(rendered(&app).contains("Amazing!"));

        app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)).await.unwrap();
        let screen = rendered(&app);
        assert!(screen.contains("Completed!"));
        assert!(!screen.contains("Mark as Complete"));
    }
}
