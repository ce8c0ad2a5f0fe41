//! Small rendering helpers shared by the tab views

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Span,
};

/// Footer legend: `key action │ key action │ ...`, trimmed to fit narrow terminals
pub fn key_hints<'a>(hints: &[(&'a str, &'a str)], width: u16, key_color: Color, text_color: Color) -> Vec<Span<'a>> {
    let max_hints = if width < 50 { 3 } else if width < 70 { 4 } else { hints.len() };

    hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(key_color)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_color)),
            ]
        })
        .collect()
}

/// Short history date, e.g. `Jun 5`
pub fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert_eq!(short_date(date), "Jun 5");
    }

    #[test]
    fn test_key_hints_trimmed_on_narrow_width() {
        let hints = [("a", "One"), ("b", "Two"), ("c", "Three"), ("d", "Four"), ("e", "Five")];

        assert_eq!(key_hints(&hints, 40, Color::Red, Color::Gray).len(), 6);
        assert_eq!(key_hints(&hints, 120, Color::Red, Color::Gray).len(), 10);
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(50, 40, outer);

        assert!(inner.x >= outer.x && inner.right() <= outer.right());
        assert!(inner.y >= outer.y && inner.bottom() <= outer.bottom());
        assert_eq!(inner.width, 50);
    }
}
