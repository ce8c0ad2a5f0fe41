//! Kindify colour palette
//! Defaults can be overridden from `<config_dir>/kindify/theme.conf` (kitty.conf syntax)

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Theme colors for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub primary: Color,      // Title, active tab, act heading
    pub celebration: Color,  // Best streak, celebration popup
    pub success: Color,      // Completed markers
    pub danger: Color,       // Failure notices
    pub text: Color,         // Primary text
    pub text_dim: Color,     // Secondary text, missed acts
    pub bg_selected: Color,  // Selected history row
    pub inactive: Color,     // Inactive borders and tabs
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Rgb(255, 107, 107),     // #FF6B6B
            celebration: Color::Rgb(255, 230, 109), // #FFE66D
            success: Color::Rgb(78, 205, 196),      // #4ECDC4
            danger: Color::Rgb(243, 139, 168),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
        }
    }
}

impl Theme {
    /// Defaults, with any overrides from the user's theme file applied
    pub fn load() -> Self {
        let Ok(dir) = crate::config::AppConfig::config_dir() else {
            return Self::default();
        };
        Self::load_from(&dir.join("theme.conf"))
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::default().with_overrides(&Self::parse_kitty_conf(&content)),
            Err(_) => Self::default(),
        }
    }

    fn with_overrides(mut self, colors: &HashMap<String, Color>) -> Self {
        let slots: [(&str, &mut Color); 8] = [
            ("primary", &mut self.primary),
            ("celebration", &mut self.celebration),
            ("success", &mut self.success),
            ("danger", &mut self.danger),
            ("foreground", &mut self.text),
            ("dim", &mut self.text_dim),
            ("selection_background", &mut self.bg_selected),
            ("inactive_border_color", &mut self.inactive),
        ];

        for (key, slot) in slots {
            if let Some(color) = colors.get(key) {
                *slot = *color;
            }
        }
        self
    }

    /// Parse kitty.conf format: `key value` or `key #hexcolor`
    fn parse_kitty_conf(content: &str) -> HashMap<String, Color> {
        let mut colors = HashMap::new();

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.splitn(2, char::is_whitespace).collect();
            if parts.len() == 2 {
                if let Some(color) = Self::parse_hex_color(parts[1]) {
                    colors.insert(parts[0].trim().to_string(), color);
                }
            }
        }

        colors
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        // Byte slicing below needs plain hex digits
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}
