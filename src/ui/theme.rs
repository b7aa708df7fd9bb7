//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── table ──────────────────────────────────────────────────
    pub fn row_title_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn entry_label_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn value_style() -> Style {
        Style::default().fg(Color::White)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn error_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD)
    }
}
