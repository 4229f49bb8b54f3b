use ratatui::style::{Color, Modifier, Style};

use slogscope_types::Severity;

/// Color theme for the application
pub struct Theme;

impl Theme {
    // Base colors
    pub const BG: Color = Color::Reset;
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;

    // Accent colors
    pub const PRIMARY: Color = Color::Cyan;
    pub const HIGHLIGHT: Color = Color::Yellow;

    // Severity colors
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Gray;

    pub fn severity(severity: Severity) -> Color {
        match severity {
            Severity::Error => Self::ERROR,
            Severity::Warning => Self::WARNING,
            Severity::Info => Self::INFO,
        }
    }

    /// Message text style for a severity
    pub fn message(severity: Severity) -> Style {
        Style::default().fg(Self::severity(severity))
    }

    /// Toolbar toggle: bold when shown, dim and struck through when hidden
    pub fn toggle(severity: Severity, visible: bool) -> Style {
        if visible {
            Style::default()
                .fg(Self::severity(severity))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Self::FG_DIM)
                .add_modifier(Modifier::CROSSED_OUT)
        }
    }

    // Border styles
    pub fn border() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    // Text styles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn text_highlight() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    // List styles
    pub fn row_selected() -> Style {
        Style::default().bg(Color::Rgb(0x30, 0x30, 0x40))
    }

    /// Repeat count badge in collapsed mode
    pub fn badge() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Self::FG_DIM)
            .add_modifier(Modifier::BOLD)
    }

    /// Stack-trace line with a source location
    pub fn frame_link() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn frame_cursor() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    // Status bar
    pub fn status_bar() -> Style {
        Style::default().fg(Color::Gray).bg(Color::DarkGray)
    }

    pub fn status_bar_key() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_error() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD)
    }
}
