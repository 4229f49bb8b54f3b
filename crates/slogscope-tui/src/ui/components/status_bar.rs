use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::app::StatusMessage;
use crate::ui::Theme;

/// Status bar: key hints or a message on the left, summary on the right
pub struct StatusBar<'a> {
    hints: Vec<(&'a str, &'a str)>,
    message: Option<&'a StatusMessage>,
    right_text: Option<String>,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self {
            hints: Vec::new(),
            message: None,
            right_text: None,
        }
    }

    /// Add keyboard hints as (key, description) pairs
    pub fn hints<I>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.hints = hints.into_iter().collect();
        self
    }

    /// Show a message instead of the hints
    pub fn message(mut self, message: Option<&'a StatusMessage>) -> Self {
        self.message = message;
        self
    }

    /// Set text to display on the right side
    pub fn right<S: Into<String>>(mut self, text: S) -> Self {
        self.right_text = Some(text.into());
        self
    }
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::status_bar());

        let line = match self.message {
            Some(message) => {
                let style: Style = if message.is_error {
                    Theme::status_error()
                } else {
                    Theme::status_bar_key()
                };
                Line::from(Span::styled(format!(" {} ", message.text), style))
            }
            None => {
                let mut spans = Vec::new();
                for (i, (key, desc)) in self.hints.iter().enumerate() {
                    if i > 0 {
                        spans.push(Span::styled(" ", Theme::status_bar()));
                    }
                    spans.push(Span::styled(format!("[{key}]"), Theme::status_bar_key()));
                    spans.push(Span::styled(desc.to_string(), Theme::status_bar()));
                }
                Line::from(spans)
            }
        };
        let line_width = line.width() as u16;

        buf.set_line(area.x + 1, area.y, &line, area.width.saturating_sub(2));

        // Right text only when it does not collide with the left side
        if let Some(right) = self.right_text {
            let right_width = right.width() as u16;
            let right_x = area.x + area.width.saturating_sub(right_width + 1);
            if right_x > area.x + line_width + 2 {
                buf.set_span(
                    right_x,
                    area.y,
                    &Span::styled(right, Theme::status_bar()),
                    right_width,
                );
            }
        }
    }
}

/// Key hints for the console list
pub fn console_hints() -> Vec<(&'static str, &'static str)> {
    vec![
        ("e/w/i", "Levels"),
        ("c", "Collapse"),
        ("p", "Groups"),
        ("/", "Search"),
        ("Enter", "Open"),
        ("Tab", "Trace"),
        ("?", "Help"),
        ("q", "Quit"),
    ]
}

/// Key hints while the detail pane has focus
pub fn detail_hints() -> Vec<(&'static str, &'static str)> {
    vec![
        ("↑/k", "Up"),
        ("↓/j", "Down"),
        ("Enter", "Open frame"),
        ("Tab", "Back"),
    ]
}
