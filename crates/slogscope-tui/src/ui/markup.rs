use ratatui::{
    style::{Modifier, Style},
    text::Span,
};
use unicode_width::UnicodeWidthChar;

use slogscope_logs::display_segments;

/// Longest prefix of `s` that fits in `max_width` terminal columns
pub fn truncate_to_width(s: &str, max_width: usize) -> &str {
    let mut width = 0;
    for (idx, c) in s.char_indices() {
        width += c.width().unwrap_or(0);
        if width > max_width {
            return &s[..idx];
        }
    }
    s
}

/// Render color-tagged display text as spans, cut to `max_width` columns
///
/// Only the first line is used. Tagged segments take their tag color in bold;
/// the rest uses `base`.
pub fn markup_spans(text: &str, base: Style, max_width: usize) -> Vec<Span<'static>> {
    let first_line = text.lines().next().unwrap_or("");
    let mut remaining = max_width;
    let mut spans = Vec::new();

    for (color, segment) in display_segments(first_line) {
        if remaining == 0 {
            break;
        }
        let fitted = truncate_to_width(segment, remaining);
        remaining -= fitted.chars().map(|c| c.width().unwrap_or(0)).sum::<usize>();

        let style = match color {
            Some(color) => Style::default()
                .fg(color.to_color())
                .add_modifier(Modifier::BOLD),
            None => base,
        };
        spans.push(Span::styled(fitted.to_string(), style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_truncate_ascii_and_wide() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("hello", 10), "hello");
        // CJK characters are two columns wide
        assert_eq!(truncate_to_width("日本語", 5), "日本");
        assert_eq!(truncate_to_width("", 5), "");
    }

    #[test]
    fn test_markup_colors_group_label() {
        let text = "[12:00:00] <color=#FF0000FF>[Net]</color> down";
        let spans = markup_spans(text, Style::default(), 80);

        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].content, "[12:00:00] ");
        assert_eq!(spans[1].content, "[Net]");
        assert_eq!(spans[1].style.fg, Some(Color::Rgb(0xFF, 0, 0)));
        assert_eq!(spans[2].content, " down");
    }

    #[test]
    fn test_markup_truncates_and_uses_first_line() {
        let text = "[12:00:00] <color=#FFFFFFFF>[UI]</color> first\nsecond";
        let spans = markup_spans(text, Style::default(), 13);
        let rendered: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(rendered, "[12:00:00] [U");
    }
}
