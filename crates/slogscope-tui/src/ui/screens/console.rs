use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use slogscope_logs::trace_lines;
use slogscope_types::Severity;

use crate::app::{AppState, Focus, ViewRow};
use crate::ui::components::{StatusBar, console_hints, detail_hints};
use crate::ui::markup::markup_spans;
use crate::ui::{Layout, Theme};

/// The console: toolbar, entry list, detail pane and status bar
pub struct ConsoleScreen;

impl ConsoleScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let show_search =
            state.ui_state.search_active || !state.ui_state.filter.query.is_empty();
        let areas = Layout::console(frame.area(), show_search, state.ui_state.detail_height);

        Self::render_toolbar(frame, areas.toolbar, state);
        if let Some(search_area) = areas.search {
            Self::render_search_bar(frame, search_area, state);
        }
        Self::render_list(frame, areas.list, state);
        Self::render_detail(frame, areas.detail, state);
        Self::render_status_bar(frame, areas.status, state);
    }

    fn render_toolbar(frame: &mut Frame, area: Rect, state: &AppState) {
        let ui = &state.ui_state;
        let counts = state.counts();

        let mut spans = vec![
            Span::styled("slogscope", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(state.source_label.clone(), Theme::text()),
            Span::styled(
                if state.source_running { " ●" } else { " ○" },
                Style::default().fg(if state.source_running {
                    Color::Green
                } else {
                    Color::DarkGray
                }),
            ),
            Span::styled(" │ ", Theme::text_dim()),
        ];

        for severity in Severity::ALL {
            let visible = ui.filter.severities.is_visible(severity);
            spans.push(Span::styled(
                format!("{} {}", severity.as_str(), counts.get(severity)),
                Theme::toggle(severity, visible),
            ));
            spans.push(Span::raw(" "));
        }

        spans.push(Span::styled("│ ", Theme::text_dim()));
        let groups: Vec<&str> = ui.filter.groups.iter().collect();
        spans.push(Span::styled("Groups: ", Theme::text_dim()));
        spans.push(Span::styled(groups.join(", "), Theme::text_highlight()));

        if ui.collapse {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            spans.push(Span::styled(
                "Collapsed",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let toolbar = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );
        frame.render_widget(toolbar, area);
    }

    fn render_search_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let ui = &state.ui_state;
        let mut spans = vec![];

        if ui.search_active {
            spans.push(Span::styled(
                " /",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(ui.search_input.clone(), Theme::text_highlight()));
            spans.push(Span::styled(
                "█",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
            spans.push(Span::styled(
                "  [Enter] Keep  [Esc] Cancel",
                Theme::text_dim(),
            ));
        } else {
            spans.push(Span::styled(" Search: ", Theme::text_dim()));
            spans.push(Span::styled(ui.filter.query.clone(), Theme::text_highlight()));
            spans.push(Span::styled("  [n] Clear  [/] Edit", Theme::text_dim()));
        }

        let search_bar = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if ui.search_active {
                    Style::default().fg(Color::Yellow)
                } else {
                    Theme::border()
                })
                .title(Span::styled(" Search ", Theme::title())),
        );
        frame.render_widget(search_bar, area);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        // Calculate visible area (accounting for border)
        let inner_height = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(3) as usize;
        state.ensure_visible(inner_height);

        let ui = &state.ui_state;
        let rows = state.rows();
        let total = rows.len();

        // Viewport first: only the visible rows are turned into lines
        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .skip(ui.list_offset)
            .take(inner_height)
            .map(|(idx, row)| {
                let line = Self::row_line(row, inner_width);
                if Some(idx) == ui.selected_index {
                    line.style(Theme::row_selected())
                } else {
                    line
                }
            })
            .collect();

        let title = match (ui.collapse, ui.filter.is_empty()) {
            (false, true) => format!(" Logs ({total}) "),
            (false, false) => format!(" Logs ({total} matching) "),
            (true, true) => format!(" Collapsed ({total}) "),
            (true, false) => format!(" Collapsed ({total} matching) "),
        };

        let border_style = if ui.focus == Focus::List {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let list = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(title, Theme::title())),
        );
        frame.render_widget(list, area);

        if total > inner_height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"));
            let max_offset = total.saturating_sub(inner_height);
            let mut scrollbar_state = ScrollbarState::default()
                .content_length(max_offset)
                .position(ui.list_offset.min(max_offset));

            frame.render_stateful_widget(
                scrollbar,
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
    }

    /// One list line: severity tag, optional repeat badge, then the display text
    fn row_line(row: &ViewRow, width: usize) -> Line<'static> {
        let severity = row.severity();
        let mut spans = vec![Span::styled(
            format!("{} ", severity.as_str()),
            Style::default()
                .fg(Theme::severity(severity))
                .add_modifier(Modifier::BOLD),
        )];
        let mut used = 4;

        if let Some(count) = row.count() {
            let badge = format!(" {count} ");
            used += badge.len() + 1;
            spans.push(Span::styled(badge, Theme::badge()));
            spans.push(Span::raw(" "));
        }

        spans.extend(markup_spans(
            row.display_text(),
            Theme::message(severity),
            width.saturating_sub(used),
        ));
        Line::from(spans)
    }

    fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
        let ui = &state.ui_state;
        let inner_height = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(2) as usize;

        let mut lines: Vec<Line> = Vec::new();
        let mut cursor_line = 0;

        if let Some(row) = state.selected_row() {
            let severity = row.severity();
            let mut message_lines = row.display_text().lines();
            if let Some(first) = message_lines.next() {
                lines.push(Line::from(markup_spans(
                    first,
                    Theme::message(severity),
                    inner_width,
                )));
            }
            for extra in message_lines {
                lines.push(Line::from(Span::styled(
                    extra.to_string(),
                    Theme::message(severity),
                )));
            }
            if let Some(count) = row.count() {
                lines.push(Line::from(Span::styled(
                    format!("Seen {count} times"),
                    Theme::text_dim(),
                )));
            }

            let trace = trace_lines(row.stack_trace());
            if !trace.is_empty() {
                lines.push(Line::from(""));
            }
            for (idx, (text, frame_ref)) in trace.into_iter().enumerate() {
                let style = if ui.focus == Focus::Detail && idx == ui.frame_cursor {
                    Theme::frame_cursor()
                } else if frame_ref.is_some() {
                    Theme::frame_link()
                } else {
                    Theme::text_dim()
                };
                if idx == ui.frame_cursor {
                    cursor_line = lines.len();
                }
                lines.push(Line::from(Span::styled(text.to_string(), style)));
            }
        }

        // Keep the highlighted trace line in view
        let scroll = if ui.focus == Focus::Detail {
            cursor_line.saturating_sub(inner_height.saturating_sub(1))
        } else {
            0
        };

        let detail = Paragraph::new(lines)
            .scroll((scroll.min(u16::MAX as usize) as u16, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(if ui.focus == Focus::Detail {
                        Theme::border_focused()
                    } else {
                        Theme::border()
                    })
                    .title(Span::styled(" Detail ", Theme::title())),
            );
        frame.render_widget(detail, area);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let ui = &state.ui_state;
        let evicted = state.console.evicted();

        let mut right = format!(
            "{} / {} {}",
            state.console.len(),
            state.console.capacity(),
            if ui.auto_scroll { "▼" } else { " " }
        );
        if evicted > 0 {
            right = format!("{evicted} evicted │ {right}");
        }

        let hints = match ui.focus {
            Focus::List => console_hints(),
            Focus::Detail => detail_hints(),
        };

        let status = StatusBar::new()
            .hints(hints)
            .message(ui.status.as_ref())
            .right(right);
        frame.render_widget(status, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preferences;
    use ratatui::{Terminal, backend::TestBackend};
    use slogscope_logs::LogConsole;

    fn screen_text(state: &mut AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        state.refresh_view();
        terminal
            .draw(|frame| ConsoleScreen::render(frame, state))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..height {
            for x in 0..width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_renders_records_and_counts() {
        let mut state = AppState::new(LogConsole::new(100), Preferences::default(), "stdin");
        state
            .console
            .ingest("[Slogger][Net] connect failed", "", Severity::Warning);
        state.console.ingest("booted", "", Severity::Info);

        let text = screen_text(&mut state, 100, 30);
        assert!(text.contains("[Net] connect failed"));
        assert!(text.contains("[General] booted"));
        assert!(text.contains("WRN 1"));
        assert!(text.contains("INF 1"));
        assert!(text.contains("Logs (2)"));
    }

    #[test]
    fn test_collapsed_shows_badge_and_trace() {
        let mut state = AppState::new(LogConsole::new(100), Preferences::default(), "stdin");
        for _ in 0..3 {
            state.console.ingest(
                "[Slogger][Net] retry",
                "Game.Net:Send () (at Assets/Net.cs:12)",
                Severity::Error,
            );
        }
        state.toggle_collapse();

        let text = screen_text(&mut state, 100, 30);
        assert!(text.contains(" 3 "));
        assert!(text.contains("Collapsed (1)"));
        assert!(text.contains("Seen 3 times"));
        assert!(text.contains("(at Assets/Net.cs:12)"));
    }

    #[test]
    fn test_search_bar_visible_with_query() {
        let mut state = AppState::new(LogConsole::new(100), Preferences::default(), "stdin");
        state.console.ingest("timeout", "", Severity::Info);
        state.start_search();
        state.search_input_char('t');
        state.apply_search();

        let text = screen_text(&mut state, 80, 24);
        assert!(text.contains("Search: t"));
        assert!(text.contains("Logs (1 matching)"));
    }
}
