use ratatui::{
    Frame,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

use slogscope_logs::{GroupEntry, GroupSelection};
use slogscope_types::ALL_GROUP;

use crate::app::AppState;
use crate::ui::{Layout, Theme};

/// Multi-select popup over the group directory
pub struct GroupPicker;

impl GroupPicker {
    pub fn render(frame: &mut Frame, state: &AppState) {
        let entries = state.picker_entries();
        let height = (entries.len() as u16).saturating_add(4).min(24);
        let popup_area = Layout::popup(frame.area(), 44, height);
        frame.render_widget(Clear, popup_area);

        let items: Vec<ListItem> = entries
            .iter()
            .map(|entry| ListItem::new(Self::entry_line(entry, &state.ui_state.filter.groups)))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border_focused())
                    .title(Span::styled(" Groups ", Theme::title()))
                    .title_bottom(Line::from(Span::styled(
                        " [Space]Toggle [a]All [c]Color [d]Remove ",
                        Theme::text_dim(),
                    ))),
            )
            .highlight_style(Theme::row_selected())
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default().with_selected(Some(state.ui_state.picker_index));
        frame.render_stateful_widget(list, popup_area, &mut list_state);
    }

    fn entry_line<'a>(entry: &'a GroupEntry, selection: &GroupSelection) -> Line<'a> {
        let checked = if entry.name == ALL_GROUP {
            selection.includes_all()
        } else {
            selection.contains(&entry.name)
        };

        Line::from(vec![
            Span::styled(if checked { "[x] " } else { "[ ] " }, Theme::text()),
            Span::styled("■ ", Style::default().fg(entry.color.to_color())),
            Span::styled(entry.name.as_str(), Theme::text()),
            Span::styled(format!("  {}", entry.color), Theme::text_dim()),
        ])
    }
}
