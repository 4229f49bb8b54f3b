use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::Layout;

/// Help overlay showing keybindings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame) {
        let popup_area = Layout::popup(frame.area(), 52, 36);
        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Self::section("Navigation"),
            Self::key_line("j/↓ k/↑", "Select next / previous"),
            Self::key_line("Ctrl+d/u", "Page down / up"),
            Self::key_line("g / G", "First / last entry"),
            Self::key_line("f", "Toggle follow mode"),
            Line::from(""),
            Self::section("View"),
            Self::key_line("e / w / i", "Show errors / warnings / infos"),
            Self::key_line("c", "Toggle collapse"),
            Self::key_line("p", "Pick groups"),
            Self::key_line("/", "Search messages"),
            Self::key_line("n", "Clear search"),
            Self::key_line("+ / -", "Resize detail pane"),
            Line::from(""),
            Self::section("Stack trace"),
            Self::key_line("Enter", "Open first frame in editor"),
            Self::key_line("Tab", "Focus trace lines"),
            Line::from(""),
            Self::section("Group picker"),
            Self::key_line("Space", "Toggle group"),
            Self::key_line("a", "Select All"),
            Self::key_line("c", "Cycle color"),
            Self::key_line("d", "Remove group"),
            Line::from(""),
            Self::section("Console"),
            Self::key_line("X", "Clear"),
            Self::key_line("s", "Save view to file"),
            Self::key_line("r", "Reopen input file"),
            Self::key_line("?", "Toggle this help"),
            Self::key_line("q", "Quit"),
        ];

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    " Help ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn section(title: &str) -> Line<'_> {
        Line::from(Span::styled(title, Style::default().fg(Color::Yellow)))
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {key:>10}"), Style::default().fg(Color::Green)),
            Span::styled(format!("  {desc}"), Style::default().fg(Color::White)),
        ])
    }
}
