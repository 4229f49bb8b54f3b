use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Areas of the console screen
pub struct ConsoleAreas {
    pub toolbar: Rect,
    pub search: Option<Rect>,
    pub list: Rect,
    pub detail: Rect,
    pub status: Rect,
}

/// Layout helper for consistent screen layouts
pub struct Layout;

impl Layout {
    /// Toolbar, optional search bar, list, detail pane and status bar
    pub fn console(area: Rect, show_search: bool, detail_height: u16) -> ConsoleAreas {
        let mut constraints = vec![Constraint::Length(3)];
        if show_search {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Min(3));
        constraints.push(Constraint::Length(detail_height));
        constraints.push(Constraint::Length(1));

        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut idx = 1;
        let search = if show_search {
            idx += 1;
            Some(chunks[1])
        } else {
            None
        };

        ConsoleAreas {
            toolbar: chunks[0],
            search,
            list: chunks[idx],
            detail: chunks[idx + 1],
            status: chunks[idx + 2],
        }
    }

    /// Centered popup no larger than the given size
    pub fn popup(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width.saturating_sub(4));
        let height = height.min(area.height.saturating_sub(4));
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width, height)
    }
}
