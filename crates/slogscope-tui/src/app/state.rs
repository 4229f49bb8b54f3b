use slogscope_logs::{
    ArcLogRecord, CollapsedEntry, GroupEntry, LogConsole, StackFrame, ViewFilter, first_frame,
    trace_lines,
};
use slogscope_types::{ALL_GROUP, GroupColor, Severity, SeverityCounts};

use crate::config::{Preferences, clamp_detail_height};

/// Colors offered when cycling a group's color in the picker
pub const GROUP_PALETTE: [GroupColor; 8] = [
    GroupColor::WHITE,
    GroupColor::rgb(0xFF, 0x55, 0x55),
    GroupColor::rgb(0xFF, 0xAA, 0x00),
    GroupColor::rgb(0xFF, 0xFF, 0x55),
    GroupColor::rgb(0x55, 0xFF, 0x55),
    GroupColor::rgb(0x55, 0xFF, 0xFF),
    GroupColor::rgb(0x55, 0x99, 0xFF),
    GroupColor::rgb(0xFF, 0x55, 0xFF),
];

/// Identity of a row, stable while new records arrive
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowId {
    Record(u64),
    Bucket(String),
}

/// One visible line of the console list
#[derive(Clone, Debug)]
pub enum ViewRow {
    Record(ArcLogRecord),
    Bucket(CollapsedEntry),
}

impl ViewRow {
    pub fn id(&self) -> RowId {
        match self {
            Self::Record(r) => RowId::Record(r.id),
            Self::Bucket(b) => RowId::Bucket(b.key.clone()),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Record(r) => r.severity,
            Self::Bucket(b) => b.severity,
        }
    }

    pub fn group(&self) -> &str {
        match self {
            Self::Record(r) => &r.group,
            Self::Bucket(b) => &b.group,
        }
    }

    /// Color-tagged display text (latest occurrence for buckets)
    pub fn display_text(&self) -> &str {
        match self {
            Self::Record(r) => &r.display_text,
            Self::Bucket(b) => &b.latest_display_text,
        }
    }

    pub fn stack_trace(&self) -> &str {
        match self {
            Self::Record(r) => &r.stack_trace,
            Self::Bucket(b) => &b.latest_stack_trace,
        }
    }

    /// Repeat count, only for collapsed rows
    pub fn count(&self) -> Option<usize> {
        match self {
            Self::Record(_) => None,
            Self::Bucket(b) => Some(b.count),
        }
    }
}

/// Cache for filtered rows to avoid re-filtering on every render
#[derive(Default)]
pub struct ViewCache {
    /// Console generation the rows were built from (None = invalid)
    generation: Option<u64>,
    filter: ViewFilter,
    collapse: bool,
    pub rows: Vec<ViewRow>,
}

impl ViewCache {
    pub fn needs_refresh(&self, generation: u64, filter: &ViewFilter, collapse: bool) -> bool {
        self.generation != Some(generation) || self.collapse != collapse || self.filter != *filter
    }

    pub fn update(&mut self, generation: u64, filter: &ViewFilter, collapse: bool, rows: Vec<ViewRow>) {
        self.generation = Some(generation);
        self.filter = filter.clone();
        self.collapse = collapse;
        self.rows = rows;
    }

    pub fn invalidate(&mut self) {
        self.generation = None;
    }
}

/// Which pane receives navigation keys
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Popup drawn over the console
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    GroupPicker,
}

/// One-line feedback shown in the status bar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// UI-specific transient state
pub struct UiState {
    /// Severity, group and search settings shared by both views
    pub filter: ViewFilter,

    /// Show collapsed buckets instead of flat records?
    pub collapse: bool,

    /// Keep the newest row selected (follow mode)?
    pub auto_scroll: bool,

    /// Selected row identity
    pub selected: Option<RowId>,

    /// Selected row position in the cached rows
    pub selected_index: Option<usize>,

    /// First visible row in the list
    pub list_offset: usize,

    /// Rows visible in the list, updated on render
    pub page_size: usize,

    pub focus: Focus,

    /// Highlighted stack-trace line in the detail pane
    pub frame_cursor: usize,

    /// Detail pane height in rows
    pub detail_height: u16,

    /// Is the search bar accepting input?
    pub search_active: bool,

    /// Current search input text
    pub search_input: String,

    pub overlay: Overlay,

    /// Highlighted entry in the group picker
    pub picker_index: usize,

    pub status: Option<StatusMessage>,

    /// Cache for filtered rows
    pub cache: ViewCache,
}

impl UiState {
    pub fn from_prefs(prefs: &Preferences) -> Self {
        Self {
            filter: ViewFilter::new().with_severities(prefs.severities()),
            collapse: prefs.collapse,
            auto_scroll: prefs.auto_scroll,
            selected: None,
            selected_index: None,
            list_offset: 0,
            page_size: 20,
            focus: Focus::List,
            frame_cursor: 0,
            detail_height: clamp_detail_height(prefs.detail_height),
            search_active: false,
            search_input: String::new(),
            overlay: Overlay::None,
            picker_index: 0,
            status: None,
            cache: ViewCache::default(),
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::from_prefs(&Preferences::default())
    }
}

/// Global application state
pub struct AppState {
    pub console: LogConsole,

    pub prefs: Preferences,

    /// UI state
    pub ui_state: UiState,

    /// Human-readable name of the input (file path or stdin)
    pub source_label: String,

    /// Whether the input is still being read
    pub source_running: bool,

    /// Whether app should quit
    pub should_quit: bool,
}

impl AppState {
    pub fn new(console: LogConsole, prefs: Preferences, source_label: impl Into<String>) -> Self {
        Self {
            console,
            ui_state: UiState::from_prefs(&prefs),
            prefs,
            source_label: source_label.into(),
            source_running: false,
            should_quit: false,
        }
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    /// Rebuild the visible rows if the console or the view settings changed
    pub fn refresh_view(&mut self) {
        let ui = &mut self.ui_state;
        let generation = self.console.generation();

        if ui.cache.needs_refresh(generation, &ui.filter, ui.collapse) {
            let rows: Vec<ViewRow> = if ui.collapse {
                self.console
                    .collapsed_view(&ui.filter)
                    .into_iter()
                    .map(ViewRow::Bucket)
                    .collect()
            } else {
                self.console
                    .flat_view(&ui.filter)
                    .into_iter()
                    .map(ViewRow::Record)
                    .collect()
            };
            ui.cache.update(generation, &ui.filter, ui.collapse, rows);
        }

        self.resolve_selection();
    }

    /// Map the selected identity back onto the current rows
    fn resolve_selection(&mut self) {
        let ui = &mut self.ui_state;
        let rows = &ui.cache.rows;

        if rows.is_empty() {
            ui.selected = None;
            ui.selected_index = None;
            return;
        }

        let index = if ui.auto_scroll {
            rows.len() - 1
        } else {
            match &ui.selected {
                None => 0,
                // Flat rows are in ascending id order
                Some(RowId::Record(id)) if !ui.collapse => rows
                    .binary_search_by_key(id, |row| match row {
                        ViewRow::Record(r) => r.id,
                        ViewRow::Bucket(b) => b.latest_id,
                    })
                    // Evicted or filtered out: stay near the old position
                    .unwrap_or_else(|insert_at| insert_at.min(rows.len() - 1)),
                // Buckets are in first-seen order, so look for the one last fed by this record
                Some(RowId::Record(id)) => rows
                    .iter()
                    .position(|row| matches!(row, ViewRow::Bucket(b) if b.latest_id == *id))
                    .unwrap_or_else(|| ui.selected_index.unwrap_or(0).min(rows.len() - 1)),
                Some(RowId::Bucket(key)) => rows
                    .iter()
                    .position(|row| matches!(row, ViewRow::Bucket(b) if &b.key == key))
                    .unwrap_or_else(|| ui.selected_index.unwrap_or(0).min(rows.len() - 1)),
            }
        };

        let id = rows[index].id();
        if ui.selected.as_ref() != Some(&id) {
            ui.frame_cursor = 0;
        }
        ui.selected = Some(id);
        ui.selected_index = Some(index);
    }

    pub fn rows(&self) -> &[ViewRow] {
        &self.ui_state.cache.rows
    }

    pub fn selected_row(&self) -> Option<&ViewRow> {
        self.ui_state
            .selected_index
            .and_then(|idx| self.ui_state.cache.rows.get(idx))
    }

    /// Unfiltered per-severity counts for the toolbar
    pub fn counts(&self) -> SeverityCounts {
        self.console.counts()
    }

    /// Keep the selected row inside a list of `height` rows
    pub fn ensure_visible(&mut self, height: usize) {
        let ui = &mut self.ui_state;
        ui.page_size = height.max(1);

        let total = ui.cache.rows.len();
        let max_offset = total.saturating_sub(ui.page_size);
        if let Some(idx) = ui.selected_index {
            if idx < ui.list_offset {
                ui.list_offset = idx;
            } else if idx >= ui.list_offset + ui.page_size {
                ui.list_offset = idx + 1 - ui.page_size;
            }
        }
        ui.list_offset = ui.list_offset.min(max_offset);
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    fn select_index(&mut self, index: usize) {
        let Some(last) = self.rows().len().checked_sub(1) else {
            return;
        };
        let index = index.min(last);
        let id = self.rows()[index].id();

        let ui = &mut self.ui_state;
        if ui.selected.as_ref() != Some(&id) {
            ui.frame_cursor = 0;
        }
        ui.selected = Some(id);
        ui.selected_index = Some(index);
    }

    pub fn select_up(&mut self, n: usize) {
        self.ui_state.auto_scroll = false;
        let current = self.ui_state.selected_index.unwrap_or(0);
        self.select_index(current.saturating_sub(n));
    }

    pub fn select_down(&mut self, n: usize) {
        self.ui_state.auto_scroll = false;
        let current = self.ui_state.selected_index.unwrap_or(0);
        self.select_index(current.saturating_add(n));
    }

    pub fn page_up(&mut self) {
        self.select_up(self.ui_state.page_size);
    }

    pub fn page_down(&mut self) {
        self.select_down(self.ui_state.page_size);
    }

    pub fn select_first(&mut self) {
        self.ui_state.auto_scroll = false;
        self.select_index(0);
    }

    pub fn select_last(&mut self) {
        self.select_index(usize::MAX);
    }

    pub fn toggle_auto_scroll(&mut self) {
        self.ui_state.auto_scroll = !self.ui_state.auto_scroll;
        if self.ui_state.auto_scroll {
            self.select_last();
        }
    }

    // ------------------------------------------------------------------
    // View settings
    // ------------------------------------------------------------------

    pub fn toggle_severity(&mut self, severity: Severity) {
        self.ui_state.filter.severities.toggle(severity);
    }

    /// Switch between flat and collapsed mode, keeping the selection on the same message
    pub fn toggle_collapse(&mut self) {
        let mapped = self.selected_row().map(|row| match row {
            ViewRow::Record(r) => RowId::Bucket(r.collapse_key.clone()),
            ViewRow::Bucket(b) => RowId::Record(b.latest_id),
        });

        let ui = &mut self.ui_state;
        ui.collapse = !ui.collapse;
        ui.selected = mapped;
        ui.selected_index = None;
        ui.frame_cursor = 0;
        self.refresh_view();
    }

    /// Empty both views
    pub fn clear(&mut self) {
        self.console.clear();
        let ui = &mut self.ui_state;
        ui.selected = None;
        ui.selected_index = None;
        ui.list_offset = 0;
        ui.frame_cursor = 0;
        ui.focus = Focus::List;
        ui.cache.invalidate();
    }

    // ------------------------------------------------------------------
    // Detail pane
    // ------------------------------------------------------------------

    /// Number of non-empty stack-trace lines of the selected row
    pub fn trace_line_count(&self) -> usize {
        self.selected_row()
            .map(|row| trace_lines(row.stack_trace()).len())
            .unwrap_or(0)
    }

    pub fn toggle_detail_focus(&mut self) {
        match self.ui_state.focus {
            Focus::Detail => self.ui_state.focus = Focus::List,
            Focus::List if self.trace_line_count() > 0 => {
                self.ui_state.focus = Focus::Detail;
                self.ui_state.frame_cursor = 0;
            }
            Focus::List => self.show_message("No stack trace for this entry"),
        }
    }

    pub fn frame_up(&mut self) {
        self.ui_state.frame_cursor = self.ui_state.frame_cursor.saturating_sub(1);
    }

    pub fn frame_down(&mut self) {
        let last = self.trace_line_count().saturating_sub(1);
        self.ui_state.frame_cursor = (self.ui_state.frame_cursor + 1).min(last);
    }

    /// Frame to open: the highlighted line in the detail pane, else the first frame
    pub fn selected_frame(&self) -> Option<StackFrame> {
        let row = self.selected_row()?;
        match self.ui_state.focus {
            Focus::Detail => trace_lines(row.stack_trace())
                .into_iter()
                .nth(self.ui_state.frame_cursor)
                .and_then(|(_, frame)| frame),
            Focus::List => first_frame(row.stack_trace()),
        }
    }

    pub fn grow_detail(&mut self) {
        self.ui_state.detail_height = clamp_detail_height(self.ui_state.detail_height + 2);
    }

    pub fn shrink_detail(&mut self) {
        self.ui_state.detail_height =
            clamp_detail_height(self.ui_state.detail_height.saturating_sub(2));
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Start search input, editing the current query
    pub fn start_search(&mut self) {
        self.ui_state.search_active = true;
        self.ui_state.search_input = self.ui_state.filter.query.clone();
    }

    /// Close the search bar and drop the query
    pub fn cancel_search(&mut self) {
        self.ui_state.search_active = false;
        self.clear_search();
    }

    /// Close the search bar keeping the query
    pub fn apply_search(&mut self) {
        self.ui_state.search_active = false;
    }

    pub fn clear_search(&mut self) {
        self.ui_state.search_input.clear();
        self.ui_state.filter.query.clear();
    }

    /// Add a character to the query (applied as you type)
    pub fn search_input_char(&mut self, c: char) {
        self.ui_state.search_input.push(c);
        self.ui_state.filter.query.clone_from(&self.ui_state.search_input);
    }

    pub fn search_input_backspace(&mut self) {
        self.ui_state.search_input.pop();
        self.ui_state.filter.query.clone_from(&self.ui_state.search_input);
    }

    pub fn search_input_clear(&mut self) {
        self.clear_search();
    }

    // ------------------------------------------------------------------
    // Group picker
    // ------------------------------------------------------------------

    pub fn picker_entries(&self) -> Vec<GroupEntry> {
        self.console.groups()
    }

    pub fn toggle_group_picker(&mut self) {
        self.ui_state.overlay = match self.ui_state.overlay {
            Overlay::GroupPicker => Overlay::None,
            _ => {
                self.ui_state.picker_index = 0;
                Overlay::GroupPicker
            }
        };
    }

    pub fn picker_up(&mut self) {
        self.ui_state.picker_index = self.ui_state.picker_index.saturating_sub(1);
    }

    pub fn picker_down(&mut self) {
        let last = self.picker_entries().len().saturating_sub(1);
        self.ui_state.picker_index = (self.ui_state.picker_index + 1).min(last);
    }

    fn picker_current(&self) -> Option<GroupEntry> {
        self.picker_entries().into_iter().nth(self.ui_state.picker_index)
    }

    /// Add or remove the highlighted group from the selection
    pub fn picker_toggle(&mut self) {
        let Some(entry) = self.picker_current() else {
            return;
        };
        let groups = &mut self.ui_state.filter.groups;
        if entry.name == ALL_GROUP {
            groups.select(ALL_GROUP);
        } else {
            groups.toggle(&entry.name);
        }
    }

    pub fn picker_select_all(&mut self) {
        self.ui_state.filter.groups.select(ALL_GROUP);
    }

    /// Give the highlighted group the next palette color
    pub fn picker_cycle_color(&mut self) {
        let Some(entry) = self.picker_current() else {
            return;
        };
        let next = GROUP_PALETTE
            .iter()
            .position(|c| *c == entry.color)
            .map(|idx| GROUP_PALETTE[(idx + 1) % GROUP_PALETTE.len()])
            .unwrap_or(GROUP_PALETTE[0]);

        match self.console.set_group_color(&entry.name, next) {
            Ok(()) => self.show_message(format!("{} is now {}", entry.name, next)),
            Err(e) => self.show_error(e.to_string()),
        }
    }

    /// Remove the highlighted group from the directory and the selection
    pub fn picker_remove(&mut self) {
        let Some(entry) = self.picker_current() else {
            return;
        };
        if let Err(e) = self.console.remove_group(&entry.name) {
            self.show_error(e.to_string());
            return;
        }

        let groups = &mut self.ui_state.filter.groups;
        if groups.contains(&entry.name) {
            groups.deselect(&entry.name);
        }
        let last = self.picker_entries().len().saturating_sub(1);
        self.ui_state.picker_index = self.ui_state.picker_index.min(last);
        self.show_message(format!("Removed group {}", entry.name));
    }

    // ------------------------------------------------------------------
    // Messages and overlays
    // ------------------------------------------------------------------

    pub fn show_message(&mut self, text: impl Into<String>) {
        self.ui_state.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn show_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::warn!(message = %text, "showing error");
        self.ui_state.status = Some(StatusMessage {
            text,
            is_error: true,
        });
    }

    pub fn toggle_help(&mut self) {
        self.ui_state.overlay = match self.ui_state.overlay {
            Overlay::Help => Overlay::None,
            _ => Overlay::Help,
        };
    }

    /// Close the innermost thing that is open
    pub fn dismiss(&mut self) {
        let ui = &mut self.ui_state;
        if ui.overlay != Overlay::None {
            ui.overlay = Overlay::None;
        } else if ui.focus == Focus::Detail {
            ui.focus = Focus::List;
        } else {
            ui.status = None;
        }
    }

    /// Copy the persisted view settings back into the preferences
    pub fn sync_prefs(&mut self) -> &Preferences {
        let ui = &self.ui_state;
        self.prefs.set_severities(ui.filter.severities);
        self.prefs.auto_scroll = ui.auto_scroll;
        self.prefs.collapse = ui.collapse;
        self.prefs.detail_height = ui.detail_height;
        &self.prefs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slogscope_logs::GroupSelection;

    const TRACE: &str = "UnityEngine.Debug:Log (object)\nGame.Net:Send () (at Assets/Net.cs:12)\nGame.Net:Flush () (at Assets/Net.cs:30)";

    fn state_with(capacity: usize) -> AppState {
        AppState::new(LogConsole::new(capacity), Preferences::default(), "test")
    }

    #[test]
    fn test_follow_selects_newest() {
        let mut state = state_with(100);
        state.console.ingest("a", "", Severity::Info);
        state.console.ingest("b", "", Severity::Info);
        state.refresh_view();
        assert_eq!(state.ui_state.selected_index, Some(1));

        state.console.ingest("c", "", Severity::Info);
        state.refresh_view();
        assert_eq!(state.ui_state.selected_index, Some(2));
    }

    #[test]
    fn test_manual_selection_sticks_to_record() {
        let mut state = state_with(3);
        for text in ["a", "b", "c"] {
            state.console.ingest(text, "", Severity::Info);
        }
        state.refresh_view();
        state.select_up(1);
        assert!(!state.ui_state.auto_scroll);
        let id = state.ui_state.selected.clone();

        // "a" is evicted; "b" moves from index 1 to 0
        state.console.ingest("d", "", Severity::Info);
        state.refresh_view();
        assert_eq!(state.ui_state.selected, id);
        assert_eq!(state.ui_state.selected_index, Some(0));
    }

    #[test]
    fn test_cache_refreshes_on_filter_change() {
        let mut state = state_with(100);
        state.console.ingest("boom", "", Severity::Error);
        state.console.ingest("fine", "", Severity::Info);
        state.refresh_view();
        assert_eq!(state.rows().len(), 2);

        state.toggle_severity(Severity::Info);
        state.refresh_view();
        assert_eq!(state.rows().len(), 1);
        assert_eq!(state.rows()[0].severity(), Severity::Error);
    }

    #[test]
    fn test_collapse_keeps_selection_on_message() {
        let mut state = state_with(100);
        state.console.ingest("[Slogger][Net] retry", "", Severity::Warning);
        state.console.ingest("[Slogger][UI] click", "", Severity::Info);
        state.console.ingest("[Slogger][Net] retry", "", Severity::Warning);
        state.refresh_view();

        state.select_first();
        state.toggle_collapse();
        let row = state.selected_row().unwrap();
        assert_eq!(row.count(), Some(2));
        assert_eq!(row.group(), "Net");

        // Back to flat: the bucket's latest occurrence is selected
        state.toggle_collapse();
        assert_eq!(state.ui_state.selected_index, Some(2));
    }

    #[test]
    fn test_record_selection_resolves_in_collapsed_mode() {
        let mut state = state_with(100);
        let mut ids = Vec::new();
        for text in ["a", "b", "c", "a"] {
            ids.push(state.console.ingest(text, "", Severity::Info).id);
        }

        // Buckets a, b, c have latest ids [ids[3], ids[1], ids[2]], not sorted
        state.ui_state.collapse = true;
        state.ui_state.auto_scroll = false;
        for (id, expected) in [(ids[2], 2), (ids[3], 0), (ids[1], 1)] {
            state.ui_state.selected = Some(RowId::Record(id));
            state.refresh_view();
            assert_eq!(state.ui_state.selected_index, Some(expected));
        }
    }

    #[test]
    fn test_search_applies_while_typing() {
        let mut state = state_with(100);
        state.console.ingest("connection timeout", "", Severity::Info);
        state.console.ingest("connected ok", "", Severity::Info);

        state.start_search();
        for c in "TIME".chars() {
            state.search_input_char(c);
        }
        state.refresh_view();
        assert_eq!(state.rows().len(), 1);

        state.cancel_search();
        state.refresh_view();
        assert_eq!(state.rows().len(), 2);
        assert!(!state.ui_state.search_active);
    }

    #[test]
    fn test_selected_frame_follows_focus() {
        let mut state = state_with(100);
        state.console.ingest("x", TRACE, Severity::Error);
        state.refresh_view();

        assert_eq!(state.selected_frame().unwrap().line, 12);

        state.toggle_detail_focus();
        assert_eq!(state.ui_state.focus, Focus::Detail);
        // Line 0 has no location
        state.frame_up();
        assert!(state.selected_frame().is_none());

        state.frame_down();
        state.frame_down();
        state.frame_down();
        assert_eq!(state.ui_state.frame_cursor, 2);
        assert_eq!(state.selected_frame().unwrap().line, 30);
    }

    #[test]
    fn test_detail_focus_needs_trace() {
        let mut state = state_with(100);
        state.console.ingest("x", "", Severity::Info);
        state.refresh_view();
        state.toggle_detail_focus();
        assert_eq!(state.ui_state.focus, Focus::List);
        assert!(state.ui_state.status.is_some());
    }

    #[test]
    fn test_picker_toggle_and_remove() {
        let mut state = state_with(100);
        state.console.ingest("[Slogger][Net] a", "", Severity::Info);
        state.console.ingest("[Slogger][UI] b", "", Severity::Info);

        state.toggle_group_picker();
        // All, General, Net, UI
        state.picker_down();
        state.picker_down();
        state.picker_toggle();
        assert_eq!(state.ui_state.filter.groups, GroupSelection::only(["Net"]));

        state.refresh_view();
        assert_eq!(state.rows().len(), 1);

        // Entries still carry Net, so the group stays
        state.picker_remove();
        assert!(state.ui_state.status.as_ref().unwrap().is_error);
        assert!(state.console.group_names().contains(&"Net".to_string()));
        assert_eq!(state.ui_state.filter.groups, GroupSelection::only(["Net"]));

        state.clear();
        state.picker_remove();
        assert!(state.ui_state.filter.groups.includes_all());
        assert!(!state.console.group_names().contains(&"Net".to_string()));
        assert_eq!(state.ui_state.picker_index, 2);
    }

    #[test]
    fn test_picker_refuses_sentinels() {
        let mut state = state_with(100);
        state.toggle_group_picker();
        state.picker_remove();
        assert!(state.ui_state.status.as_ref().unwrap().is_error);
        assert_eq!(state.console.group_names(), vec!["All", "General"]);
    }

    #[test]
    fn test_cycle_color() {
        let mut state = state_with(100);
        state.console.ingest("[Slogger][Net] a", "", Severity::Info);
        state.toggle_group_picker();
        state.ui_state.picker_index = 2;
        state.picker_cycle_color();

        let net = state
            .console
            .groups()
            .into_iter()
            .find(|g| g.name == "Net")
            .unwrap();
        assert_eq!(net.color, GROUP_PALETTE[1]);
    }

    #[test]
    fn test_clear_resets_selection() {
        let mut state = state_with(100);
        state.console.ingest("a", "", Severity::Info);
        state.refresh_view();
        state.clear();
        state.refresh_view();
        assert!(state.rows().is_empty());
        assert!(state.selected_row().is_none());
    }

    #[test]
    fn test_ensure_visible_scrolls() {
        let mut state = state_with(100);
        for i in 0..30 {
            state.console.ingest(&format!("m{i}"), "", Severity::Info);
        }
        state.refresh_view();
        state.ensure_visible(10);
        assert_eq!(state.ui_state.list_offset, 20);

        state.select_first();
        state.ensure_visible(10);
        assert_eq!(state.ui_state.list_offset, 0);
    }

    #[test]
    fn test_dismiss_order() {
        let mut state = state_with(100);
        state.show_message("hello");
        state.toggle_help();
        state.dismiss();
        assert_eq!(state.ui_state.overlay, Overlay::None);
        assert!(state.ui_state.status.is_some());
        state.dismiss();
        assert!(state.ui_state.status.is_none());
    }

    #[test]
    fn test_sync_prefs() {
        let mut state = state_with(100);
        state.toggle_severity(Severity::Info);
        state.toggle_collapse();
        state.grow_detail();
        let prefs = state.sync_prefs();
        assert!(!prefs.show_infos);
        assert!(prefs.collapse);
        assert_eq!(prefs.detail_height, 12);
    }
}
