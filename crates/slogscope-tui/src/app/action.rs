use slogscope_types::Severity;

/// All possible actions in the application (command pattern)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,

    // UI toggles
    ToggleHelp,
    Dismiss,

    // List navigation
    SelectUp(usize),
    SelectDown(usize),
    PageUp,
    PageDown,
    SelectFirst,
    SelectLast,
    ToggleAutoScroll,

    // View settings
    ToggleSeverity(Severity),
    ToggleCollapse,

    // Detail pane
    ToggleDetailFocus,
    FrameUp,
    FrameDown,
    OpenFrame,
    GrowDetail,
    ShrinkDetail,

    // Search
    OpenSearch,
    CloseSearch,
    ApplySearch,
    SearchInput(char),
    SearchBackspace,
    SearchClear,
    ClearSearch,

    // Group picker
    ToggleGroupPicker,
    PickerUp,
    PickerDown,
    PickerToggle,
    PickerSelectAll,
    PickerCycleColor,
    PickerRemove,

    // Console actions
    ClearConsole,
    ExportView,
    ReopenSource,

    // Status messages
    ShowMessage(String),
    ShowError(String),

    // Tick (for periodic updates)
    Tick,

    // Render request
    Render,
}
