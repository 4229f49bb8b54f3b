mod group_picker;
mod help_overlay;
mod status_bar;

pub use group_picker::GroupPicker;
pub use help_overlay::HelpOverlay;
pub use status_bar::{StatusBar, console_hints, detail_hints};
