mod keybindings;
mod prefs;

pub use keybindings::{KeyBinding, KeyBindings, KeyContext};
pub use prefs::{DETAIL_HEIGHT_RANGE, Preferences, clamp_detail_height};
