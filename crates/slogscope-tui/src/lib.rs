//! Terminal UI for slogscope
//!
//! This crate provides the console screen, its state and keybindings,
//! persisted preferences, terminal event handling and the editor hand-off.

pub mod app;
pub mod config;
pub mod editor;
mod error;
pub mod tui;
pub mod ui;

pub use app::{Action, AppState, Focus, Overlay, StatusMessage, UiState};
pub use config::{KeyBinding, KeyBindings, KeyContext, Preferences};
pub use error::{Result, TuiError};
pub use tui::{Event, EventHandler, Tui};
pub use ui::components::{GroupPicker, HelpOverlay, StatusBar};
pub use ui::screens::ConsoleScreen;
pub use ui::{Layout, Theme};
