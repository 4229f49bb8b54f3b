mod action;
mod state;

pub use action::Action;
pub use state::{AppState, Focus, Overlay, RowId, StatusMessage, UiState, ViewCache, ViewRow};
