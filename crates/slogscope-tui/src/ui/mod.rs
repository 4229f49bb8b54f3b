pub mod components;
mod layout;
mod markup;
pub mod screens;
mod theme;

pub use layout::{ConsoleAreas, Layout};
pub use markup::{markup_spans, truncate_to_width};
pub use theme::Theme;
