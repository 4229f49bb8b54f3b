//! Log ingestion for slogscope
//!
//! This crate turns raw log callbacks into records, keeps the bounded flat
//! history and the collapsed index in step, and filters both views.

mod buffer;
mod builder;
mod collapse;
mod console;
mod directory;
mod error;
pub mod export;
mod filter;
mod source;
pub mod stack;

pub use buffer::{ArcLogRecord, DEFAULT_CAPACITY, IngestionBuffer};
pub use builder::{
    GROUP_PREFIX, LogRecordBuilder, collapse_key, display_segments, format_display_text,
    split_group_prefix,
};
pub use collapse::CollapseIndex;
pub use console::LogConsole;
pub use directory::{
    GroupDirectory, GroupEntry, GroupRegistry, normalize_group_name, parse_group_arg,
};
pub use error::{ConsoleError, Result};
pub use filter::{
    Filterable, GroupSelection, SeverityVisibility, ViewFilter, matches_search, passes,
};
pub use source::{LogSource, decode_line};
pub use stack::{StackFrame, first_frame, parse_frame, trace_lines};

// Re-export types used in our public API
pub use slogscope_types::{
    CollapsedEntry, GroupColor, LogEvent, LogRecord, Severity, SeverityCounts,
};
