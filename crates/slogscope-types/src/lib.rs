//! Shared types for slogscope
//!
//! This crate contains data structures used across multiple slogscope crates.

use chrono::{DateTime, Local};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Groups
// ============================================================================

/// Group that matches every record when selected
pub const ALL_GROUP: &str = "All";

/// Group assigned to records without a group prefix
pub const DEFAULT_GROUP: &str = "General";

/// Groups that can never be removed from a directory
pub const SENTINEL_GROUPS: [&str; 2] = [ALL_GROUP, DEFAULT_GROUP];

/// Display color attached to a group (RGBA, 8 bits per channel)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl GroupColor {
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Uppercase `RRGGBBAA` without a leading `#`
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with or without a leading `#`
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { channel(6)? } else { 0xFF };

        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }

    /// Terminal color (alpha is dropped)
    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl Default for GroupColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for GroupColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

/// Error returned when a color string is not valid hex
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidColor(pub String);

impl fmt::Display for InvalidColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color '{}', expected #RRGGBB or #RRGGBBAA", self.0)
    }
}

impl std::error::Error for InvalidColor {}

impl TryFrom<String> for GroupColor {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(InvalidColor(value))
    }
}

impl From<GroupColor> for String {
    fn from(color: GroupColor) -> Self {
        color.to_string()
    }
}

// ============================================================================
// Log Types
// ============================================================================

/// Log severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    #[default]
    Info,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Self::Error, Self::Warning, Self::Info];

    /// Parse severity from common host log type names
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" | "err" | "exception" | "assert" | "fatal" => Some(Self::Error),
            "warning" | "warn" | "wrn" => Some(Self::Warning),
            "info" | "inf" | "log" | "debug" | "dbg" | "trace" => Some(Self::Info),
            _ => None,
        }
    }

    /// Stable numeric code used in collapse keys
    pub fn code(&self) -> u8 {
        match self {
            Self::Error => 0,
            Self::Warning => 2,
            Self::Info => 3,
        }
    }

    /// Get display color for this severity
    pub fn color(&self) -> Color {
        match self {
            Self::Error => Color::Red,
            Self::Warning => Color::Yellow,
            Self::Info => Color::White,
        }
    }

    /// Short display string (3 chars)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERR",
            Self::Warning => "WRN",
            Self::Info => "INF",
        }
    }
}

/// A log callback as delivered by the host, before ingestion
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEvent {
    pub text: String,
    pub stack_trace: String,
    pub severity: Severity,
}

impl LogEvent {
    pub fn new<T: Into<String>, S: Into<String>>(text: T, stack_trace: S, severity: Severity) -> Self {
        Self {
            text: text.into(),
            stack_trace: stack_trace.into(),
            severity,
        }
    }
}

/// One ingested log event. Built once and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct LogRecord {
    /// Sequential ID assigned at ingestion
    pub id: u64,

    /// Arrival time
    pub timestamp: DateTime<Local>,

    pub severity: Severity,

    /// Canonical group name, never empty
    pub group: String,

    /// Group color resolved at ingestion
    pub color: GroupColor,

    /// Message with the group prefix stripped
    pub raw_text: String,

    /// Timestamped text with a color-tagged group label
    pub display_text: String,

    /// Raw multi-line stack trace (may be empty)
    pub stack_trace: String,

    /// Identity used for collapsing
    pub collapse_key: String,
}

/// Aggregate of every record sharing a collapse key
#[derive(Clone, Debug)]
pub struct CollapsedEntry {
    pub key: String,
    pub group: String,
    pub severity: Severity,

    /// Number of records folded in, always >= 1
    pub count: usize,

    pub latest_display_text: String,
    pub latest_stack_trace: String,

    /// ID of the most recent record folded in
    pub latest_id: u64,

    /// Raw text of the record that created the bucket
    pub first_seen_raw_text: String,

    pub first_seen: DateTime<Local>,
    pub last_seen: DateTime<Local>,
}

impl CollapsedEntry {
    /// Create a bucket from the first record carrying its key
    pub fn from_record(record: &LogRecord) -> Self {
        Self {
            key: record.collapse_key.clone(),
            group: record.group.clone(),
            severity: record.severity,
            count: 1,
            latest_display_text: record.display_text.clone(),
            latest_stack_trace: record.stack_trace.clone(),
            latest_id: record.id,
            first_seen_raw_text: record.raw_text.clone(),
            first_seen: record.timestamp,
            last_seen: record.timestamp,
        }
    }
}

/// Per-severity record counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Error => self.errors,
            Severity::Warning => self.warnings,
            Severity::Info => self.infos,
        }
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}
