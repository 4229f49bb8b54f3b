use chrono::{DateTime, Local};

use slogscope_types::{DEFAULT_GROUP, GroupColor, LogRecord, Severity};

use crate::directory::{GroupRegistry, normalize_group_name};

/// Prefix written by the grouped logger in front of every message
pub const GROUP_PREFIX: &str = "[Slogger][";

const COLOR_OPEN: &str = "<color=#";
const COLOR_CLOSE: &str = "</color>";

/// Builds structured records from raw log callbacks
pub struct LogRecordBuilder;

impl LogRecordBuilder {
    /// Turn a raw log callback into a `LogRecord`
    ///
    /// Unseen groups are registered in `directory` with the default color.
    /// The record ID is left at 0 for the caller to assign.
    pub fn build<R>(
        raw_condition: &str,
        stack_trace: &str,
        severity: Severity,
        now: DateTime<Local>,
        directory: &mut R,
    ) -> LogRecord
    where
        R: GroupRegistry + ?Sized,
    {
        let (group, raw_text) = match split_group_prefix(raw_condition) {
            (Some(group), message) => (normalize_group_name(group), message),
            (None, message) => (DEFAULT_GROUP.to_string(), message),
        };

        let group = match directory.canonical_name(&group) {
            Some(stored) => stored.to_string(),
            None => {
                // A false return only means someone registered it first
                directory.add(&group, GroupColor::WHITE);
                group
            }
        };

        let color = directory.color_of(&group);
        let display_text = format_display_text(now, &group, color, raw_text);
        let collapse_key = collapse_key(severity, &group, raw_text);

        LogRecord {
            id: 0,
            timestamp: now,
            severity,
            group,
            color,
            raw_text: raw_text.to_string(),
            display_text,
            stack_trace: stack_trace.to_string(),
            collapse_key,
        }
    }
}

/// Split `[Slogger][Group] message` into the group and the message
///
/// Returns `(None, condition)` untouched when the prefix is missing, unterminated or blank.
pub fn split_group_prefix(condition: &str) -> (Option<&str>, &str) {
    let Some(rest) = condition.strip_prefix(GROUP_PREFIX) else {
        return (None, condition);
    };

    match rest.find(']') {
        Some(end) if !rest[..end].trim().is_empty() => {
            let message = &rest[end + 1..];
            (Some(&rest[..end]), message.strip_prefix(' ').unwrap_or(message))
        }
        _ => (None, condition),
    }
}

/// Two records collapse together iff severity, group and message text match exactly
pub fn collapse_key(severity: Severity, group: &str, raw_text: &str) -> String {
    format!("{}|{}|{}:{}", severity.code(), group, group, raw_text)
}

/// `[HH:MM:SS] <color=#RRGGBBAA>[Group]</color> message`
pub fn format_display_text(
    now: DateTime<Local>,
    group: &str,
    color: GroupColor,
    message: &str,
) -> String {
    format!(
        "[{}] {}{}>[{}]{} {}",
        now.format("%H:%M:%S"),
        COLOR_OPEN,
        color.to_hex(),
        group,
        COLOR_CLOSE,
        message
    )
}

/// Split display text into plain and color-tagged segments
///
/// Malformed tags are kept as plain text.
pub fn display_segments(text: &str) -> Vec<(Option<GroupColor>, &str)> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(COLOR_OPEN) {
        let after_open = &rest[open + COLOR_OPEN.len()..];
        let Some(gt) = after_open.find('>') else {
            break;
        };
        let Some(color) = GroupColor::parse(&after_open[..gt]) else {
            break;
        };
        let body = &after_open[gt + 1..];
        let Some(close) = body.find(COLOR_CLOSE) else {
            break;
        };

        if open > 0 {
            segments.push((None, &rest[..open]));
        }
        segments.push((Some(color), &body[..close]));
        rest = &body[close + COLOR_CLOSE.len()..];
    }

    if !rest.is_empty() {
        segments.push((None, rest));
    }
    segments
}
