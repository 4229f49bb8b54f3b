use regex::Regex;
use std::sync::LazyLock;

static FRAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(at (.+):(\d+)\)").expect("frame pattern is valid"));

/// A source location referenced by a stack-trace line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackFrame {
    pub path: String,
    pub line: u32,
}

/// Extract the `(at <path>:<line>)` location from a stack-trace line
pub fn parse_frame(line: &str) -> Option<StackFrame> {
    let caps = FRAME_RE.captures(line)?;
    let line_number = caps.get(2)?.as_str().parse().ok()?;
    Some(StackFrame {
        path: caps.get(1)?.as_str().to_string(),
        line: line_number,
    })
}

/// Non-empty lines of a stack trace, each paired with its frame if it has one
pub fn trace_lines(stack_trace: &str) -> Vec<(&str, Option<StackFrame>)> {
    stack_trace
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| (l, parse_frame(l)))
        .collect()
}

/// First navigable frame in a stack trace
pub fn first_frame(stack_trace: &str) -> Option<StackFrame> {
    stack_trace.lines().find_map(parse_frame)
}
