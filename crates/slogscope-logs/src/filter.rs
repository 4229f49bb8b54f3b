use std::collections::BTreeSet;

use slogscope_types::{ALL_GROUP, CollapsedEntry, LogRecord, Severity};

/// Anything that can be shown in a view
pub trait Filterable {
    fn severity(&self) -> Severity;
    fn group(&self) -> &str;
    /// Text matched by the search query
    fn search_text(&self) -> &str;
}

impl Filterable for LogRecord {
    fn severity(&self) -> Severity {
        self.severity
    }

    fn group(&self) -> &str {
        &self.group
    }

    fn search_text(&self) -> &str {
        &self.raw_text
    }
}

impl Filterable for CollapsedEntry {
    fn severity(&self) -> Severity {
        self.severity
    }

    fn group(&self) -> &str {
        &self.group
    }

    // The key embeds the exact raw text, so every record in a bucket shares it
    fn search_text(&self) -> &str {
        &self.first_seen_raw_text
    }
}

/// Independent per-severity visibility toggles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeverityVisibility {
    pub errors: bool,
    pub warnings: bool,
    pub infos: bool,
}

impl SeverityVisibility {
    pub fn is_visible(&self, severity: Severity) -> bool {
        match severity {
            Severity::Error => self.errors,
            Severity::Warning => self.warnings,
            Severity::Info => self.infos,
        }
    }

    pub fn toggle(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.errors = !self.errors,
            Severity::Warning => self.warnings = !self.warnings,
            Severity::Info => self.infos = !self.infos,
        }
    }
}

impl Default for SeverityVisibility {
    fn default() -> Self {
        Self {
            errors: true,
            warnings: true,
            infos: true,
        }
    }
}

/// Set of selected groups, never empty
///
/// Selecting `All` replaces the selection; selecting any other group drops
/// `All`; removing the last group falls back to `All`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSelection {
    groups: BTreeSet<String>,
}

impl GroupSelection {
    pub fn all() -> Self {
        Self {
            groups: BTreeSet::from([ALL_GROUP.to_string()]),
        }
    }

    /// Select exactly the given groups (`All` when empty)
    pub fn only<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self {
            groups: groups.into_iter().map(Into::into).collect(),
        };
        if selection.groups.contains(ALL_GROUP) || selection.groups.is_empty() {
            selection = Self::all();
        }
        selection
    }

    pub fn includes_all(&self) -> bool {
        self.groups.contains(ALL_GROUP)
    }

    /// Exact, case-sensitive membership
    pub fn contains(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    pub fn matches(&self, group: &str) -> bool {
        self.includes_all() || self.contains(group)
    }

    pub fn select(&mut self, group: &str) {
        if group == ALL_GROUP {
            *self = Self::all();
            return;
        }
        self.groups.remove(ALL_GROUP);
        self.groups.insert(group.to_string());
    }

    pub fn deselect(&mut self, group: &str) {
        self.groups.remove(group);
        if self.groups.is_empty() {
            *self = Self::all();
        }
    }

    /// Flip a group's membership
    pub fn toggle(&mut self, group: &str) {
        if self.contains(group) {
            self.deselect(group);
        } else {
            self.select(group);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for GroupSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Case-insensitive plain substring match. An empty query matches everything.
pub fn matches_search(text: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    // ASCII fast path avoids allocating for the common case
    if text.is_ascii() && query.is_ascii() {
        let needle = query.as_bytes();
        return text
            .as_bytes()
            .windows(needle.len())
            .any(|w| w.eq_ignore_ascii_case(needle));
    }
    text.to_lowercase().contains(&query.to_lowercase())
}

/// Whether an item is visible under the given severity, group and search settings
pub fn passes<T: Filterable + ?Sized>(
    item: &T,
    severities: &SeverityVisibility,
    groups: &GroupSelection,
    query: &str,
) -> bool {
    severities.is_visible(item.severity())
        && groups.matches(item.group())
        && matches_search(item.search_text(), query)
}

/// The three filter settings shared by the flat and collapsed views
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub severities: SeverityVisibility,
    pub groups: GroupSelection,
    pub query: String,
}

impl ViewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_groups(mut self, groups: GroupSelection) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_query<S: Into<String>>(mut self, query: S) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_severities(mut self, severities: SeverityVisibility) -> Self {
        self.severities = severities;
        self
    }

    pub fn passes<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        passes(item, &self.severities, &self.groups, &self.query)
    }

    /// True when nothing is filtered out
    pub fn is_empty(&self) -> bool {
        self.severities == SeverityVisibility::default()
            && self.groups.includes_all()
            && self.query.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn record(severity: Severity, group: &str, text: &str) -> LogRecord {
        LogRecord {
            id: 0,
            timestamp: Local::now(),
            severity,
            group: group.to_string(),
            color: Default::default(),
            raw_text: text.to_string(),
            display_text: format!("[00:00:00] [{group}] {text}"),
            stack_trace: String::new(),
            collapse_key: String::new(),
        }
    }

    #[test]
    fn test_group_and_search_scenario() {
        let filter = ViewFilter::new()
            .with_groups(GroupSelection::only(["Net"]))
            .with_query("timeout");

        assert!(filter.passes(&record(Severity::Info, "Net", "connection timeout")));
        assert!(!filter.passes(&record(Severity::Info, "UI", "connection timeout")));
        assert!(!filter.passes(&record(Severity::Info, "Net", "connected ok")));
    }

    #[test]
    fn test_severity_toggles() {
        let mut severities = SeverityVisibility::default();
        severities.toggle(Severity::Warning);
        let filter = ViewFilter::new().with_severities(severities);

        assert!(filter.passes(&record(Severity::Error, "General", "x")));
        assert!(!filter.passes(&record(Severity::Warning, "General", "x")));
        assert!(filter.passes(&record(Severity::Info, "General", "x")));
    }

    #[test]
    fn test_group_match_is_case_sensitive() {
        let filter = ViewFilter::new().with_groups(GroupSelection::only(["net"]));
        assert!(!filter.passes(&record(Severity::Info, "Net", "x")));
    }

    #[test]
    fn test_search_is_case_insensitive_and_literal() {
        assert!(matches_search("Connection TIMEOUT", "timeout"));
        assert!(!matches_search("Größe überschritten", "GRÖSSE"));
        assert!(matches_search("Größe überschritten", "ÜBER"));
        assert!(matches_search("a.*b (x)", ".*b ("));
        assert!(!matches_search("ab", ".*"));
        assert!(matches_search("anything", ""));
        assert!(!matches_search("ab", "abc"));
    }

    #[test]
    fn test_search_ignores_timestamp() {
        let filter = ViewFilter::new().with_query("00:00");
        assert!(!filter.passes(&record(Severity::Info, "General", "boot")));
    }

    #[test]
    fn test_selection_semantics() {
        let mut selection = GroupSelection::all();
        selection.select("Net");
        assert!(!selection.includes_all());
        assert!(selection.contains("Net"));

        selection.select("UI");
        selection.deselect("Net");
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["UI"]);

        selection.toggle("UI");
        assert!(selection.includes_all());

        selection.select("Net");
        selection.select("All");
        assert_eq!(selection, GroupSelection::all());
    }

    #[test]
    fn test_only_with_all_or_nothing() {
        assert_eq!(GroupSelection::only(Vec::<String>::new()), GroupSelection::all());
        assert_eq!(GroupSelection::only(["Net", "All"]), GroupSelection::all());
    }

    #[test]
    fn test_collapsed_entry_uses_same_rules() {
        let r = record(Severity::Error, "Net", "connection timeout");
        let entry = CollapsedEntry::from_record(&r);
        let filter = ViewFilter::new()
            .with_groups(GroupSelection::only(["Net"]))
            .with_query("TIMEOUT");
        assert_eq!(filter.passes(&r), filter.passes(&entry));
    }

    #[test]
    fn test_empty_filter() {
        assert!(ViewFilter::new().is_empty());
        assert!(!ViewFilter::new().with_query("x").is_empty());
    }
}
