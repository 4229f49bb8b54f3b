use std::collections::HashMap;

use slogscope_types::{CollapsedEntry, LogRecord};

/// Deduplicating store keyed by collapse key (the collapsed view)
///
/// Buckets live in a Vec in first-seen order; the map only points into it,
/// so iteration order never depends on hashing.
#[derive(Default)]
pub struct CollapseIndex {
    entries: Vec<CollapsedEntry>,
    positions: HashMap<String, usize>,
}

impl CollapseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a record into its bucket, creating the bucket on first sight
    pub fn fold(&mut self, record: &LogRecord) -> &CollapsedEntry {
        if let Some(&idx) = self.positions.get(&record.collapse_key) {
            let entry = &mut self.entries[idx];
            entry.count += 1;
            entry.latest_display_text.clone_from(&record.display_text);
            entry.latest_stack_trace.clone_from(&record.stack_trace);
            entry.latest_id = record.id;
            entry.last_seen = record.timestamp;
            return &self.entries[idx];
        }

        let idx = self.entries.len();
        self.entries.push(CollapsedEntry::from_record(record));
        self.positions.insert(record.collapse_key.clone(), idx);
        &self.entries[idx]
    }

    /// Buckets in the order their keys first appeared
    pub fn ordered_entries(&self) -> &[CollapsedEntry] {
        &self.entries
    }

    /// Buckets matching a predicate, in first-seen order
    pub fn filtered<F>(&self, predicate: F) -> Vec<CollapsedEntry>
    where
        F: Fn(&CollapsedEntry) -> bool,
    {
        self.entries
            .iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&CollapsedEntry> {
        self.positions.get(key).map(|&idx| &self.entries[idx])
    }

    /// Number of distinct keys since the last clear
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }
}
