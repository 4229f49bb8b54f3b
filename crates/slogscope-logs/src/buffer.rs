use std::collections::VecDeque;
use std::sync::Arc;

use slogscope_types::{LogRecord, Severity, SeverityCounts};

/// Default maximum number of resident flat records
pub const DEFAULT_CAPACITY: usize = 5000;

/// Shared handle to an ingested record
pub type ArcLogRecord = Arc<LogRecord>;

/// Running per-severity counters, kept in step with the buffer contents
#[derive(Default)]
struct RunningCounts(SeverityCounts);

impl RunningCounts {
    fn slot(&mut self, severity: Severity) -> &mut usize {
        match severity {
            Severity::Error => &mut self.0.errors,
            Severity::Warning => &mut self.0.warnings,
            Severity::Info => &mut self.0.infos,
        }
    }

    fn increment(&mut self, severity: Severity) {
        *self.slot(severity) += 1;
    }

    fn decrement(&mut self, severity: Severity) {
        let slot = self.slot(severity);
        *slot = slot.saturating_sub(1);
    }

    fn reset(&mut self) {
        self.0 = SeverityCounts::default();
    }
}

/// Bounded FIFO store of every ingested record (the flat view)
pub struct IngestionBuffer {
    /// Records oldest first. Arc so snapshots don't copy record text.
    entries: VecDeque<ArcLogRecord>,

    /// Maximum capacity
    capacity: usize,

    /// O(1) severity counts, net of eviction
    counts: RunningCounts,

    /// Records evicted since the last clear
    evicted: u64,
}

impl IngestionBuffer {
    /// Create a buffer holding at most `capacity` records (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
            counts: RunningCounts::default(),
            evicted: 0,
        }
    }

    /// Append a record, evicting the oldest one when over capacity
    ///
    /// Returns the evicted record, if any.
    pub fn append(&mut self, record: ArcLogRecord) -> Option<ArcLogRecord> {
        self.counts.increment(record.severity);
        self.entries.push_back(record);

        if self.entries.len() > self.capacity {
            let evicted = self.entries.pop_front()?;
            self.counts.decrement(evicted.severity);
            self.evicted += 1;
            return Some(evicted);
        }
        None
    }

    /// All resident records, oldest first (Arc clones only)
    pub fn snapshot(&self) -> Vec<ArcLogRecord> {
        self.entries.iter().cloned().collect()
    }

    /// Resident records matching a predicate, oldest first
    pub fn filtered<F>(&self, predicate: F) -> Vec<ArcLogRecord>
    where
        F: Fn(&LogRecord) -> bool,
    {
        self.entries
            .iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }

    /// Look up a resident record by ID
    pub fn get(&self, id: u64) -> Option<ArcLogRecord> {
        // IDs are ascending, so binary search works on the deque
        self.entries
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|idx| Arc::clone(&self.entries[idx]))
    }

    /// Per-severity counts of resident records
    pub fn counts(&self) -> SeverityCounts {
        self.counts.0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of records dropped by FIFO eviction since the last clear
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Clear all records and counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.counts.reset();
        self.evicted = 0;
    }
}

impl Default for IngestionBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn record(id: u64, severity: Severity, text: &str) -> ArcLogRecord {
        Arc::new(LogRecord {
            id,
            timestamp: Local::now(),
            severity,
            group: "General".to_string(),
            color: Default::default(),
            raw_text: text.to_string(),
            display_text: text.to_string(),
            stack_trace: String::new(),
            collapse_key: text.to_string(),
        })
    }

    #[test]
    fn test_fifo_eviction() {
        let mut buffer = IngestionBuffer::new(3);
        for (id, text) in ["A", "B", "C", "D", "E"].iter().enumerate() {
            buffer.append(record(id as u64, Severity::Info, text));
        }

        let texts: Vec<_> = buffer.snapshot().iter().map(|r| r.raw_text.clone()).collect();
        assert_eq!(texts, vec!["C", "D", "E"]);
        assert_eq!(buffer.counts().infos, 3);
        assert_eq!(buffer.evicted(), 2);
    }

    #[test]
    fn test_counts_track_eviction_per_severity() {
        let mut buffer = IngestionBuffer::new(2);
        buffer.append(record(0, Severity::Error, "e"));
        buffer.append(record(1, Severity::Warning, "w"));
        let evicted = buffer.append(record(2, Severity::Info, "i"));

        assert_eq!(evicted.map(|r| r.severity), Some(Severity::Error));
        let counts = buffer.counts();
        assert_eq!(counts.errors, 0);
        assert_eq!(counts.warnings, 1);
        assert_eq!(counts.infos, 1);
        assert_eq!(counts.total(), buffer.len());
    }

    #[test]
    fn test_counts_sum_is_bounded() {
        let mut buffer = IngestionBuffer::new(10);
        for id in 0..25u64 {
            let severity = Severity::ALL[(id % 3) as usize];
            buffer.append(record(id, severity, "x"));
            assert_eq!(buffer.counts().total(), ((id + 1) as usize).min(10));
        }
    }

    #[test]
    fn test_clear_resets_counts() {
        let mut buffer = IngestionBuffer::new(4);
        buffer.append(record(0, Severity::Error, "e"));
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.counts(), SeverityCounts::default());
    }

    #[test]
    fn test_get_by_id() {
        let mut buffer = IngestionBuffer::new(2);
        for id in 10..13u64 {
            buffer.append(record(id, Severity::Info, "x"));
        }
        assert!(buffer.get(10).is_none());
        assert_eq!(buffer.get(12).map(|r| r.id), Some(12));
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut buffer = IngestionBuffer::new(0);
        buffer.append(record(0, Severity::Info, "a"));
        buffer.append(record(1, Severity::Info, "b"));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.capacity(), 1);
    }
}
