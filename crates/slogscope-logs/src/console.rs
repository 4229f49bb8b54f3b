use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

use slogscope_types::{CollapsedEntry, GroupColor, LogEvent, Severity, SeverityCounts};

use crate::buffer::{ArcLogRecord, IngestionBuffer};
use crate::builder::LogRecordBuilder;
use crate::collapse::CollapseIndex;
use crate::directory::{GroupDirectory, GroupEntry, GroupRegistry};
use crate::error::{ConsoleError, Result};
use crate::filter::ViewFilter;

/// Everything mutated by ingestion, kept behind one lock
struct ConsoleState {
    directory: GroupDirectory,
    buffer: IngestionBuffer,
    collapsed: CollapseIndex,
    next_id: u64,
    /// Bumped on every mutation so readers can cache filtered views
    generation: u64,
}

/// The log console: flat and collapsed views over one ingestion stream
///
/// Ingestion and clearing each take the single state lock, so a record is
/// always appended and folded together and a clear empties both views at once.
#[derive(Clone)]
pub struct LogConsole {
    state: Arc<Mutex<ConsoleState>>,
}

impl LogConsole {
    /// Create a console retaining at most `capacity` flat records
    pub fn new(capacity: usize) -> Self {
        Self::with_directory(capacity, GroupDirectory::new())
    }

    /// Create a console using an existing group directory
    pub fn with_directory(capacity: usize, directory: GroupDirectory) -> Self {
        Self {
            state: Arc::new(Mutex::new(ConsoleState {
                directory,
                buffer: IngestionBuffer::new(capacity),
                collapsed: CollapseIndex::new(),
                next_id: 0,
                generation: 0,
            })),
        }
    }

    /// Ingest one log callback stamped with the current local time
    pub fn ingest(&self, text: &str, stack_trace: &str, severity: Severity) -> ArcLogRecord {
        self.ingest_at(text, stack_trace, severity, Local::now())
    }

    /// Ingest a host log event
    pub fn ingest_event(&self, event: &LogEvent) -> ArcLogRecord {
        self.ingest(&event.text, &event.stack_trace, event.severity)
    }

    /// Ingest one log callback with an explicit arrival time
    pub fn ingest_at(
        &self,
        text: &str,
        stack_trace: &str,
        severity: Severity,
        now: DateTime<Local>,
    ) -> ArcLogRecord {
        let mut state = self.state.lock();
        let state = &mut *state;

        let mut record =
            LogRecordBuilder::build(text, stack_trace, severity, now, &mut state.directory);
        record.id = state.next_id;
        state.next_id += 1;

        let record = Arc::new(record);
        state.collapsed.fold(&record);
        if let Some(evicted) = state.buffer.append(Arc::clone(&record)) {
            tracing::trace!(id = evicted.id, "evicted oldest record");
        }
        state.generation += 1;

        record
    }

    /// Resident flat records passing `filter`, oldest first
    pub fn flat_view(&self, filter: &ViewFilter) -> Vec<ArcLogRecord> {
        let state = self.state.lock();
        if filter.is_empty() {
            return state.buffer.snapshot();
        }
        state.buffer.filtered(|r| filter.passes(r))
    }

    /// Collapsed buckets passing `filter`, in first-seen order
    pub fn collapsed_view(&self, filter: &ViewFilter) -> Vec<CollapsedEntry> {
        self.state.lock().collapsed.filtered(|e| filter.passes(e))
    }

    /// Per-severity counts of resident flat records (unfiltered)
    pub fn counts(&self) -> SeverityCounts {
        self.state.lock().buffer.counts()
    }

    /// Empty both views together
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.buffer.clear();
        state.collapsed.clear();
        state.generation += 1;
        tracing::debug!("cleared console");
    }

    /// Number of resident flat records
    pub fn len(&self) -> usize {
        self.state.lock().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().buffer.is_empty()
    }

    /// Number of collapsed buckets
    pub fn collapsed_len(&self) -> usize {
        self.state.lock().collapsed.len()
    }

    pub fn capacity(&self) -> usize {
        self.state.lock().buffer.capacity()
    }

    /// Records dropped by eviction since the last clear
    pub fn evicted(&self) -> u64 {
        self.state.lock().buffer.evicted()
    }

    /// Changes whenever either view changes
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Resident flat record by ID
    pub fn record(&self, id: u64) -> Option<ArcLogRecord> {
        self.state.lock().buffer.get(id)
    }

    /// Collapsed bucket by key
    pub fn collapsed_entry(&self, key: &str) -> Option<CollapsedEntry> {
        self.state.lock().collapsed.get(key).cloned()
    }

    // ------------------------------------------------------------------
    // Group management
    // ------------------------------------------------------------------

    /// Snapshot of the group directory in insertion order
    pub fn groups(&self) -> Vec<GroupEntry> {
        self.state.lock().directory.entries().to_vec()
    }

    pub fn group_names(&self) -> Vec<String> {
        self.state.lock().directory.names()
    }

    pub fn add_group(&self, name: &str, color: GroupColor) -> bool {
        let mut state = self.state.lock();
        let added = state.directory.add(name, color);
        if added {
            state.generation += 1;
        }
        added
    }

    /// Change a group's color. Records already ingested keep their color.
    pub fn set_group_color(&self, name: &str, color: GroupColor) -> Result<()> {
        let mut state = self.state.lock();
        state.directory.set_color(name, color)?;
        state.generation += 1;
        Ok(())
    }

    /// Remove a non-sentinel group from the directory
    ///
    /// Refused while any entry since the last clear carries the group, so every
    /// record and bucket keeps a group the directory knows about.
    pub fn remove_group(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock();
        let group = state
            .directory
            .canonical_name(name)
            .map(str::to_string)
            .ok_or_else(|| ConsoleError::UnknownGroup(name.to_string()))?;

        // Buckets outlive evicted records, so they cover every resident record too
        if state
            .collapsed
            .ordered_entries()
            .iter()
            .any(|entry| entry.group == group)
        {
            return Err(ConsoleError::GroupInUse(group));
        }

        if !state.directory.remove(&group) {
            return Err(ConsoleError::ProtectedGroup(group));
        }
        state.generation += 1;
        Ok(())
    }

    /// Persist the group directory
    pub fn save_groups(&self, path: &Path) -> Result<()> {
        // Clone so the lock isn't held across file I/O
        let directory = self.state.lock().directory.clone();
        directory.save(path)
    }
}

impl Default for LogConsole {
    fn default() -> Self {
        Self::new(crate::buffer::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::GroupSelection;

    #[test]
    fn test_ids_are_sequential_across_clear() {
        let console = LogConsole::new(10);
        let a = console.ingest("a", "", Severity::Info);
        console.clear();
        let b = console.ingest("b", "", Severity::Info);
        assert!(b.id > a.id);
    }

    #[test]
    fn test_clear_empties_both_views() {
        let console = LogConsole::new(10);
        console.ingest("a", "", Severity::Error);
        console.ingest("a", "", Severity::Error);
        console.clear();

        assert!(console.is_empty());
        assert_eq!(console.collapsed_len(), 0);
        assert_eq!(console.counts(), SeverityCounts::default());
    }

    #[test]
    fn test_generation_changes_on_mutation() {
        let console = LogConsole::new(10);
        let g0 = console.generation();
        console.ingest("a", "", Severity::Info);
        let g1 = console.generation();
        assert_ne!(g0, g1);
        console.clear();
        assert_ne!(g1, console.generation());
    }

    #[test]
    fn test_remove_group_refused_while_in_use() {
        let console = LogConsole::new(10);
        console.ingest("[Slogger][Net] up", "", Severity::Info);

        assert!(matches!(
            console.remove_group("net"),
            Err(ConsoleError::GroupInUse(group)) if group == "Net"
        ));
        assert!(console.group_names().contains(&"Net".to_string()));

        console.clear();
        console.remove_group("Net").unwrap();
        assert!(!console.group_names().contains(&"Net".to_string()));

        console.ingest("[Slogger][Net] up", "", Severity::Info);
        assert!(console.group_names().contains(&"Net".to_string()));
    }

    #[test]
    fn test_remove_group_in_use_after_eviction() {
        // The record is evicted but its bucket still names the group
        let console = LogConsole::new(1);
        console.ingest("[Slogger][Net] up", "", Severity::Info);
        console.ingest("other", "", Severity::Info);

        assert!(matches!(console.remove_group("Net"), Err(ConsoleError::GroupInUse(_))));
    }

    #[test]
    fn test_remove_group_rejects_sentinels_and_unknown() {
        let console = LogConsole::new(10);
        assert!(matches!(
            console.remove_group("General"),
            Err(ConsoleError::ProtectedGroup(_))
        ));
        assert!(matches!(console.remove_group("All"), Err(ConsoleError::ProtectedGroup(_))));
        assert!(matches!(console.remove_group("Audio"), Err(ConsoleError::UnknownGroup(_))));
    }

    #[test]
    fn test_set_group_color_applies_to_new_records() {
        let console = LogConsole::new(10);
        console.ingest("[Slogger][Net] a", "", Severity::Info);
        let red = GroupColor::rgb(0xFF, 0, 0);
        console.set_group_color("Net", red).unwrap();

        let record = console.ingest("[Slogger][Net] b", "", Severity::Info);
        assert_eq!(record.color, red);
        assert!(record.display_text.contains("#FF0000FF"));
    }

    #[test]
    fn test_flat_view_filters() {
        let console = LogConsole::new(10);
        console.ingest("[Slogger][Net] x", "", Severity::Info);
        console.ingest("[Slogger][UI] x", "", Severity::Info);

        let filter = ViewFilter::new().with_groups(GroupSelection::only(["UI"]));
        let view = console.flat_view(&filter);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].group, "UI");
    }

    #[test]
    fn test_console_is_shareable_across_threads() {
        let console = LogConsole::new(1000);
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let console = console.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        console.ingest(&format!("t{t} m{}", i % 5), "", Severity::Info);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(console.len(), 400);
        let total: usize = console
            .collapsed_view(&ViewFilter::new())
            .iter()
            .map(|e| e.count)
            .sum();
        assert_eq!(total, 400);
        assert_eq!(console.collapsed_len(), 20);
    }
}
