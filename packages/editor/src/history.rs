//! # Undo/Redo History
//!
//! Linear history of whole-state snapshots.
//!
//! ## Design
//!
//! - Entry 0 is the state the session started from
//! - Every undo-able mutation pushes the full new state at `index + 1`,
//!   discarding anything beyond (the redo branch)
//! - Undo/redo only move the index; the caller swaps the returned snapshot in
//! - Batches collapse any number of mutations into one entry, pushed when
//!   the outermost batch ends
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(initial.clone(), 100);
//!
//! history.record(after_insert, Some("Insert heading".into()));
//!
//! let previous = history.undo().cloned();   // back to `initial`
//! let next = history.redo().cloned();       // forward again
//! ```

/// One point in history
#[derive(Debug, Clone)]
pub struct HistoryEntry<T> {
    pub snapshot: T,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
struct OpenBatch {
    description: Option<String>,
    changed_before: bool,
}

/// Snapshot-based undo/redo history
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<HistoryEntry<T>>,

    /// Position of the live state in `entries`
    index: usize,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Open batches, outermost first
    batches: Vec<OpenBatch>,

    /// Whether anything was recorded inside the open batches
    batch_changed: bool,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T, max_levels: usize) -> Self {
        Self {
            entries: vec![HistoryEntry {
                snapshot: initial,
                description: None,
            }],
            index: 0,
            max_levels,
            batches: Vec::new(),
            batch_changed: false,
        }
    }

    /// Record the state after an undo-able mutation.
    ///
    /// Inside a batch the snapshot is deferred until the batch ends.
    pub fn record(&mut self, snapshot: T, description: Option<String>) {
        if self.is_batching() {
            self.batch_changed = true;
            return;
        }
        self.push(HistoryEntry {
            snapshot,
            description,
        });
    }

    /// Start a batch; nested batches fold into the outermost one
    pub fn begin_batch(&mut self, description: Option<String>) {
        self.batches.push(OpenBatch {
            description,
            changed_before: self.batch_changed,
        });
    }

    /// Close the innermost batch.
    ///
    /// When the outermost batch closes and something was recorded, `current`
    /// becomes a single new entry. Returns whether an entry was pushed.
    pub fn end_batch(&mut self, current: T) -> bool {
        let Some(batch) = self.batches.pop() else {
            return false;
        };
        if self.is_batching() || !self.batch_changed {
            return false;
        }

        self.batch_changed = false;
        self.push(HistoryEntry {
            snapshot: current,
            description: batch.description,
        });
        true
    }

    /// Close the innermost batch, forgetting what was recorded inside it.
    ///
    /// The caller is responsible for rolling the live state back.
    pub fn abort_batch(&mut self) {
        if let Some(batch) = self.batches.pop() {
            self.batch_changed = batch.changed_before;
        }
    }

    pub fn is_batching(&self) -> bool {
        !self.batches.is_empty()
    }

    fn push(&mut self, entry: HistoryEntry<T>) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index += 1;

        if self.max_levels > 0 && self.index > self.max_levels {
            let excess = self.index - self.max_levels;
            self.entries.drain(..excess);
            self.index -= excess;
        }
    }

    /// Step back; returns the snapshot that is now current
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index].snapshot)
    }

    /// Step forward; returns the snapshot that is now current
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index].snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0 && !self.is_batching()
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len() && !self.is_batching()
    }

    pub fn undo_levels(&self) -> usize {
        self.index
    }

    pub fn redo_levels(&self) -> usize {
        self.entries.len() - self.index - 1
    }

    pub fn current(&self) -> &T {
        &self.entries[self.index].snapshot
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Description of the entry the next undo would revert
    pub fn undo_description(&self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.entries[self.index].description.as_deref()
    }

    /// Description of the entry the next redo would re-apply
    pub fn redo_description(&self) -> Option<&str> {
        self.entries
            .get(self.index + 1)
            .and_then(|entry| entry.description.as_deref())
    }

    /// Drop all history, starting over from `initial`
    pub fn reset(&mut self, initial: T) {
        self.entries = vec![HistoryEntry {
            snapshot: initial,
            description: None,
        }];
        self.index = 0;
        self.batches.clear();
        self.batch_changed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_creation() {
        let history = History::new(0, 100);
        assert_eq!(history.undo_levels(), 0);
        assert_eq!(history.redo_levels(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(*history.current(), 0);
    }

    #[test]
    fn test_record_undo_redo() {
        let mut history = History::new(0, 100);
        history.record(1, Some("one".into()));
        history.record(2, Some("two".into()));

        assert_eq!(history.undo_description(), Some("two"));
        assert_eq!(history.undo(), Some(&1));
        assert_eq!(history.undo(), Some(&0));
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo_description(), Some("one"));
        assert_eq!(history.redo(), Some(&1));
        assert_eq!(history.redo(), Some(&2));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_new_record_discards_redo_branch() {
        let mut history = History::new(0, 100);
        history.record(1, None);
        history.record(2, None);
        history.undo();

        assert_eq!(history.redo_levels(), 1);
        history.record(3, None);

        assert_eq!(history.redo_levels(), 0);
        assert_eq!(history.undo(), Some(&1));
    }

    #[test]
    fn test_batch_collapses_to_one_entry() {
        let mut history = History::new(0, 100);
        history.begin_batch(Some("Import".into()));
        history.record(1, None);
        history.begin_batch(None);
        history.record(2, None);
        assert!(!history.end_batch(2));
        history.record(3, None);
        assert!(history.end_batch(3));

        assert_eq!(history.undo_levels(), 1);
        assert_eq!(history.undo_description(), Some("Import"));
        assert_eq!(history.undo(), Some(&0));
    }

    #[test]
    fn test_empty_batch_records_nothing() {
        let mut history = History::new(0, 100);
        history.begin_batch(None);
        assert!(!history.end_batch(0));
        assert_eq!(history.undo_levels(), 0);
    }

    #[test]
    fn test_aborted_inner_batch_keeps_outer_state() {
        let mut history = History::new(0, 100);
        history.begin_batch(None);
        history.begin_batch(None);
        history.record(1, None);
        history.abort_batch();
        assert!(!history.end_batch(0));
        assert_eq!(history.undo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut history = History::new(0, 2);
        for i in 1..=3 {
            history.record(i, None);
        }

        assert_eq!(history.undo_levels(), 2);
        assert_eq!(history.undo(), Some(&2));
        assert_eq!(history.undo(), Some(&1));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_unlimited_levels() {
        let mut history = History::new(0, 0);
        for i in 1..=250 {
            history.record(i, None);
        }
        assert_eq!(history.undo_levels(), 250);
    }
}
