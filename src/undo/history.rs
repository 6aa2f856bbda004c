//! History buffer with a cursor.

use super::{Reversible, UndoError};
use chrono::{DateTime, Utc};
use tracing::debug;

/// A command together with the time it was first performed.
#[derive(Clone, Debug)]
pub struct HistoryEntry<C> {
    pub command: C,
    pub recorded_at: DateTime<Utc>,
}

/// Ordered, linear history of performed commands.
///
/// Entries before the cursor are applied, entries after it have been undone
/// and can be redone. Performing a new command discards the undone entries.
///
/// # Example
///
/// ```rust
/// use phonebook_editor::undo::{Reversible, UndoError, UndoHistory};
///
/// #[derive(Debug)]
/// struct Add(i32);
///
/// impl Reversible for Add {
///     type Target = i32;
///
///     fn label(&self) -> &str {
///         "Add"
///     }
///
///     fn apply(&self, target: &mut i32) {
///         *target += self.0;
///     }
///
///     fn revert(&self, target: &mut i32) {
///         *target -= self.0;
///     }
/// }
///
/// let mut value = 0;
/// let mut history = UndoHistory::new();
/// history.perform(Add(2), &mut value);
/// history.perform(Add(3), &mut value);
/// assert_eq!(value, 5);
///
/// history.undo(&mut value).unwrap();
/// assert_eq!(value, 2);
/// history.redo(&mut value).unwrap();
/// assert_eq!(value, 5);
/// assert_eq!(history.redo(&mut value).unwrap_err(), UndoError::NothingToRedo);
/// ```
#[derive(Clone, Debug)]
pub struct UndoHistory<C: Reversible> {
    entries: Vec<HistoryEntry<C>>,
    cursor: usize,
    limit: Option<usize>,
}

impl<C: Reversible> Default for UndoHistory<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Reversible> UndoHistory<C> {
    /// Create an empty, unbounded history.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            limit: None,
        }
    }

    /// Create an empty history keeping at most `limit` entries.
    ///
    /// When full, the oldest entry is forgotten and can no longer be undone.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new()
        }
    }

    /// Apply `command` to `target` and record it.
    ///
    /// Any undone entries are discarded, they can no longer be redone.
    pub fn perform(&mut self, command: C, target: &mut C::Target) {
        command.apply(target);
        self.record(command);
    }

    /// Record a command that has already been applied.
    pub fn record(&mut self, command: C) {
        let discarded = self.entries.len() - self.cursor;
        self.entries.truncate(self.cursor);
        debug!(
            label = command.label(),
            discarded, "Recording command in history"
        );
        self.entries.push(HistoryEntry {
            command,
            recorded_at: Utc::now(),
        });
        self.cursor = self.entries.len();

        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
                self.cursor -= excess;
            }
        }
    }

    /// Revert the most recently applied command.
    pub fn undo(&mut self, target: &mut C::Target) -> Result<&C, UndoError> {
        if self.cursor == 0 {
            return Err(UndoError::NothingToUndo);
        }
        self.cursor -= 1;
        let entry = &self.entries[self.cursor];
        debug!(label = entry.command.label(), "Undoing command");
        entry.command.revert(target);
        Ok(&entry.command)
    }

    /// Re-apply the most recently undone command.
    pub fn redo(&mut self, target: &mut C::Target) -> Result<&C, UndoError> {
        let Some(entry) = self.entries.get(self.cursor) else {
            return Err(UndoError::NothingToRedo);
        };
        debug!(label = entry.command.label(), "Redoing command");
        entry.command.apply(target);
        self.cursor += 1;
        Ok(&entry.command)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Label of the command [`undo`](Self::undo) would revert.
    pub fn undo_label(&self) -> Option<&str> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|entry| entry.command.label())
    }

    /// Label of the command [`redo`](Self::redo) would re-apply.
    pub fn redo_label(&self) -> Option<&str> {
        self.entries
            .get(self.cursor)
            .map(|entry| entry.command.label())
    }

    /// Number of applied entries, i.e. the position of the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// All entries, applied and undone, oldest first.
    pub fn entries(&self) -> &[HistoryEntry<C>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Push(char);

    impl Reversible for Push {
        type Target = String;

        fn label(&self) -> &str {
            "Push"
        }

        fn apply(&self, target: &mut String) {
            target.push(self.0);
        }

        fn revert(&self, target: &mut String) {
            target.pop();
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: UndoHistory<Push> = UndoHistory::new();
        assert!(history.is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo_label(), None);
    }

    #[test]
    fn undo_at_start_fails() {
        let mut text = String::new();
        let mut history: UndoHistory<Push> = UndoHistory::new();
        assert_eq!(history.undo(&mut text).unwrap_err(), UndoError::NothingToUndo);
    }

    #[test]
    fn redo_at_end_fails() {
        let mut text = String::new();
        let mut history = UndoHistory::new();
        history.perform(Push('a'), &mut text);
        assert_eq!(history.redo(&mut text).unwrap_err(), UndoError::NothingToRedo);
    }

    #[test]
    fn undo_and_redo_follow_history_order() {
        let mut text = String::new();
        let mut history = UndoHistory::new();
        history.perform(Push('a'), &mut text);
        history.perform(Push('b'), &mut text);
        history.perform(Push('c'), &mut text);

        history.undo(&mut text).unwrap();
        history.undo(&mut text).unwrap();
        assert_eq!(text, "a");
        assert_eq!(history.cursor(), 1);

        history.redo(&mut text).unwrap();
        assert_eq!(text, "ab");
    }

    #[test]
    fn perform_discards_redo_branch() {
        let mut text = String::new();
        let mut history = UndoHistory::new();
        history.perform(Push('a'), &mut text);
        history.perform(Push('b'), &mut text);
        history.undo(&mut text).unwrap();

        history.perform(Push('x'), &mut text);

        assert_eq!(text, "ax");
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.redo(&mut text).unwrap_err(), UndoError::NothingToRedo);
    }

    #[test]
    fn limit_evicts_oldest_entries() {
        let mut text = String::new();
        let mut history = UndoHistory::with_limit(2);
        history.perform(Push('a'), &mut text);
        history.perform(Push('b'), &mut text);
        history.perform(Push('c'), &mut text);

        assert_eq!(history.len(), 2);
        history.undo(&mut text).unwrap();
        history.undo(&mut text).unwrap();
        assert_eq!(text, "a");
        assert_eq!(history.undo(&mut text).unwrap_err(), UndoError::NothingToUndo);
    }

    #[test]
    fn labels_track_cursor() {
        let mut text = String::new();
        let mut history = UndoHistory::new();
        history.perform(Push('a'), &mut text);
        assert_eq!(history.undo_label(), Some("Push"));
        assert_eq!(history.redo_label(), None);

        history.undo(&mut text).unwrap();
        assert_eq!(history.undo_label(), None);
        assert_eq!(history.redo_label(), Some("Push"));
    }

    #[test]
    fn entries_record_timestamps_in_order() {
        let mut text = String::new();
        let mut history = UndoHistory::new();
        history.perform(Push('a'), &mut text);
        history.perform(Push('b'), &mut text);

        let entries = history.entries();
        assert!(entries[0].recorded_at <= entries[1].recorded_at);
        assert_eq!(entries[1].command, Push('b'));
    }
}
