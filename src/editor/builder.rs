//! Configuration and construction of editors.

use super::Editor;
use crate::debounce::{Debouncer, DEFAULT_QUIET_PERIOD};
use crate::store::Phonebook;
use crate::undo::UndoHistory;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables of an [`Editor`].
///
/// # Example
///
/// ```rust
/// use phonebook_editor::editor::EditorConfig;
/// use std::time::Duration;
///
/// let config: EditorConfig = serde_json::from_str(r#"{ "history_limit": 50 }"#).unwrap();
/// assert_eq!(config.quiet_period(), Duration::from_millis(100));
/// assert_eq!(config.history_limit, Some(50));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Quiet period of provisional edits, in milliseconds.
    pub quiet_period_ms: u64,
    /// Maximum number of undoable commands, unbounded if unset.
    pub history_limit: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: DEFAULT_QUIET_PERIOD.as_millis() as u64,
            history_limit: None,
        }
    }
}

impl EditorConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }
}

/// Builder for constructing editors with a fluent API.
#[derive(Debug, Default)]
pub struct EditorBuilder {
    config: EditorConfig,
    phonebook: Option<Phonebook>,
}

impl EditorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all tunables at once.
    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn quiet_period(mut self, quiet_period: Duration) -> Self {
        self.config.quiet_period_ms = quiet_period.as_millis() as u64;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = Some(limit);
        self
    }

    /// Start from an existing phonebook instead of an empty one.
    pub fn phonebook(mut self, phonebook: Phonebook) -> Self {
        self.phonebook = Some(phonebook);
        self
    }

    pub fn build(self) -> Editor {
        let history = match self.config.history_limit {
            Some(limit) => UndoHistory::with_limit(limit),
            None => UndoHistory::new(),
        };
        Editor {
            phonebook: self.phonebook.unwrap_or_default(),
            history,
            pending: Debouncer::new(self.config.quiet_period()),
        }
    }
}
