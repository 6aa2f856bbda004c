//! Linear undo/redo history of reversible commands.
//!
//! The history does not own the data it changes. It owns commands that know
//! how to move a target forward and backward, and a cursor separating the
//! applied commands from the undone ones.

mod error;
mod history;

pub use error::UndoError;
pub use history::{HistoryEntry, UndoHistory};

/// A change that can be applied to a target and reverted again.
///
/// Reverting right after applying must leave the target as it was before.
pub trait Reversible {
    type Target;

    /// Human readable name, e.g. for "Undo Add State" menu items.
    fn label(&self) -> &str;

    fn apply(&self, target: &mut Self::Target);

    fn revert(&self, target: &mut Self::Target);
}
