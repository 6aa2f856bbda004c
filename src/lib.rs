//! Phonebook editor: an undoable entity model for answering machines
//!
//! A phonebook describes the behaviour of an automated answering device as a
//! finite state machine: states that ring and play sounds, and typed
//! transitions between them. This crate keeps such a phonebook consistent
//! while a user edits it, and makes every edit undoable.
//!
//! # Core Concepts
//!
//! - **Entities**: States, sounds, transitions and metadata in [`core`]
//! - **Store**: [`store::Phonebook`] enforces identity and referential integrity
//! - **Commands**: Every mutation is a forward/backward pair of the same effect
//! - **History**: [`undo::UndoHistory`] keeps a linear history with a cursor
//! - **Debounce**: [`debounce::Debouncer`] coalesces rapid provisional edits
//!
//! # Example
//!
//! ```rust
//! use phonebook_editor::core::{StateId, StateSpec, TransitionConfig, TransitionRef};
//! use phonebook_editor::editor::Editor;
//!
//! let mut editor = Editor::new();
//! let s1 = editor.add_state(StateSpec::new().name("Ring"));
//! let s2 = editor.add_state(StateSpec::new().name("Talk"));
//! let s3 = editor.add_state(StateSpec::new().name("Pause"));
//!
//! editor.add_transition(&s1, TransitionConfig::Dial { num: "6".into(), to: s3 }).unwrap();
//! editor.add_transition(&s1, TransitionConfig::Dial { num: "5".into(), to: s2 }).unwrap();
//!
//! let labels: Vec<_> = editor
//!     .phonebook()
//!     .transition_summaries_from(&s1)
//!     .into_iter()
//!     .map(|summary| summary.when)
//!     .collect();
//! assert_eq!(labels, vec!["Dial 5", "Dial 6"]);
//!
//! editor.remove_transition(&s1, TransitionRef::Dial { num: "5".into() }).unwrap();
//! assert_eq!(editor.phonebook().transition_summaries_from(&s1).len(), 1);
//!
//! assert!(editor.remove_state(&StateId::any()).is_err());
//! ```

pub mod core;
pub mod debounce;
pub mod document;
pub mod editor;
pub mod error;
pub mod store;
pub mod undo;

// Re-export commonly used types
pub use crate::core::{
    Info, InfoSpec, Position, Sound, SoundId, State, StateId, StateSpec, TransitionConfig,
    TransitionKind, TransitionRef,
};
pub use document::{DocumentError, PhonebookDocument};
pub use editor::{Editor, EditorBuilder, EditorConfig, PendingEdit};
pub use error::Error;
pub use store::{Phonebook, StoreError, TransitionSummary};
pub use undo::{Reversible, UndoError, UndoHistory};
