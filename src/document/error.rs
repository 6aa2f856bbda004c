//! Document error types.

use crate::core::{StateId, TransitionKind};
use thiserror::Error;

/// A reference inside a loaded document that does not resolve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrityViolation {
    #[error("Initial state '{id}' does not exist")]
    UnknownInitialState { id: StateId },

    #[error("Focused state '{id}' does not exist")]
    UnknownFocusedState { id: StateId },

    #[error("Transitions are listed for unknown state '{from}'")]
    UnknownTransitionSource { from: StateId },

    #[error("{kind} transition from '{from}' targets unknown state '{to}'")]
    DanglingTransitionTarget {
        from: StateId,
        kind: TransitionKind,
        to: StateId,
    },
}

/// Errors that can occur while loading or storing documents
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Version of the editor extension is not supported
    #[error("Unsupported editor extension version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Document references {} missing state(s)", .0.len())]
    Integrity(Vec<IntegrityViolation>),
}
