//! Errors raised by the entity store.

use crate::core::{StateId, TransitionKind};
use std::fmt;
use thiserror::Error;

/// Kind of entity an identity was expected to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    State,
    Sound,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State => f.write_str("state"),
            Self::Sound => f.write_str("sound"),
        }
    }
}

/// Errors that reject a mutation before it touches the store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("No {kind} with ID '{id}'")]
    UnknownEntity { kind: EntityKind, id: String },

    #[error("The '{id}' state cannot be removed")]
    ProtectedEntity { id: StateId },

    #[error("Invalid {kind} transition: {reason}")]
    InvalidTransition { kind: TransitionKind, reason: String },
}

impl StoreError {
    pub(crate) fn unknown_state(id: &StateId) -> Self {
        Self::UnknownEntity {
            kind: EntityKind::State,
            id: id.to_string(),
        }
    }
}
