//! Identities of phonebook entities.
//!
//! Identities are opaque strings. Fresh ones are UUID v4 values, assigned once
//! at creation and never reused or mutated afterwards.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Identity of the pseudo-state that stands for "every state".
pub const ANY_STATE_ID: &str = "any";

/// Identity of a state in the phonebook.
///
/// # Example
///
/// ```rust
/// use phonebook_editor::core::StateId;
///
/// let any = StateId::any();
/// assert!(any.is_any());
///
/// let fresh = StateId::generate();
/// assert!(!fresh.is_any());
/// assert_ne!(fresh, StateId::generate());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(String);

impl StateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocate a fresh, never before used identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The distinguished `any` state.
    pub fn any() -> Self {
        Self(ANY_STATE_ID.to_string())
    }

    pub fn is_any(&self) -> bool {
        self.0 == ANY_STATE_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity of a sound in the phonebook.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundId(String);

impl SoundId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_id_conversions {
    ($($id:ty),*) => {
        $(
            impl fmt::Display for $id {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $id {
                fn from(id: &str) -> Self {
                    Self::new(id)
                }
            }

            impl From<String> for $id {
                fn from(id: String) -> Self {
                    Self(id)
                }
            }

            impl Borrow<str> for $id {
                fn borrow(&self) -> &str {
                    &self.0
                }
            }
        )*
    };
}

impl_id_conversions!(StateId, SoundId);
