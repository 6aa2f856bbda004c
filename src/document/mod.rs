//! The exchanged phonebook document and its conversion from and to the
//! store.
//!
//! The document repeats no identities inside entities: states and sounds are
//! keyed by their identity. Loading reconstructs the identities, fills in
//! what the store relies on and rejects documents whose references do not
//! resolve, reporting every broken reference at once.

pub mod error;

pub use error::{DocumentError, IntegrityViolation};

use crate::core::{
    EditorExtension, Info, Sound, SoundId, State, StateId, TransitionSet, EXTENSION_VERSION,
};
use crate::store::Phonebook;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::warn;

/// Vendor specific extensions of the core format.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(default)]
    pub fernspieleditor: EditorExtension,
}

/// Serializable form of a [`Phonebook`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhonebookDocument {
    #[serde(default)]
    pub info: Info,
    #[serde(default)]
    pub initial: Option<StateId>,
    #[serde(default)]
    pub states: BTreeMap<StateId, State>,
    #[serde(default)]
    pub transitions: BTreeMap<StateId, TransitionSet>,
    #[serde(default)]
    pub sounds: BTreeMap<SoundId, Sound>,
    #[serde(default)]
    pub vendor: Vendor,
}

impl PhonebookDocument {
    /// Check that every state reference in the document resolves.
    ///
    /// All violations are accumulated rather than stopping at the first.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<IntegrityViolation>> {
        let known = |id: &StateId| id.is_any() || self.states.contains_key(id);
        let mut checks: Vec<Validation<(), NonEmptyVec<IntegrityViolation>>> = Vec::new();

        if let Some(id) = &self.initial {
            checks.push(if known(id) && !id.is_any() {
                Validation::success(())
            } else {
                Validation::fail(IntegrityViolation::UnknownInitialState { id: id.clone() })
            });
        }

        if let Some(id) = &self.vendor.fernspieleditor.focused_state_id {
            checks.push(if known(id) {
                Validation::success(())
            } else {
                Validation::fail(IntegrityViolation::UnknownFocusedState { id: id.clone() })
            });
        }

        for (from, set) in &self.transitions {
            if !known(from) {
                checks.push(Validation::fail(
                    IntegrityViolation::UnknownTransitionSource { from: from.clone() },
                ));
            }
            for config in set.entries() {
                let to = config.target();
                checks.push(if known(to) && !to.is_any() {
                    Validation::success(())
                } else {
                    Validation::fail(IntegrityViolation::DanglingTransitionTarget {
                        from: from.clone(),
                        kind: config.kind(),
                        to: to.clone(),
                    })
                });
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

impl Phonebook {
    /// Build a store from a document.
    ///
    /// # Example
    ///
    /// ```rust
    /// use phonebook_editor::document::PhonebookDocument;
    /// use phonebook_editor::store::Phonebook;
    ///
    /// let book = Phonebook::from_document(PhonebookDocument::default()).unwrap();
    /// assert_eq!(book.state_count(), 1); // the any state is always there
    /// ```
    pub fn from_document(document: PhonebookDocument) -> Result<Self, DocumentError> {
        let version = document.vendor.fernspieleditor.version;
        if version != EXTENSION_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                found: version,
                supported: EXTENSION_VERSION,
            });
        }

        if let Validation::Failure(violations) = document.validate() {
            return Err(DocumentError::Integrity(
                violations.iter().cloned().collect(),
            ));
        }

        if !document.states.contains_key(&StateId::any()) {
            warn!("Document lacks the any state, adding it");
        }
        let missing_extensions = document
            .states
            .keys()
            .filter(|id| {
                !document
                    .vendor
                    .fernspieleditor
                    .extension_properties
                    .states
                    .contains_key(*id)
            })
            .count();
        if missing_extensions > 0 {
            warn!(
                count = missing_extensions,
                "Document lacks editor properties for some states, using defaults"
            );
        }

        let orphaned_extensions = document
            .vendor
            .fernspieleditor
            .extension_properties
            .states
            .keys()
            .filter(|id| !id.is_any() && !document.states.contains_key(*id))
            .count();
        if orphaned_extensions > 0 {
            warn!(
                count = orphaned_extensions,
                "Document has editor properties for unknown states, dropping them"
            );
        }

        let PhonebookDocument {
            info,
            initial,
            states,
            transitions,
            sounds,
            vendor,
        } = document;
        Ok(Self::from_parts(
            info,
            initial,
            states,
            transitions,
            sounds,
            vendor.fernspieleditor,
        ))
    }

    pub fn to_document(&self) -> PhonebookDocument {
        PhonebookDocument {
            info: self.info().clone(),
            initial: self.initial().cloned(),
            states: self
                .states()
                .map(|state| (state.id.clone(), state.clone()))
                .collect(),
            transitions: self.transitions().clone(),
            sounds: self
                .sounds()
                .map(|(id, sound)| (id.clone(), sound.clone()))
                .collect(),
            vendor: Vendor {
                fernspieleditor: self.vendor().clone(),
            },
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let document: PhonebookDocument = serde_json::from_str(json)
            .map_err(|e| DocumentError::DeserializationFailed(e.to_string()))?;
        Self::from_document(document)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(&self.to_document())
            .map_err(|e| DocumentError::SerializationFailed(e.to_string()))
    }
}
