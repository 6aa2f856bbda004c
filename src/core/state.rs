//! States of the phonebook automaton.
//!
//! A state is one node of the automaton: while the phone is in it, the
//! listed sounds play and the bell rings with the given intensity.

use super::ids::{SoundId, StateId};
use serde::{Deserialize, Serialize};

/// Name given to the `any` pseudo-state.
pub const ANY_STATE_NAME: &str = "Any State";

/// One node of the automaton.
///
/// The identity is duplicated as the map key in the exchanged document and is
/// therefore never serialized with the state itself.
///
/// # Example
///
/// ```rust
/// use phonebook_editor::core::{State, StateId, StateSpec};
///
/// let state = State::from_spec(
///     StateId::from("ring"),
///     StateSpec::new().name("Ring").ring(0.5),
/// );
/// assert_eq!(state.name, "Ring");
/// assert_eq!(state.ring, 0.5);
/// assert!(!state.terminal);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(skip)]
    pub id: StateId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sounds: Vec<SoundId>,
    #[serde(default)]
    pub ring: f64,
    #[serde(default)]
    pub terminal: bool,
}

impl State {
    /// Template new states are created from before the caller's spec is
    /// merged over it.
    pub fn template(id: StateId) -> Self {
        Self {
            id,
            name: "New State".to_string(),
            description: String::new(),
            sounds: Vec::new(),
            ring: 0.0,
            terminal: false,
        }
    }

    /// The `any` state every phonebook contains.
    pub fn any() -> Self {
        Self {
            id: StateId::any(),
            name: ANY_STATE_NAME.to_string(),
            description: "Transitions from here apply in every state".to_string(),
            sounds: Vec::new(),
            ring: 0.0,
            terminal: false,
        }
    }

    /// Create a state by merging `spec` over the default template.
    pub fn from_spec(id: StateId, spec: StateSpec) -> Self {
        let mut state = Self::template(id);
        state.merge(spec);
        state
    }

    /// Overwrite the fields present in `spec`. The identity is untouched.
    pub fn merge(&mut self, spec: StateSpec) {
        if let Some(name) = spec.name {
            self.name = name;
        }
        if let Some(description) = spec.description {
            self.description = description;
        }
        if let Some(sounds) = spec.sounds {
            self.sounds = sounds;
        }
        if let Some(ring) = spec.ring {
            self.ring = clamp_ring(ring);
        }
        if let Some(terminal) = spec.terminal {
            self.terminal = terminal;
        }
    }

    /// Current values of exactly the fields `spec` would overwrite.
    pub fn snapshot(&self, spec: &StateSpec) -> StateSpec {
        StateSpec {
            name: spec.name.as_ref().map(|_| self.name.clone()),
            description: spec.description.as_ref().map(|_| self.description.clone()),
            sounds: spec.sounds.as_ref().map(|_| self.sounds.clone()),
            ring: spec.ring.map(|_| self.ring),
            terminal: spec.terminal.map(|_| self.terminal),
        }
    }

    /// Pull loaded values back into range, the same way [`State::merge`] does.
    pub fn normalize(&mut self) {
        self.ring = clamp_ring(self.ring);
    }
}

/// Ring intensity is a fraction in `[0, 1]`; anything else is pulled back in.
fn clamp_ring(ring: f64) -> f64 {
    if ring.is_nan() {
        0.0
    } else {
        ring.clamp(0.0, 1.0)
    }
}

/// Partial state used for creation and updates.
///
/// There is deliberately no identity field: identities are assigned by the
/// store and never change.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sounds: Option<Vec<SoundId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ring: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<bool>,
}

impl StateSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn sounds(mut self, sounds: Vec<SoundId>) -> Self {
        self.sounds = Some(sounds);
        self
    }

    pub fn ring(mut self, ring: f64) -> Self {
        self.ring = Some(ring);
        self
    }

    pub fn terminal(mut self, terminal: bool) -> Self {
        self.terminal = Some(terminal);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
