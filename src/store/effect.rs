//! Effects the store knows how to apply, and reversible commands built from
//! them.
//!
//! Every effect has "set" semantics: its payload describes what the affected
//! fields should look like afterwards. The backward payload of a command is
//! therefore just a snapshot of those fields taken before the forward effect
//! ran, and undo applies the very same effect with it.

use super::Phonebook;
use crate::core::{
    Info, Position, Sound, SoundId, State, StateExtension, StateId, StateSpec, TransitionConfig,
    TransitionRef, TransitionSet,
};
use crate::undo::Reversible;
use std::mem;

/// Everything that makes up one state inside the store, including the
/// transitions of other states pointing at it.
#[derive(Clone, Debug, PartialEq)]
pub struct StateEntry {
    pub state: State,
    pub transitions: TransitionSet,
    pub extension: StateExtension,
    /// Transitions of other sources targeting this state, with their source.
    pub inbound: Vec<(StateId, TransitionConfig)>,
    pub initial: bool,
    pub focused: bool,
}

impl StateEntry {
    /// Entry of a state that has just been created.
    pub fn fresh(state: State, position: Option<Position>) -> Self {
        Self {
            state,
            transitions: TransitionSet::default(),
            extension: position.map(StateExtension::at).unwrap_or_default(),
            inbound: Vec::new(),
            initial: false,
            focused: false,
        }
    }
}

/// A single atomic change to a [`Phonebook`].
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Make the state with `id` exist as `entry`, or remove it with its
    /// cascade when `entry` is `None`.
    PutState {
        id: StateId,
        entry: Option<Box<StateEntry>>,
    },
    UpdateState {
        id: StateId,
        spec: StateSpec,
    },
    MoveState {
        id: StateId,
        position: Option<Position>,
    },
    FocusState(Option<StateId>),
    SetInitialState(Option<StateId>),
    SetTransition {
        from: StateId,
        key: TransitionRef,
        config: Option<TransitionConfig>,
    },
    PutSound {
        id: SoundId,
        sound: Option<Sound>,
    },
    SetInfo(Info),
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PutState { .. } => "put_state",
            Self::UpdateState { .. } => "update_state",
            Self::MoveState { .. } => "move_state",
            Self::FocusState(_) => "focus_state",
            Self::SetInitialState(_) => "set_initial_state",
            Self::SetTransition { .. } => "set_transition",
            Self::PutSound { .. } => "put_sound",
            Self::SetInfo(_) => "set_info",
        }
    }
}

/// A labelled pair of payloads for the same effect.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    label: String,
    forward: Effect,
    backward: Effect,
}

impl Command {
    pub(crate) fn new(label: impl Into<String>, forward: Effect, backward: Effect) -> Self {
        debug_assert_eq!(
            mem::discriminant(&forward),
            mem::discriminant(&backward),
            "forward and backward payloads must belong to the same effect"
        );
        Self {
            label: label.into(),
            forward,
            backward,
        }
    }

    pub fn forward(&self) -> &Effect {
        &self.forward
    }

    pub fn backward(&self) -> &Effect {
        &self.backward
    }
}

impl Reversible for Command {
    type Target = Phonebook;

    fn label(&self) -> &str {
        &self.label
    }

    fn apply(&self, target: &mut Phonebook) {
        target.apply(&self.forward);
    }

    fn revert(&self, target: &mut Phonebook) {
        target.apply(&self.backward);
    }
}
