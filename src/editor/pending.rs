use crate::core::{InfoSpec, SoundId, StateId, StateSpec};
use crate::store::{Command, Phonebook};
use serde_json::Value;

/// A provisional edit waiting for its quiet period to pass.
///
/// Only the request is kept. It is turned into a [`Command`] against the
/// phonebook as it is when the edit is committed, so actions performed in
/// between are neither overwritten nor resurrected.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingEdit {
    State { id: StateId, spec: StateSpec },
    Sound { id: SoundId, fields: Value },
    Info(InfoSpec),
}

impl PendingEdit {
    /// Prepare the command this edit stands for, if its target still resolves.
    pub fn resolve(&self, phonebook: &Phonebook) -> Option<Command> {
        match self {
            PendingEdit::State { id, spec } => phonebook.prepare_update_state(id, spec.clone()),
            PendingEdit::Sound { id, fields } => phonebook.prepare_update_sound(id, fields),
            PendingEdit::Info(spec) => Some(phonebook.prepare_update_info(spec)),
        }
    }
}
