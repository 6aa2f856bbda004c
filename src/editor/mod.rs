//! The action surface of the phonebook editor.
//!
//! An [`Editor`] owns a [`Phonebook`], the undo history of commands applied
//! to it and a single debounce slot for provisional edits. Every mutating
//! action goes through the history, except [`Editor::bump_iteration`], which
//! records that the phonebook was observed from the outside and must stay
//! put when the user undoes.

mod builder;
mod pending;

pub use builder::{EditorBuilder, EditorConfig};
pub use pending::PendingEdit;

use crate::core::{
    InfoSpec, Position, SoundId, StateId, StateSpec, TransitionConfig, TransitionRef,
};
use crate::debounce::Debouncer;
use crate::store::{Command, Phonebook, StoreError};
use crate::undo::{Reversible, UndoError, UndoHistory};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

/// Undoable editing session over one phonebook.
///
/// # Example
///
/// ```rust
/// use phonebook_editor::core::StateSpec;
/// use phonebook_editor::editor::Editor;
///
/// let mut editor = Editor::new();
/// let id = editor.add_state(StateSpec::new().name("Fabulous State"));
/// assert_eq!(editor.phonebook().state_count(), 2);
///
/// editor.undo().unwrap();
/// assert!(editor.phonebook().find_state(&id).is_none());
///
/// editor.redo().unwrap();
/// assert_eq!(editor.phonebook().find_state(&id).unwrap().name, "Fabulous State");
/// ```
#[derive(Debug)]
pub struct Editor {
    phonebook: Phonebook,
    history: UndoHistory<Command>,
    pending: Debouncer<PendingEdit>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Editor over an empty phonebook with default settings.
    pub fn new() -> Self {
        EditorBuilder::new().build()
    }

    pub fn builder() -> EditorBuilder {
        EditorBuilder::new()
    }

    /// Read access for queries and serialization.
    pub fn phonebook(&self) -> &Phonebook {
        &self.phonebook
    }

    pub fn history(&self) -> &UndoHistory<Command> {
        &self.history
    }

    pub fn quiet_period(&self) -> Duration {
        self.pending.quiet_period()
    }

    /// Give up the session and keep the phonebook.
    pub fn into_phonebook(self) -> Phonebook {
        self.phonebook
    }

    fn perform(&mut self, command: Command) {
        self.history.perform(command, &mut self.phonebook);
    }

    // States

    pub fn add_state(&mut self, spec: StateSpec) -> StateId {
        self.add_state_with_position(spec, None)
    }

    /// Add a state already placed on the canvas.
    pub fn add_state_at(&mut self, spec: StateSpec, position: Position) -> StateId {
        self.add_state_with_position(spec, Some(position))
    }

    fn add_state_with_position(&mut self, spec: StateSpec, position: Option<Position>) -> StateId {
        let (id, command) = self.phonebook.prepare_add_state(spec, position);
        self.perform(command);
        id
    }

    /// Update the state with `id`. Unknown identities are ignored.
    pub fn update_state(&mut self, id: &StateId, spec: StateSpec) {
        if let Some(command) = self.phonebook.prepare_update_state(id, spec) {
            self.perform(command);
        }
    }

    pub fn remove_state(&mut self, id: &StateId) -> Result<(), StoreError> {
        let command = self.phonebook.prepare_remove_state(id)?;
        self.perform(command);
        Ok(())
    }

    /// Move the state with `id` on the canvas. Unknown identities are ignored.
    pub fn move_state(&mut self, id: &StateId, position: Position) {
        if let Some(command) = self.phonebook.prepare_move_state(id, position) {
            self.perform(command);
        }
    }

    pub fn focus_state(&mut self, id: Option<&StateId>) {
        let command = self.phonebook.prepare_focus_state(id);
        self.perform(command);
    }

    pub fn set_initial_state(&mut self, id: Option<&StateId>) {
        let command = self.phonebook.prepare_set_initial_state(id);
        self.perform(command);
    }

    // Transitions

    pub fn add_transition(
        &mut self,
        from: &StateId,
        config: TransitionConfig,
    ) -> Result<(), StoreError> {
        let command = self.phonebook.prepare_add_transition(from, config)?;
        self.perform(command);
        Ok(())
    }

    /// Remove one entry. Nothing is recorded if there is no such entry.
    pub fn remove_transition(
        &mut self,
        from: &StateId,
        key: TransitionRef,
    ) -> Result<(), StoreError> {
        if let Some(command) = self.phonebook.prepare_remove_transition(from, key)? {
            self.perform(command);
        }
        Ok(())
    }

    // Sounds

    pub fn add_sound(&mut self, fields: &Value) -> SoundId {
        let (id, command) = self.phonebook.prepare_add_sound(fields);
        self.perform(command);
        id
    }

    /// Update the sound with `id`. Unknown identities are ignored.
    pub fn update_sound(&mut self, id: &SoundId, fields: &Value) {
        if let Some(command) = self.phonebook.prepare_update_sound(id, fields) {
            self.perform(command);
        }
    }

    // Metadata

    pub fn update_info(&mut self, spec: &InfoSpec) {
        let command = self.phonebook.prepare_update_info(spec);
        self.perform(command);
    }

    /// Count one more outside observation of the phonebook, e.g. a save.
    ///
    /// Applied directly to the store and never recorded, so undo cannot take
    /// it back. Returns the new iteration.
    pub fn bump_iteration(&mut self) -> u64 {
        let iteration = self.phonebook.info().iteration.saturating_add(1);
        let command = self
            .phonebook
            .prepare_update_info(&InfoSpec::new().iteration(iteration));
        self.phonebook.apply(command.forward());
        debug!(iteration, "Bumped phonebook iteration");
        iteration
    }

    // History

    /// Revert the last command and return its label.
    pub fn undo(&mut self) -> Result<String, UndoError> {
        self.history
            .undo(&mut self.phonebook)
            .map(|command| command.label().to_string())
    }

    /// Re-apply the last undone command and return its label.
    pub fn redo(&mut self) -> Result<String, UndoError> {
        self.history
            .redo(&mut self.phonebook)
            .map(|command| command.label().to_string())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.history.undo_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.history.redo_label()
    }

    // Provisional edits

    /// Provisionally update a state, e.g. while its name is being typed.
    ///
    /// The update is committed as one undoable command once no other
    /// provisional edit arrives within the quiet period. It is resolved
    /// against the phonebook at that moment. Returns the edit this request
    /// cancelled, if any.
    pub fn continue_update_state(&mut self, id: &StateId, spec: StateSpec) -> Option<PendingEdit> {
        self.continue_update_state_at(id, spec, Instant::now())
    }

    pub fn continue_update_state_at(
        &mut self,
        id: &StateId,
        spec: StateSpec,
        now: Instant,
    ) -> Option<PendingEdit> {
        self.schedule(PendingEdit::State { id: id.clone(), spec }, now)
    }

    pub fn continue_update_sound(&mut self, id: &SoundId, fields: &Value) -> Option<PendingEdit> {
        self.continue_update_sound_at(id, fields, Instant::now())
    }

    pub fn continue_update_sound_at(
        &mut self,
        id: &SoundId,
        fields: &Value,
        now: Instant,
    ) -> Option<PendingEdit> {
        let edit = PendingEdit::Sound {
            id: id.clone(),
            fields: fields.clone(),
        };
        self.schedule(edit, now)
    }

    pub fn continue_update_info(&mut self, spec: &InfoSpec) -> Option<PendingEdit> {
        self.continue_update_info_at(spec, Instant::now())
    }

    pub fn continue_update_info_at(&mut self, spec: &InfoSpec, now: Instant) -> Option<PendingEdit> {
        self.schedule(PendingEdit::Info(spec.clone()), now)
    }

    /// A request that resolves to nothing still cancels the pending one.
    fn schedule(&mut self, edit: PendingEdit, now: Instant) -> Option<PendingEdit> {
        if edit.resolve(&self.phonebook).is_some() {
            self.pending.request(edit, now)
        } else {
            self.pending.cancel()
        }
    }

    fn commit(&mut self, edit: PendingEdit) -> bool {
        match edit.resolve(&self.phonebook) {
            Some(command) => {
                self.perform(command);
                true
            }
            None => {
                debug!(?edit, "Dropped provisional edit whose target is gone");
                false
            }
        }
    }

    /// Commit the pending provisional edit if its quiet period has passed.
    ///
    /// Meant to be called from the host's event loop. Returns whether a
    /// command was committed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        match self.pending.poll(now) {
            Some(edit) => self.commit(edit),
            None => false,
        }
    }

    /// Commit the pending provisional edit right away, e.g. before saving.
    pub fn flush_pending(&mut self) -> bool {
        match self.pending.cancel() {
            Some(edit) => self.commit(edit),
            None => false,
        }
    }

    /// Drop the pending provisional edit without committing it.
    pub fn cancel_pending(&mut self) -> Option<PendingEdit> {
        self.pending.cancel()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// When the pending provisional edit becomes due.
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn every_action_is_undoable() {
        let mut editor = Editor::new();
        let a = editor.add_state(StateSpec::new().name("A"));
        let b = editor.add_state(StateSpec::new().name("B"));
        editor.update_state(&a, StateSpec::new().ring(0.5));
        editor.move_state(&a, Position::new(1.0, 2.0));
        editor.focus_state(Some(&a));
        editor.set_initial_state(Some(&a));
        editor
            .add_transition(&a, TransitionConfig::Timeout { after: 3.0, to: b.clone() })
            .unwrap();
        editor.remove_transition(&a, TransitionRef::Timeout).unwrap();
        let sound = editor.add_sound(&json!({ "name": "Beep" }));
        editor.update_sound(&sound, &json!({ "volume": 0.5 }));
        editor.update_info(&InfoSpec::new().title("Title"));
        editor.remove_state(&b).unwrap();

        assert_eq!(editor.history().len(), 12);
        while editor.can_undo() {
            editor.undo().unwrap();
        }
        assert_eq!(editor.phonebook(), &Phonebook::new());
    }

    #[test]
    fn lenient_actions_on_unknown_ids_record_nothing() {
        let mut editor = Editor::new();
        let ghost = StateId::from("ghost");
        editor.update_state(&ghost, StateSpec::new().name("x"));
        editor.move_state(&ghost, Position::new(0.0, 0.0));
        editor.update_sound(&SoundId::from("ghost"), &json!({}));

        assert!(editor.history().is_empty());
        assert_eq!(editor.undo(), Err(UndoError::NothingToUndo));
    }

    #[test]
    fn rejected_actions_record_nothing() {
        let mut editor = Editor::new();
        assert!(editor.remove_state(&StateId::any()).is_err());
        assert!(editor.remove_state(&StateId::from("ghost")).is_err());
        assert!(editor
            .add_transition(&StateId::from("ghost"), TransitionConfig::PickUp { to: StateId::any() })
            .is_err());
        assert!(editor.history().is_empty());
    }

    #[test]
    fn undo_and_redo_report_labels() {
        let mut editor = Editor::new();
        editor.add_state(StateSpec::new());
        assert_eq!(editor.undo_label(), Some("Add State"));
        assert_eq!(editor.undo().unwrap(), "Add State");
        assert_eq!(editor.redo_label(), Some("Add State"));
        assert_eq!(editor.redo().unwrap(), "Add State");
        assert_eq!(editor.redo(), Err(UndoError::NothingToRedo));
    }

    #[test]
    fn bump_iteration_is_not_undoable() {
        let mut editor = Editor::new();
        editor.update_info(&InfoSpec::new().title("Before"));
        assert_eq!(editor.bump_iteration(), 1);
        assert_eq!(editor.bump_iteration(), 2);

        editor.undo().unwrap();

        assert_eq!(editor.phonebook().info().iteration, 2);
        assert_eq!(editor.phonebook().info().title, "");
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn provisional_updates_coalesce_into_one_command() {
        let start = Instant::now();
        let mut editor = Editor::new();
        let id = editor.add_state(StateSpec::new().name("S"));

        for (i, name) in ["S", "St", "Sta", "Stat", "State"].iter().enumerate() {
            editor.continue_update_state_at(&id, StateSpec::new().name(*name), start + ms(i as u64 * 20));
        }
        assert_eq!(editor.phonebook().find_state(&id).unwrap().name, "S");
        assert!(!editor.tick_at(start + ms(150)));
        assert!(editor.tick_at(start + ms(180)));

        assert_eq!(editor.phonebook().find_state(&id).unwrap().name, "State");
        assert_eq!(editor.history().len(), 2);

        editor.undo().unwrap();
        assert_eq!(editor.phonebook().find_state(&id).unwrap().name, "S");
    }

    #[test]
    fn unrelated_provisional_request_replaces_pending_one() {
        let start = Instant::now();
        let mut editor = Editor::new();
        let id = editor.add_state(StateSpec::new().name("S"));

        assert!(editor
            .continue_update_state_at(&id, StateSpec::new().name("Renamed"), start)
            .is_none());
        let cancelled = editor.continue_update_info_at(&InfoSpec::new().title("T"), start + ms(10));

        assert!(matches!(cancelled, Some(PendingEdit::State { .. })));
        assert!(editor.tick_at(start + ms(500)));
        assert_eq!(editor.phonebook().find_state(&id).unwrap().name, "S");
        assert_eq!(editor.phonebook().info().title, "T");
    }

    #[test]
    fn cancelled_request_never_mutates() {
        let start = Instant::now();
        let mut editor = Editor::new();
        let id = editor.add_state(StateSpec::new().name("S"));
        editor.continue_update_state_at(&id, StateSpec::new().name("X"), start);

        assert!(editor.cancel_pending().is_some());
        assert!(!editor.tick_at(start + ms(1000)));
        assert_eq!(editor.phonebook().find_state(&id).unwrap().name, "S");
    }

    #[test]
    fn flush_commits_immediately() {
        let mut editor = Editor::new();
        let sound = editor.add_sound(&json!({ "name": "Beep" }));
        editor.continue_update_sound(&sound, &json!({ "name": "Boop" }));

        assert!(editor.has_pending());
        assert!(editor.flush_pending());
        assert!(!editor.has_pending());
        assert_eq!(editor.phonebook().find_sound(&sound).unwrap().name, "Boop");
        assert!(!editor.flush_pending());
    }

    #[test]
    fn provisional_sound_edit_does_not_resurrect_undone_sound() {
        let start = Instant::now();
        let mut editor = Editor::new();
        let sound = editor.add_sound(&json!({ "name": "Beep" }));
        editor.continue_update_sound_at(&sound, &json!({ "name": "Boop" }), start);

        editor.undo().unwrap();
        assert!(editor.phonebook().find_sound(&sound).is_none());

        assert!(!editor.tick_at(start + ms(200)));
        assert!(editor.phonebook().find_sound(&sound).is_none());
        assert!(!editor.can_undo());
    }

    #[test]
    fn provisional_info_edit_keeps_later_updates() {
        let start = Instant::now();
        let mut editor = Editor::new();
        editor.continue_update_info_at(&InfoSpec::new().description("D"), start);
        editor.update_info(&InfoSpec::new().title("T"));

        assert!(editor.tick_at(start + ms(200)));
        assert_eq!(editor.phonebook().info().title, "T");
        assert_eq!(editor.phonebook().info().description, "D");

        editor.undo().unwrap();
        assert_eq!(editor.phonebook().info().title, "T");
        assert_eq!(editor.phonebook().info().description, "");
    }

    #[test]
    fn bump_iteration_saturates() {
        let mut phonebook = Phonebook::new();
        phonebook.update_info(&InfoSpec::new().iteration(u64::MAX));
        let mut editor = Editor::builder().phonebook(phonebook).build();

        assert_eq!(editor.bump_iteration(), u64::MAX);
        assert_eq!(editor.phonebook().info().iteration, u64::MAX);
    }

    #[test]
    fn committing_provisional_edit_discards_redo_branch() {
        let start = Instant::now();
        let mut editor = Editor::new();
        let id = editor.add_state(StateSpec::new().name("S"));
        editor.add_state(StateSpec::new().name("T"));
        editor.undo().unwrap();

        editor.continue_update_state_at(&id, StateSpec::new().name("U"), start);
        editor.tick_at(start + ms(100));

        assert!(!editor.can_redo());
    }
}
