//! The entity store of a phonebook.
//!
//! [`Phonebook`] owns states, sounds, transitions, metadata and the editor
//! extension, and keeps them referentially consistent. It knows nothing about
//! history: every mutation is first *prepared* into a [`Command`] whose
//! payloads are computed from the current contents, and then *applied* as a
//! single atomic [`Effect`].
//!
//! # Example
//!
//! ```rust
//! use phonebook_editor::core::{StateSpec, TransitionConfig};
//! use phonebook_editor::store::Phonebook;
//!
//! let mut book = Phonebook::new();
//! let ring = book.add_state(StateSpec::new().name("Ring"));
//! let talk = book.add_state(StateSpec::new().name("Talk"));
//! book.add_transition(&ring, TransitionConfig::PickUp { to: talk.clone() }).unwrap();
//!
//! book.remove_state(&talk).unwrap();
//! assert!(book.transition_summaries_from(&ring).is_empty());
//! ```

mod effect;
mod error;
mod summary;

pub use effect::{Command, Effect, StateEntry};
pub use error::{EntityKind, StoreError};
pub use summary::TransitionSummary;

use crate::core::{
    EditorExtension, Info, InfoSpec, Network, Position, Sound, SoundId, State, StateExtension,
    StateId, StateSpec, TransitionConfig, TransitionRef, TransitionSet,
};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Reason reported by [`Phonebook::export_blockers`] when no initial state is set.
pub const MISSING_INITIAL_STATE: &str = "Some state must be marked as the initial state";

/// In-memory model of a phonebook document.
#[derive(Clone, Debug, PartialEq)]
pub struct Phonebook {
    info: Info,
    initial: Option<StateId>,
    states: BTreeMap<StateId, State>,
    transitions: BTreeMap<StateId, TransitionSet>,
    sounds: BTreeMap<SoundId, Sound>,
    vendor: EditorExtension,
}

impl Default for Phonebook {
    fn default() -> Self {
        Self::new()
    }
}

impl Phonebook {
    /// Create an empty phonebook holding only the `any` state.
    pub fn new() -> Self {
        let mut book = Self {
            info: Info::default(),
            initial: None,
            states: BTreeMap::new(),
            transitions: BTreeMap::new(),
            sounds: BTreeMap::new(),
            vendor: EditorExtension::default(),
        };
        book.ensure_any_state();
        book
    }

    /// Assemble a phonebook from already validated parts.
    ///
    /// Fills in the `any` state and the per-state entries the store relies
    /// on, clamps state fields, sanitizes sounds and drops editor properties
    /// of states that do not exist.
    pub(crate) fn from_parts(
        info: Info,
        initial: Option<StateId>,
        states: BTreeMap<StateId, State>,
        transitions: BTreeMap<StateId, TransitionSet>,
        sounds: BTreeMap<SoundId, Sound>,
        vendor: EditorExtension,
    ) -> Self {
        let mut book = Self {
            info,
            initial,
            states,
            transitions,
            sounds,
            vendor,
        };
        book.ensure_any_state();
        for (id, state) in book.states.iter_mut() {
            state.id = id.clone();
            state.normalize();
        }
        for sound in book.sounds.values_mut() {
            *sound = sound.sanitized();
        }
        let Self { states, vendor, .. } = &mut book;
        vendor
            .extension_properties
            .states
            .retain(|id, _| states.contains_key(id));
        let ids: Vec<StateId> = book.states.keys().cloned().collect();
        for id in ids {
            book.transitions.entry(id.clone()).or_default();
            book.vendor
                .extension_properties
                .states
                .entry(id)
                .or_default();
        }
        book
    }

    fn ensure_any_state(&mut self) {
        let any = StateId::any();
        self.states.entry(any.clone()).or_insert_with(State::any);
        self.transitions.entry(any.clone()).or_default();
        self.vendor
            .extension_properties
            .states
            .entry(any)
            .or_default();
    }

    // Queries

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn initial(&self) -> Option<&StateId> {
        self.initial.as_ref()
    }

    pub fn vendor(&self) -> &EditorExtension {
        &self.vendor
    }

    pub fn focused_state_id(&self) -> Option<&StateId> {
        self.vendor.focused_state_id.as_ref()
    }

    /// All states including `any`, ordered by identity.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn find_state(&self, id: &StateId) -> Option<&State> {
        self.states.get(id)
    }

    /// First state carrying exactly `name`.
    pub fn state_named(&self, name: &str) -> Option<&State> {
        self.states.values().find(|state| state.name == name)
    }

    pub fn is_initial(&self, id: &StateId) -> bool {
        self.initial.as_ref() == Some(id)
    }

    pub fn is_focused(&self, id: &StateId) -> bool {
        self.vendor.focused_state_id.as_ref() == Some(id)
    }

    pub fn focused_state(&self) -> Option<&State> {
        self.focused_state_id().and_then(|id| self.find_state(id))
    }

    pub fn focused_state_name(&self) -> Option<&str> {
        self.focused_state().map(|state| state.name.as_str())
    }

    /// Canvas properties of the state with `id`.
    pub fn find_network(&self, id: &StateId) -> Option<&Network> {
        self.extension(id).map(|ext| &ext.network)
    }

    pub fn extension(&self, id: &StateId) -> Option<&StateExtension> {
        self.vendor.extension_properties.states.get(id)
    }

    pub fn transitions(&self) -> &BTreeMap<StateId, TransitionSet> {
        &self.transitions
    }

    pub fn transitions_of(&self, id: &StateId) -> Option<&TransitionSet> {
        self.transitions.get(id)
    }

    pub fn sounds(&self) -> impl Iterator<Item = (&SoundId, &Sound)> {
        self.sounds.iter()
    }

    pub fn find_sound(&self, id: &SoundId) -> Option<&Sound> {
        self.sounds.get(id)
    }

    /// Reasons why the phonebook cannot be handed to a player yet.
    pub fn export_blockers(&self) -> Vec<String> {
        let mut blockers = Vec::new();
        if self.initial.is_none() {
            blockers.push(MISSING_INITIAL_STATE.to_string());
        }
        blockers
    }

    // Preparing commands

    /// Allocate a fresh identity and prepare its creation from `spec`.
    pub fn prepare_add_state(
        &self,
        spec: StateSpec,
        position: Option<Position>,
    ) -> (StateId, Command) {
        let id = StateId::generate();
        let entry = StateEntry::fresh(State::from_spec(id.clone(), spec), position);
        let command = Command::new(
            "Add State",
            Effect::PutState {
                id: id.clone(),
                entry: Some(Box::new(entry)),
            },
            Effect::PutState {
                id: id.clone(),
                entry: None,
            },
        );
        (id, command)
    }

    /// `None` when `id` is unknown or there is nothing to update.
    pub fn prepare_update_state(&self, id: &StateId, spec: StateSpec) -> Option<Command> {
        let state = self.states.get(id)?;
        if spec.is_empty() {
            return None;
        }
        let backward = state.snapshot(&spec);
        Some(Command::new(
            "Update State",
            Effect::UpdateState {
                id: id.clone(),
                spec,
            },
            Effect::UpdateState {
                id: id.clone(),
                spec: backward,
            },
        ))
    }

    pub fn prepare_remove_state(&self, id: &StateId) -> Result<Command, StoreError> {
        let state = self
            .states
            .get(id)
            .ok_or_else(|| StoreError::unknown_state(id))?;
        if id.is_any() {
            return Err(StoreError::ProtectedEntity { id: id.clone() });
        }

        let inbound = self
            .transition_summaries_to(id)
            .into_iter()
            .filter_map(|summary| {
                let config = self.transitions.get(&summary.from)?.get(&summary.key())?;
                Some((summary.from, config))
            })
            .collect();
        let entry = StateEntry {
            state: state.clone(),
            transitions: self.transitions.get(id).cloned().unwrap_or_default(),
            extension: self.extension(id).cloned().unwrap_or_default(),
            inbound,
            initial: self.is_initial(id),
            focused: self.is_focused(id),
        };

        Ok(Command::new(
            "Remove State",
            Effect::PutState {
                id: id.clone(),
                entry: None,
            },
            Effect::PutState {
                id: id.clone(),
                entry: Some(Box::new(entry)),
            },
        ))
    }

    /// `None` when `id` is unknown.
    pub fn prepare_move_state(&self, id: &StateId, position: Position) -> Option<Command> {
        let previous = self.find_network(id)?.position;
        Some(Command::new(
            "Move State",
            Effect::MoveState {
                id: id.clone(),
                position: Some(position),
            },
            Effect::MoveState {
                id: id.clone(),
                position: previous,
            },
        ))
    }

    /// Focus the state with `id`, or clear the focus if it does not resolve.
    pub fn prepare_focus_state(&self, id: Option<&StateId>) -> Command {
        Command::new(
            "Focus State",
            Effect::FocusState(self.resolve(id)),
            Effect::FocusState(self.vendor.focused_state_id.clone()),
        )
    }

    /// Mark the state with `id` as initial, or clear it if it does not resolve.
    pub fn prepare_set_initial_state(&self, id: Option<&StateId>) -> Command {
        Command::new(
            "Set Initial State",
            Effect::SetInitialState(self.resolve(id)),
            Effect::SetInitialState(self.initial.clone()),
        )
    }

    pub fn prepare_add_transition(
        &self,
        from: &StateId,
        config: TransitionConfig,
    ) -> Result<Command, StoreError> {
        if !self.states.contains_key(from) {
            return Err(StoreError::unknown_state(from));
        }
        let kind = config.kind();
        config
            .validate()
            .map_err(|reason| StoreError::InvalidTransition { kind, reason })?;
        let target = config.target();
        if target.is_any() {
            return Err(StoreError::InvalidTransition {
                kind,
                reason: "the any state cannot be a transition target".to_string(),
            });
        }
        if !self.states.contains_key(target) {
            return Err(StoreError::unknown_state(target));
        }

        let key = config.key();
        let previous = self.transitions.get(from).and_then(|set| set.get(&key));
        Ok(Command::new(
            "Add Transition",
            Effect::SetTransition {
                from: from.clone(),
                key: key.clone(),
                config: Some(config),
            },
            Effect::SetTransition {
                from: from.clone(),
                key,
                config: previous,
            },
        ))
    }

    /// `Ok(None)` when `from` has no entry at `key`.
    pub fn prepare_remove_transition(
        &self,
        from: &StateId,
        key: TransitionRef,
    ) -> Result<Option<Command>, StoreError> {
        if !self.states.contains_key(from) {
            return Err(StoreError::unknown_state(from));
        }
        let Some(previous) = self.transitions.get(from).and_then(|set| set.get(&key)) else {
            return Ok(None);
        };
        Ok(Some(Command::new(
            "Remove Transition",
            Effect::SetTransition {
                from: from.clone(),
                key: key.clone(),
                config: None,
            },
            Effect::SetTransition {
                from: from.clone(),
                key,
                config: Some(previous),
            },
        )))
    }

    /// Allocate a fresh sound identity and prepare its creation from loosely
    /// typed `fields`.
    pub fn prepare_add_sound(&self, fields: &Value) -> (SoundId, Command) {
        let id = SoundId::generate();
        let command = Command::new(
            "Add Sound",
            Effect::PutSound {
                id: id.clone(),
                sound: Some(Sound::from_fields(fields)),
            },
            Effect::PutSound {
                id: id.clone(),
                sound: None,
            },
        );
        (id, command)
    }

    /// `None` when `id` is unknown.
    pub fn prepare_update_sound(&self, id: &SoundId, fields: &Value) -> Option<Command> {
        let sound = self.sounds.get(id)?;
        Some(Command::new(
            "Update Sound",
            Effect::PutSound {
                id: id.clone(),
                sound: Some(sound.merged(fields)),
            },
            Effect::PutSound {
                id: id.clone(),
                sound: Some(sound.clone()),
            },
        ))
    }

    pub fn prepare_update_info(&self, spec: &InfoSpec) -> Command {
        Command::new(
            "Update Phonebook Metadata",
            Effect::SetInfo(self.info.merged(spec)),
            Effect::SetInfo(self.info.clone()),
        )
    }

    fn resolve(&self, id: Option<&StateId>) -> Option<StateId> {
        id.filter(|id| self.states.contains_key(*id)).cloned()
    }

    // Applying effects

    /// Apply one effect atomically.
    ///
    /// Effects are lenient: identities that no longer resolve are skipped, so
    /// applying an effect never fails.
    pub fn apply(&mut self, effect: &Effect) {
        debug!(effect = effect.name(), "Applying effect");
        match effect {
            Effect::PutState {
                id,
                entry: Some(entry),
            } => self.insert_state(id, entry),
            Effect::PutState { id, entry: None } => self.purge_state(id),
            Effect::UpdateState { id, spec } => {
                if let Some(state) = self.states.get_mut(id) {
                    state.merge(spec.clone());
                }
            }
            Effect::MoveState { id, position } => {
                if let Some(ext) = self.vendor.extension_properties.states.get_mut(id) {
                    ext.network.position = *position;
                }
            }
            Effect::FocusState(id) => {
                self.vendor.focused_state_id = self.resolve(id.as_ref());
            }
            Effect::SetInitialState(id) => {
                self.initial = self.resolve(id.as_ref());
            }
            Effect::SetTransition { from, key, config } => {
                if let Some(set) = self.transitions.get_mut(from) {
                    match config {
                        Some(config) => {
                            set.insert(config.clone());
                        }
                        None => {
                            set.remove(key);
                        }
                    }
                }
            }
            Effect::PutSound { id, sound } => match sound {
                Some(sound) => {
                    self.sounds.insert(id.clone(), sound.clone());
                }
                None => {
                    self.sounds.remove(id);
                }
            },
            Effect::SetInfo(info) => {
                self.info = Info {
                    iteration: info.iteration.max(self.info.iteration),
                    ..info.clone()
                };
            }
        }
    }

    fn insert_state(&mut self, id: &StateId, entry: &StateEntry) {
        let mut state = entry.state.clone();
        state.id = id.clone();
        self.states.insert(id.clone(), state);
        self.transitions
            .insert(id.clone(), entry.transitions.clone());
        self.vendor
            .extension_properties
            .states
            .insert(id.clone(), entry.extension.clone());
        for (from, config) in &entry.inbound {
            if let Some(set) = self.transitions.get_mut(from) {
                set.insert(config.clone());
            }
        }
        if entry.initial {
            self.initial = Some(id.clone());
        }
        if entry.focused {
            self.vendor.focused_state_id = Some(id.clone());
        }
    }

    /// Remove a state together with everything referring to it.
    fn purge_state(&mut self, id: &StateId) {
        if id.is_any() || !self.states.contains_key(id) {
            return;
        }
        let inbound = self.transition_summaries_to(id);
        self.transitions.remove(id);
        for summary in &inbound {
            if let Some(set) = self.transitions.get_mut(&summary.from) {
                set.remove(&summary.key());
            }
        }
        if self.is_focused(id) {
            self.vendor.focused_state_id = None;
        }
        if self.is_initial(id) {
            self.initial = None;
        }
        self.vendor.extension_properties.states.remove(id);
        self.states.remove(id);
        debug!(state = %id, inbound = inbound.len(), "Removed state");
    }
}

/// Direct mutations that bypass any history.
///
/// Each one prepares the matching command and applies its forward effect.
impl Phonebook {
    pub fn add_state(&mut self, spec: StateSpec) -> StateId {
        let (id, command) = self.prepare_add_state(spec, None);
        self.apply(command.forward());
        id
    }

    pub fn update_state(&mut self, id: &StateId, spec: StateSpec) {
        if let Some(command) = self.prepare_update_state(id, spec) {
            self.apply(command.forward());
        }
    }

    pub fn remove_state(&mut self, id: &StateId) -> Result<(), StoreError> {
        let command = self.prepare_remove_state(id)?;
        self.apply(command.forward());
        Ok(())
    }

    pub fn move_state(&mut self, id: &StateId, position: Position) {
        if let Some(command) = self.prepare_move_state(id, position) {
            self.apply(command.forward());
        }
    }

    pub fn focus_state(&mut self, id: Option<&StateId>) {
        let command = self.prepare_focus_state(id);
        self.apply(command.forward());
    }

    pub fn set_initial_state(&mut self, id: Option<&StateId>) {
        let command = self.prepare_set_initial_state(id);
        self.apply(command.forward());
    }

    pub fn add_transition(
        &mut self,
        from: &StateId,
        config: TransitionConfig,
    ) -> Result<(), StoreError> {
        let command = self.prepare_add_transition(from, config)?;
        self.apply(command.forward());
        Ok(())
    }

    pub fn remove_transition(
        &mut self,
        from: &StateId,
        key: TransitionRef,
    ) -> Result<(), StoreError> {
        if let Some(command) = self.prepare_remove_transition(from, key)? {
            self.apply(command.forward());
        }
        Ok(())
    }

    pub fn add_sound(&mut self, fields: &Value) -> SoundId {
        let (id, command) = self.prepare_add_sound(fields);
        self.apply(command.forward());
        id
    }

    pub fn update_sound(&mut self, id: &SoundId, fields: &Value) {
        if let Some(command) = self.prepare_update_sound(id, fields) {
            self.apply(command.forward());
        }
    }

    pub fn update_info(&mut self, spec: &InfoSpec) {
        let command = self.prepare_update_info(spec);
        self.apply(command.forward());
    }
}
