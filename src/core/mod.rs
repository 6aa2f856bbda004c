//! Entity value types of a phonebook.
//!
//! This module contains plain data only:
//! - Identities of states and sounds
//! - States, sounds and their partial update specs
//! - Typed transitions and their per-source sets
//! - Document metadata and the editor's vendor extension
//!
//! Nothing here knows about the store or the undo history.

mod ids;
mod info;
mod sound;
mod state;
mod transition;
mod vendor;

pub use ids::{SoundId, StateId, ANY_STATE_ID};
pub use info::{Info, InfoSpec};
pub use sound::{sanitize_sound, Sound, SoundFile};
pub use state::{State, StateSpec, ANY_STATE_NAME};
pub use transition::{Timeout, TransitionConfig, TransitionKind, TransitionRef, TransitionSet};
pub use vendor::{
    EditorExtension, ExtensionProperties, Network, Position, StateExtension, EXTENSION_VERSION,
};
