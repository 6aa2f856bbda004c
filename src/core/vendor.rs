//! Editor-only extensions layered alongside the core document.
//!
//! Focus and canvas positions live here so that players interpreting the
//! phonebook can ignore them.

use super::ids::StateId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Format version of the editor extension.
pub const EXTENSION_VERSION: u32 = 1;

/// Point on the editor canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    /// Unset until the state is placed on the canvas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Editor properties of one state. Exists exactly as long as its state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateExtension {
    #[serde(default)]
    pub removed: bool,
    #[serde(default)]
    pub network: Network,
}

impl StateExtension {
    pub fn at(position: Position) -> Self {
        Self {
            removed: false,
            network: Network {
                position: Some(position),
            },
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionProperties {
    #[serde(default)]
    pub states: BTreeMap<StateId, StateExtension>,
}

/// The `fernspieleditor` vendor block of the document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorExtension {
    pub version: u32,
    #[serde(default)]
    pub focused_state_id: Option<StateId>,
    #[serde(default)]
    pub extension_properties: ExtensionProperties,
}

impl Default for EditorExtension {
    fn default() -> Self {
        Self {
            version: EXTENSION_VERSION,
            focused_state_id: None,
            extension_properties: ExtensionProperties::default(),
        }
    }
}
