//! Typed transitions between states.
//!
//! Each source state owns one [`TransitionSet`] holding at most one entry per
//! trigger kind. Dial entries are keyed by the dialed number, so a state can
//! react to several numbers.

use super::ids::StateId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Trigger kind of a transition.
///
/// Variants are ordered by their document name, which is the order summaries
/// list them in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Dial,
    HangUp,
    PickUp,
    Timeout,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dial => "dial",
            Self::HangUp => "hang_up",
            Self::PickUp => "pick_up",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration of a timeout transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timeout {
    /// Seconds spent in the source state before the transition fires.
    pub after: f64,
    pub to: StateId,
}

/// One transition entry, addressed by kind and, for dial, by number.
///
/// # Example
///
/// ```rust
/// use phonebook_editor::core::{StateId, TransitionConfig};
///
/// let dial = TransitionConfig::Dial { num: "5".into(), to: StateId::from("s2") };
/// assert_eq!(dial.when(), "Dial 5");
/// assert!(dial.validate().is_ok());
///
/// let timeout = TransitionConfig::Timeout { after: 1.5, to: StateId::from("s2") };
/// assert_eq!(timeout.when(), "Timeout (1.5s)");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionConfig {
    Timeout { after: f64, to: StateId },
    Dial { num: String, to: StateId },
    PickUp { to: StateId },
    HangUp { to: StateId },
}

impl TransitionConfig {
    pub fn kind(&self) -> TransitionKind {
        match self {
            Self::Timeout { .. } => TransitionKind::Timeout,
            Self::Dial { .. } => TransitionKind::Dial,
            Self::PickUp { .. } => TransitionKind::PickUp,
            Self::HangUp { .. } => TransitionKind::HangUp,
        }
    }

    pub fn target(&self) -> &StateId {
        match self {
            Self::Timeout { to, .. }
            | Self::Dial { to, .. }
            | Self::PickUp { to }
            | Self::HangUp { to } => to,
        }
    }

    /// Slot this entry occupies in a [`TransitionSet`].
    pub fn key(&self) -> TransitionRef {
        match self {
            Self::Timeout { .. } => TransitionRef::Timeout,
            Self::Dial { num, .. } => TransitionRef::Dial { num: num.clone() },
            Self::PickUp { .. } => TransitionRef::PickUp,
            Self::HangUp { .. } => TransitionRef::HangUp,
        }
    }

    /// Display label of the trigger.
    pub fn when(&self) -> String {
        match self {
            Self::Timeout { after, .. } => format!("Timeout ({after}s)"),
            Self::Dial { num, .. } => format!("Dial {num}"),
            Self::PickUp { .. } => "Pick up".to_string(),
            Self::HangUp { .. } => "Hang up".to_string(),
        }
    }

    /// Check the parameters of the entry, independent of any store.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Timeout { after, .. } if !after.is_finite() || *after < 0.0 => Err(format!(
                "timeout must be a non-negative number of seconds, got {after}"
            )),
            Self::Dial { num, .. } if num.is_empty() => {
                Err("dialed number must not be empty".to_string())
            }
            Self::Dial { num, .. } if !num.chars().all(|c| c.is_ascii_digit()) => {
                Err(format!("dialed number must consist of digits, got {num:?}"))
            }
            _ => Ok(()),
        }
    }
}

/// Address of a single entry in a [`TransitionSet`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionRef {
    Timeout,
    Dial { num: String },
    PickUp,
    HangUp,
}

impl TransitionRef {
    pub fn kind(&self) -> TransitionKind {
        match self {
            Self::Timeout => TransitionKind::Timeout,
            Self::Dial { .. } => TransitionKind::Dial,
            Self::PickUp => TransitionKind::PickUp,
            Self::HangUp => TransitionKind::HangUp,
        }
    }
}

/// All outgoing transitions of one source state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Timeout>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dial: BTreeMap<String, StateId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pick_up: Option<StateId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hang_up: Option<StateId>,
}

impl TransitionSet {
    pub fn is_empty(&self) -> bool {
        self.timeout.is_none()
            && self.dial.is_empty()
            && self.pick_up.is_none()
            && self.hang_up.is_none()
    }

    pub fn get(&self, key: &TransitionRef) -> Option<TransitionConfig> {
        match key {
            TransitionRef::Timeout => self.timeout.as_ref().map(|t| TransitionConfig::Timeout {
                after: t.after,
                to: t.to.clone(),
            }),
            TransitionRef::Dial { num } => self.dial.get(num).map(|to| TransitionConfig::Dial {
                num: num.clone(),
                to: to.clone(),
            }),
            TransitionRef::PickUp => self
                .pick_up
                .clone()
                .map(|to| TransitionConfig::PickUp { to }),
            TransitionRef::HangUp => self
                .hang_up
                .clone()
                .map(|to| TransitionConfig::HangUp { to }),
        }
    }

    /// Put `config` into its slot, replacing what was there.
    ///
    /// Only the slot of the entry is touched, so dial numbers accumulate.
    pub fn insert(&mut self, config: TransitionConfig) -> Option<TransitionConfig> {
        let previous = self.get(&config.key());
        match config {
            TransitionConfig::Timeout { after, to } => self.timeout = Some(Timeout { after, to }),
            TransitionConfig::Dial { num, to } => {
                self.dial.insert(num, to);
            }
            TransitionConfig::PickUp { to } => self.pick_up = Some(to),
            TransitionConfig::HangUp { to } => self.hang_up = Some(to),
        }
        previous
    }

    pub fn remove(&mut self, key: &TransitionRef) -> Option<TransitionConfig> {
        let previous = self.get(key);
        match key {
            TransitionRef::Timeout => self.timeout = None,
            TransitionRef::Dial { num } => {
                self.dial.remove(num);
            }
            TransitionRef::PickUp => self.pick_up = None,
            TransitionRef::HangUp => self.hang_up = None,
        }
        previous
    }

    /// Every entry, ordered by kind and then by dialed number.
    pub fn entries(&self) -> Vec<TransitionConfig> {
        let mut entries: Vec<TransitionConfig> = self
            .dial
            .iter()
            .map(|(num, to)| TransitionConfig::Dial {
                num: num.clone(),
                to: to.clone(),
            })
            .collect();
        entries.extend(self.get(&TransitionRef::HangUp));
        entries.extend(self.get(&TransitionRef::PickUp));
        entries.extend(self.get(&TransitionRef::Timeout));
        entries
    }
}
