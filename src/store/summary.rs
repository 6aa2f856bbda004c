//! Flat, display-oriented descriptions of transitions.
//!
//! Summaries are derived on demand from the per-source transition sets. They
//! serve the editor's transition lists and the store's discovery of inbound
//! transitions when a state is removed.

use super::Phonebook;
use crate::core::{StateId, TransitionConfig, TransitionKind, TransitionRef, TransitionSet};
use serde::Serialize;

/// One transition, described from the point of view of a reader.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionSummary {
    #[serde(rename = "type")]
    pub kind: TransitionKind,
    /// Dialed number, for dial transitions only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num: Option<String>,
    pub when: String,
    pub from: StateId,
    pub to: StateId,
    pub from_name: String,
    pub to_name: String,
}

impl TransitionSummary {
    /// Address of the summarized entry inside the source's transition set.
    pub fn key(&self) -> TransitionRef {
        match (self.kind, &self.num) {
            (TransitionKind::Dial, Some(num)) => TransitionRef::Dial { num: num.clone() },
            (TransitionKind::Dial, None) => TransitionRef::Dial { num: String::new() },
            (TransitionKind::HangUp, _) => TransitionRef::HangUp,
            (TransitionKind::PickUp, _) => TransitionRef::PickUp,
            (TransitionKind::Timeout, _) => TransitionRef::Timeout,
        }
    }
}

/// Summarize every entry of `set`, naming states through `name_of`.
///
/// Entries come ordered by kind, dial entries by number.
pub fn summarize<'a>(
    from: &StateId,
    set: &TransitionSet,
    name_of: impl Fn(&StateId) -> Option<&'a str>,
) -> Vec<TransitionSummary> {
    let from_name = display_name(from, &name_of);
    set.entries()
        .into_iter()
        .map(|config| {
            let num = match &config {
                TransitionConfig::Dial { num, .. } => Some(num.clone()),
                _ => None,
            };
            let to = config.target().clone();
            TransitionSummary {
                kind: config.kind(),
                num,
                when: config.when(),
                to_name: display_name(&to, &name_of),
                from_name: from_name.clone(),
                from: from.clone(),
                to,
            }
        })
        .collect()
}

/// State name, or the bare identity for states that do not resolve.
fn display_name<'a>(id: &StateId, name_of: &impl Fn(&StateId) -> Option<&'a str>) -> String {
    name_of(id).unwrap_or(id.as_str()).to_string()
}

impl Phonebook {
    /// Outgoing transitions of the state with `id`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use phonebook_editor::core::{StateSpec, TransitionConfig};
    /// use phonebook_editor::store::Phonebook;
    ///
    /// let mut book = Phonebook::new();
    /// let s1 = book.add_state(StateSpec::new().name("One"));
    /// let s2 = book.add_state(StateSpec::new().name("Two"));
    /// book.add_transition(&s1, TransitionConfig::Timeout { after: 60.0, to: s2 }).unwrap();
    ///
    /// let summaries = book.transition_summaries_from(&s1);
    /// assert_eq!(summaries[0].when, "Timeout (60s)");
    /// assert_eq!(summaries[0].to_name, "Two");
    /// ```
    pub fn transition_summaries_from(&self, id: &StateId) -> Vec<TransitionSummary> {
        match self.transitions().get(id) {
            Some(set) => summarize(id, set, |id| self.find_state(id).map(|s| s.name.as_str())),
            None => Vec::new(),
        }
    }

    /// Transitions of every other source, `any` included, that target `id`.
    pub fn transition_summaries_to(&self, id: &StateId) -> Vec<TransitionSummary> {
        self.transitions()
            .keys()
            .filter(|source| *source != id)
            .flat_map(|source| self.transition_summaries_from(source))
            .filter(|summary| summary.to == *id)
            .collect()
    }
}
