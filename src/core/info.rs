//! Document level metadata.

use serde::{Deserialize, Serialize};

/// Title, author and iteration counter of a phonebook.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    /// Bumped whenever the phonebook is observed from the outside, e.g. when
    /// it is saved or deployed. Never decreases.
    #[serde(default)]
    pub iteration: u64,
}

impl Info {
    /// Merge `spec` over this info, keeping the iteration monotonic.
    pub fn merged(&self, spec: &InfoSpec) -> Self {
        Self {
            title: spec.title.clone().unwrap_or_else(|| self.title.clone()),
            author: spec.author.clone().unwrap_or_else(|| self.author.clone()),
            description: spec
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            iteration: spec.iteration.map_or(self.iteration, |i| i.max(self.iteration)),
        }
    }
}

/// Partial info used for updates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration: Option<u64>,
}

impl InfoSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn iteration(mut self, iteration: u64) -> Self {
        self.iteration = Some(iteration);
        self
    }
}
