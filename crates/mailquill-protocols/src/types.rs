//! Common enums shared by the page agent and the background service.

use serde::{Deserialize, Serialize};

/// Where the text being improved came from.
///
/// Selects which prompt template, model, and effort setting the background
/// service applies to an improve request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    /// The primary webmail compose surface.
    Mail,
    /// A generic editable field on some other page.
    General,
}

/// A named tier controlling how much internal computation the remote model
/// applies before answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    /// Wire spelling used by the completion API.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningEffort::Minimal => "minimal",
            ReasoningEffort::Low => "low",
            ReasoningEffort::Medium => "medium",
            ReasoningEffort::High => "high",
        }
    }
}

impl std::fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide browser-action icon state.
///
/// `Inactive` is transient: it auto-reverts to `Idle` after a fixed delay
/// unless another transition preempts it first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconState {
    #[default]
    Idle,
    Loading,
    Error,
    Inactive,
}
