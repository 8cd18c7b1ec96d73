//! The settings record consumed by the background service.
//!
//! Every field carries a read-time default: a stored record written before a
//! field existed still deserializes to a fully usable value. Defaults are
//! never applied at write time.

use serde::{Deserialize, Serialize};

use crate::types::ReasoningEffort;

/// Placeholder token for the user's talking points in compose templates.
pub const TALKING_POINTS_TOKEN: &str = "{{TALKING_POINTS}}";
/// Placeholder token for the selected text in improve templates.
pub const SELECTED_TEXT_TOKEN: &str = "{{SELECTED_TEXT}}";
/// Placeholder token for the conversation context in both template kinds.
pub const THREAD_CONTEXT_TOKEN: &str = "{{THREAD_CONTEXT}}";

/// Flat settings record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Credential for the completion API. Empty means unconfigured.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_compose_model")]
    pub compose_model: String,

    #[serde(default = "default_mail_improve_model")]
    pub mail_improve_model: String,

    #[serde(default = "default_general_improve_model")]
    pub general_improve_model: String,

    #[serde(default = "default_compose_prompt")]
    pub compose_prompt: String,

    #[serde(default = "default_mail_improve_prompt")]
    pub mail_improve_prompt: String,

    #[serde(default = "default_general_improve_prompt")]
    pub general_improve_prompt: String,

    #[serde(default = "default_compose_effort")]
    pub compose_effort: ReasoningEffort,

    #[serde(default = "default_improve_effort")]
    pub improve_effort: ReasoningEffort,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            compose_model: default_compose_model(),
            mail_improve_model: default_mail_improve_model(),
            general_improve_model: default_general_improve_model(),
            compose_prompt: default_compose_prompt(),
            mail_improve_prompt: default_mail_improve_prompt(),
            general_improve_prompt: default_general_improve_prompt(),
            compose_effort: default_compose_effort(),
            improve_effort: default_improve_effort(),
        }
    }
}

impl Settings {
    /// Whether a credential is present.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

fn default_compose_model() -> String {
    "gpt-5-mini".to_string()
}

fn default_mail_improve_model() -> String {
    "gpt-5-mini".to_string()
}

fn default_general_improve_model() -> String {
    "gpt-5-nano".to_string()
}

fn default_compose_effort() -> ReasoningEffort {
    ReasoningEffort::Medium
}

fn default_improve_effort() -> ReasoningEffort {
    ReasoningEffort::Low
}

fn default_compose_prompt() -> String {
    format!(
        "You are drafting a reply to an email thread.\n\n\
         Thread so far:\n{THREAD_CONTEXT_TOKEN}\n\n\
         Write a reply that covers these talking points:\n{TALKING_POINTS_TOKEN}\n\n\
         Respond with the reply text only, no salutation placeholders."
    )
}

fn default_mail_improve_prompt() -> String {
    format!(
        "Improve the following draft taken from an email reply. Keep the\n\
         author's intent and tone, fix grammar, and tighten the wording.\n\n\
         Thread so far:\n{THREAD_CONTEXT_TOKEN}\n\n\
         Draft:\n{SELECTED_TEXT_TOKEN}\n\n\
         Respond with the improved text only."
    )
}

fn default_general_improve_prompt() -> String {
    format!(
        "Improve the following text. Keep the author's intent and tone, fix\n\
         grammar, and tighten the wording.\n\n\
         Context:\n{THREAD_CONTEXT_TOKEN}\n\n\
         Text:\n{SELECTED_TEXT_TOKEN}\n\n\
         Respond with the improved text only."
    )
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
