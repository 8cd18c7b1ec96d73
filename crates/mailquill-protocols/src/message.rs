//! Bridge message schema.
//!
//! Requests flow from the page agent to the privileged background service
//! (and triggers flow back the other way). Every response carries a success
//! flag and either a payload or an error string; remote failure is a normal
//! outcome, never a transport error.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::types::{IconState, SourceTag};

/// A request over the messaging bridge.
///
/// The `type` wire names are a fixed contract with stored prompts and the
/// options surface; do not rename them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeRequest {
    /// Generate a reply draft from talking points.
    #[serde(rename = "generate")]
    Generate {
        talking_points: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thread_context: Option<String>,
    },

    /// Improve a selected span of text.
    #[serde(rename = "IMPROVE_TEXT")]
    ImproveText {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thread_context: Option<String>,
        source: SourceTag,
    },

    /// Read the current settings record.
    #[serde(rename = "getSettings")]
    GetSettings,

    /// Keyboard command: start the generate flow on the active surface.
    #[serde(rename = "TRIGGER_GENERATE")]
    TriggerGenerate,

    /// Keyboard command: improve the current selection.
    #[serde(rename = "TRIGGER_IMPROVE")]
    TriggerImprove,

    /// Update the browser-action icon.
    #[serde(rename = "SET_ICON_STATE")]
    SetIconState { state: IconState },
}

/// The uniform response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub success: bool,

    /// Generated reply draft (generate flow).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<String>,

    /// Improved text (improve flow).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Settings payload (settings lookup).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BridgeResponse {
    /// Plain acknowledgement with no payload.
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn ok_draft(draft: impl Into<String>) -> Self {
        Self {
            success: true,
            draft: Some(draft.into()),
            ..Self::default()
        }
    }

    pub fn ok_text(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn ok_settings(settings: Settings) -> Self {
        Self {
            success: true,
            settings: Some(settings),
            ..Self::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
