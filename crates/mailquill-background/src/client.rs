//! Completion API client.
//!
//! One deliberate retry exists in the whole system: when the remote rejects
//! a request specifically because of the optional reasoning-effort
//! parameter, the call is repeated exactly once without it. Every other
//! failure (network, auth, quota, malformed payload) surfaces immediately.

use tracing::{debug, warn};

use mailquill_protocols::{ApiError, ReasoningEffort};

use crate::api::{ApiMessage, ApiRequest, ApiResponse};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 2048;

/// One completion call.
#[derive(Debug, Clone)]
pub struct CompletionSpec {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub max_completion_tokens: u32,
    pub effort: Option<ReasoningEffort>,
}

impl CompletionSpec {
    pub fn new(model: impl Into<String>, system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            prompt: prompt.into(),
            max_completion_tokens: DEFAULT_MAX_COMPLETION_TOKENS,
            effort: None,
        }
    }

    pub fn with_effort(mut self, effort: ReasoningEffort) -> Self {
        self.effort = Some(effort);
        self
    }
}

/// HTTP client for the completion API.
pub struct CompletionClient {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
}

impl CompletionClient {
    pub fn new(api_key: String) -> Self {
        Self::with_url(api_key, DEFAULT_API_URL.to_string())
    }

    /// Client with a custom endpoint (compatible APIs, tests).
    pub fn with_url(api_key: String, api_url: String) -> Self {
        Self {
            api_key,
            api_url,
            client: reqwest::Client::new(),
        }
    }

    /// Run a completion, applying the effort-rejection retry policy.
    pub async fn complete(&self, spec: &CompletionSpec) -> Result<String, ApiError> {
        match self.complete_once(spec, spec.effort).await {
            Ok(text) => Ok(text),
            Err(err) if spec.effort.is_some() && err.is_effort_rejection() => {
                warn!(model = %spec.model, "effort parameter rejected, retrying without it");
                self.complete_once(spec, None).await
            }
            Err(err) => Err(err),
        }
    }

    async fn complete_once(
        &self,
        spec: &CompletionSpec,
        effort: Option<ReasoningEffort>,
    ) -> Result<String, ApiError> {
        let request = ApiRequest {
            model: spec.model.clone(),
            messages: vec![
                ApiMessage::system(&spec.system),
                ApiMessage::user(&spec.prompt),
            ],
            max_completion_tokens: Some(spec.max_completion_tokens),
            reasoning_effort: effort,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Api { status, message });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

        let text = api_response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ApiError::EmptyCompletion);
        }

        debug!(model = %spec.model, chars = text.len(), "completion received");
        Ok(text.to_string())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
