//! Bridge message handling.
//!
//! The host may tear this context down between messages, so nothing here
//! relies on in-memory state surviving: settings are resolved per message
//! from the store, and the API client is rebuilt from them. Internal errors
//! are converted to structured failure responses at the message boundary;
//! the service never answers a message with a crash.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use mailquill_protocols::{
    BackgroundError, Bridge, BridgeRequest, BridgeResponse, IconState, PageSink, Settings,
    SourceTag,
};
use mailquill_settings::SettingsStore;

use crate::client::{CompletionClient, CompletionSpec, DEFAULT_API_URL};
use crate::icon::IconController;
use crate::prompt;

/// The privileged background service.
pub struct BackgroundService {
    store: Arc<dyn SettingsStore>,
    icon: IconController,
    page: Option<Arc<dyn PageSink>>,
    api_url: String,
}

impl BackgroundService {
    pub fn new(store: Arc<dyn SettingsStore>, icon: IconController) -> Self {
        Self {
            store,
            icon,
            page: None,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Attach the page context that keyboard-command triggers are relayed
    /// to.
    pub fn with_page(mut self, page: Arc<dyn PageSink>) -> Self {
        self.page = Some(page);
        self
    }

    /// Override the completion endpoint (compatible APIs, tests).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn icon(&self) -> &IconController {
        &self.icon
    }

    async fn resolve_settings(&self) -> Result<Settings, BackgroundError> {
        self.store
            .get()
            .await
            .map_err(|e| BackgroundError::Store(e.to_string()))
    }

    async fn handle(&self, request: BridgeRequest) -> Result<BridgeResponse, BackgroundError> {
        match request {
            BridgeRequest::GetSettings => {
                Ok(BridgeResponse::ok_settings(self.resolve_settings().await?))
            }
            BridgeRequest::Generate {
                talking_points,
                thread_context,
            } => self.generate(&talking_points, thread_context.as_deref()).await,
            BridgeRequest::ImproveText {
                text,
                thread_context,
                source,
            } => self.improve(&text, thread_context.as_deref(), source).await,
            BridgeRequest::SetIconState { state } => {
                if state == IconState::Inactive {
                    self.icon.flash_inactive().await;
                } else {
                    self.icon.set(state).await;
                }
                Ok(BridgeResponse::ok())
            }
            BridgeRequest::TriggerGenerate | BridgeRequest::TriggerImprove => {
                if let Some(page) = &self.page {
                    page.deliver(request).await;
                } else {
                    warn!("trigger received with no page context attached");
                }
                Ok(BridgeResponse::ok())
            }
        }
    }

    async fn generate(
        &self,
        talking_points: &str,
        thread_context: Option<&str>,
    ) -> Result<BridgeResponse, BackgroundError> {
        let settings = self.resolve_settings().await?;
        if !settings.has_api_key() {
            return Err(BackgroundError::MissingApiKey);
        }
        if settings.compose_prompt.trim().is_empty() {
            return Err(BackgroundError::MissingTemplate("compose_prompt"));
        }

        let rendered = prompt::render_compose(
            &settings.compose_prompt,
            talking_points,
            thread_context,
        );
        let spec = CompletionSpec::new(&settings.compose_model, prompt::COMPOSE_SYSTEM, rendered)
            .with_effort(settings.compose_effort);

        let draft = self.run_completion(&settings, &spec).await?;
        Ok(BridgeResponse::ok_draft(draft))
    }

    async fn improve(
        &self,
        text: &str,
        thread_context: Option<&str>,
        source: SourceTag,
    ) -> Result<BridgeResponse, BackgroundError> {
        let settings = self.resolve_settings().await?;
        if !settings.has_api_key() {
            return Err(BackgroundError::MissingApiKey);
        }

        // The source tag picks the template and model; both improve flows
        // share the single per-flow effort setting.
        let (template, template_name, model) = match source {
            SourceTag::Mail => (
                &settings.mail_improve_prompt,
                "mail_improve_prompt",
                &settings.mail_improve_model,
            ),
            SourceTag::General => (
                &settings.general_improve_prompt,
                "general_improve_prompt",
                &settings.general_improve_model,
            ),
        };
        if template.trim().is_empty() {
            return Err(BackgroundError::MissingTemplate(match source {
                SourceTag::Mail => "mail_improve_prompt",
                SourceTag::General => "general_improve_prompt",
            }));
        }
        debug!(?source, template = template_name, "improve request");

        let rendered = prompt::render_improve(template, text, thread_context, source);
        let spec = CompletionSpec::new(model, prompt::IMPROVE_SYSTEM, rendered)
            .with_effort(settings.improve_effort);

        let improved = self.run_completion(&settings, &spec).await?;
        Ok(BridgeResponse::ok_text(improved))
    }

    /// Perform the network call with the icon tracking its lifetime.
    async fn run_completion(
        &self,
        settings: &Settings,
        spec: &CompletionSpec,
    ) -> Result<String, BackgroundError> {
        self.icon.set(IconState::Loading).await;
        let client = CompletionClient::with_url(settings.api_key.clone(), self.api_url.clone());
        match client.complete(spec).await {
            Ok(text) => {
                self.icon.set(IconState::Idle).await;
                Ok(text)
            }
            Err(err) => {
                self.icon.set(IconState::Error).await;
                Err(err.into())
            }
        }
    }
}

#[async_trait]
impl Bridge for BackgroundService {
    async fn send(&self, request: BridgeRequest) -> BridgeResponse {
        debug!(?request, "bridge message");
        match self.handle(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "message handling failed");
                BridgeResponse::failure(err.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
