//! Shared error types.

use thiserror::Error;

/// Completion API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Model returned an empty completion")]
    EmptyCompletion,
}

impl ApiError {
    /// True when the remote rejected the request specifically because of the
    /// optional reasoning-effort parameter. This is the only condition the
    /// system retries.
    pub fn is_effort_rejection(&self) -> bool {
        match self {
            ApiError::Api { status, message } => {
                (400..500).contains(status)
                    && (message.contains("reasoning_effort") || message.contains("reasoning.effort"))
            }
            _ => false,
        }
    }
}

/// Errors raised while handling a bridge message on the privileged side.
///
/// These never cross the bridge as errors; the handler converts them into
/// `success: false` responses at the message boundary.
#[derive(Debug, Error)]
pub enum BackgroundError {
    #[error("API key is not configured. Set it in the extension options.")]
    MissingApiKey,

    #[error("Prompt template '{0}' is not configured")]
    MissingTemplate(&'static str),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Settings store error: {0}")]
    Store(String),
}
