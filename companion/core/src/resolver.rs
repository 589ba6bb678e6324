//! Reply Resolver
//!
//! Turns a neutral chat message into an assistant reply: builds the prompt,
//! calls the backend exactly once and pulls text out of whichever response
//! shape came back. Every failure is returned as a [`ResolveError`] so the
//! caller can fall back to [`FALLBACK_REPLY`]; nothing here panics or retries.

use std::time::Duration;

use thiserror::Error;

use crate::backend::{LlmBackend, LlmRequest, ResponseShape, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT};

/// Instruction prepended to every prompt
pub const SYSTEM_INSTRUCTION: &str = "You are a youth mental-wellness assistant. Always respond in an empathetic, \
non-judgmental tone. Keep responses short (1-3 sentences) unless user asks for more. ";

/// Reply shown when the assistant cannot answer
pub const FALLBACK_REPLY: &str = "I'm having trouble connecting to my helper right now. \
Can I suggest a breathing exercise? Try: breathe in for 4, hold 4, out 6.";

/// Warning shown alongside [`FALLBACK_REPLY`]
pub const FALLBACK_WARNING: &str =
    "Temporary Chatbot error or API unreachable. Showing fallback response.";

/// Why no reply could be produced
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The backend call failed
    #[error("Backend request failed: {0}")]
    Backend(#[source] anyhow::Error),

    /// The call did not finish in time
    #[error("Backend request timed out after {0:?}")]
    Timeout(Duration),

    /// The response held no usable text
    #[error("Response contained no text")]
    NoText,
}

/// Build the single-turn prompt for `text`
#[must_use]
pub fn build_prompt(text: &str) -> String {
    format!("{SYSTEM_INSTRUCTION}\nUser: {text}\nAssistant:")
}

/// Resolves neutral messages into assistant replies
#[derive(Clone, Debug)]
pub struct ReplyResolver {
    model: String,
    timeout: Duration,
}

impl Default for ReplyResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT)
    }
}

impl ReplyResolver {
    /// Resolver for `model`, bounding each call by `timeout`
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            model: model.into(),
            timeout,
        }
    }

    /// Model name sent with each request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Ask `backend` for a reply to `text`
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the call fails, times out or yields no
    /// text. Callers treat all of these as a soft failure.
    pub async fn resolve<B>(&self, backend: &B, text: &str) -> Result<String, ResolveError>
    where
        B: LlmBackend + ?Sized,
    {
        let request = LlmRequest::new(build_prompt(text), &self.model);

        let result = match tokio::time::timeout(self.timeout, backend.send(&request)).await {
            Ok(Ok(response)) => {
                tracing::debug!(
                    model = %response.model,
                    duration_ms = ?response.duration_ms,
                    "Backend responded"
                );
                ResponseShape::extract_text(&response.body).ok_or(ResolveError::NoText)
            }
            Ok(Err(e)) => Err(ResolveError::Backend(e)),
            Err(_) => Err(ResolveError::Timeout(self.timeout)),
        };

        match &result {
            Ok(reply) => tracing::debug!(
                backend = backend.name(),
                reply_len = reply.len(),
                "Resolved assistant reply"
            ),
            Err(e) => tracing::warn!(backend = backend.name(), error = %e, "Assistant reply unavailable"),
        }

        result
    }
}
