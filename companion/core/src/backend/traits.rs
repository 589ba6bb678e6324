//! LLM Backend Traits
//!
//! Trait definitions for text-generation backends. The orchestrator only
//! ever talks to `dyn`-free generics over [`LlmBackend`], so tests can swap
//! in a scripted backend without touching the network.
//!
//! # Design Philosophy
//!
//! A backend performs exactly one request per call and hands back the raw
//! response body. Extracting text from that body is the resolver's job,
//! because the body's shape is only loosely known.

use std::time::Duration;

use async_trait::async_trait;

/// Default generation model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default REST base URL for the generation service
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default bound on a single generation call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A single generation request
#[derive(Clone, Debug, Default)]
pub struct LlmRequest {
    /// The full prompt (system instruction already folded in)
    pub prompt: String,
    /// Model to use (backend-specific identifier)
    pub model: String,
}

impl LlmRequest {
    /// Create a new request with prompt and model
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
        }
    }
}

/// Raw response from a generation call
#[derive(Clone, Debug)]
pub struct LlmResponse {
    /// Response body exactly as the service returned it
    pub body: serde_json::Value,
    /// Model that generated the response
    pub model: String,
    /// Round-trip time in milliseconds, when the backend measured it
    pub duration_ms: Option<u64>,
}

impl LlmResponse {
    /// Wrap a response body
    pub fn new(body: serde_json::Value, model: impl Into<String>) -> Self {
        Self {
            body,
            model: model.into(),
            duration_ms: None,
        }
    }
}

/// LLM Backend trait
///
/// Implement this trait to add support for a different generation provider.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Get the backend name (e.g., "Gemini")
    fn name(&self) -> &str;

    /// Check if the backend is configured and reachable
    async fn health_check(&self) -> bool;

    /// Send one request and wait for the complete response.
    ///
    /// Implementations must not retry.
    async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse>;
}

/// Backend connection configuration
#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// API credential; `None` makes every call a soft failure
    pub api_key: Option<String>,
    /// REST base URL
    pub base_url: String,
    /// Model probed by the health check
    pub model: String,
    /// HTTP timeout for a single call
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl BackendConfig {
    /// Create configuration with an API key and default endpoint
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Whether a credential is present
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_request_new() {
        let request = LlmRequest::new("Hello", "gemini-1.5-flash");
        assert_eq!(request.prompt, "Hello");
        assert_eq!(request.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_response_has_no_timing_by_default() {
        let response = LlmResponse::new(serde_json::json!({}), "m");
        assert_eq!(response.duration_ms, None);
    }

    #[test]
    fn test_backend_config_default() {
        let config = BackendConfig::default();
        assert!(!config.has_credential());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_backend_config_with_api_key() {
        let config = BackendConfig::with_api_key("secret");
        assert!(config.has_credential());
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }
}
