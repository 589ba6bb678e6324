//! Gemini Backend Implementation
//!
//! Text-generation backend for Google's Gemini REST API.
//!
//! # Gemini API
//!
//! - `POST /models/{model}:generateContent` - one-shot generation
//! - `GET  /models/{model}` - model metadata (used as a health probe)
//!
//! The credential travels in the `x-goog-api-key` header. A missing
//! credential is reported as a `send` error so callers treat it like any
//! other soft failure.

use std::time::Instant;

use async_trait::async_trait;

use super::traits::{BackendConfig, LlmBackend, LlmRequest, LlmResponse};

/// Header carrying the API credential
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini backend client
#[derive(Clone)]
pub struct GeminiBackend {
    /// Connection configuration
    config: BackendConfig,
    /// HTTP client
    http_client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(config: BackendConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Self {
            config,
            http_client,
        }
    }

    /// Get generate endpoint URL for a model
    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Get model metadata URL
    fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.config.base_url.trim_end_matches('/'), model)
    }

    /// Build the JSON request body
    fn build_body(request: &LlmRequest) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "parts": [{ "text": request.prompt }]
            }]
        })
    }
}

impl Default for GeminiBackend {
    fn default() -> Self {
        Self::new(BackendConfig::default())
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn health_check(&self) -> bool {
        let Some(ref api_key) = self.config.api_key else {
            return false;
        };

        self.http_client
            .get(self.model_url(&self.config.model))
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No API key configured for Gemini"))?;

        let start = Instant::now();
        let response = self
            .http_client
            .post(self.generate_url(&request.model))
            .header(API_KEY_HEADER, api_key)
            .json(&Self::build_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini returned {status}: {body}");
        }

        let body: serde_json::Value = response.json().await?;

        Ok(LlmResponse {
            body,
            model: request.model.clone(),
            duration_ms: Some(u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)),
        })
    }
}
