//! Text-Generation Backends
//!
//! Abstracted access to the hosted text-generation service through a common
//! trait interface, plus the decoding step that turns its loosely shaped
//! responses into plain text.
//!
//! # Available Backends
//!
//! - **Gemini**: Google's `generateContent` REST endpoint (default)
//!
//! # Usage
//!
//! ```ignore
//! use companion_core::backend::{GeminiBackend, LlmBackend, LlmRequest};
//! use companion_core::load_config;
//!
//! let backend = GeminiBackend::new(load_config()?.backend_config());
//! let request = LlmRequest::new("Hello!", "gemini-1.5-flash");
//! let response = backend.send(&request).await?;
//! ```

mod gemini;
mod response;
mod traits;

pub use gemini::GeminiBackend;
pub use response::{Candidate, CandidateContent, Generation, GenerationContent, Part, ResponseShape};
pub use traits::{
    BackendConfig, LlmBackend, LlmRequest, LlmResponse, DEFAULT_BASE_URL, DEFAULT_MODEL,
    DEFAULT_REQUEST_TIMEOUT,
};
