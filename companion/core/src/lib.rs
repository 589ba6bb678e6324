//! Companion Core - Headless Session Logic for the Wellness Companion
//!
//! This crate holds everything the wellness companion does, independent of
//! any UI framework. A surface (the terminal UI, a test harness) forwards user
//! actions in and renders whatever comes back out.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         UI Surface                            │
//! │            (wellness-tui: ratatui + crossterm)                │
//! │                            │                                  │
//! │                  SurfaceEvent (up)                            │
//! │                CompanionMessage (down)                        │
//! └────────────────────────────┼─────────────────────────────────┘
//!                              │
//! ┌────────────────────────────┼─────────────────────────────────┐
//! │                     COMPANION CORE                            │
//! │  ┌─────────────────────────┴──────────────────────────────┐  │
//! │  │                      Companion                          │  │
//! │  │  ┌─────────┐ ┌────────┐ ┌──────────┐ ┌──────────────┐  │  │
//! │  │  │ Session │ │ Safety │ │ Resolver │ │ History Log  │  │  │
//! │  │  │ + Game  │ │  Gate  │ │ (Gemini) │ │   (JSON)     │  │  │
//! │  │  └─────────┘ └────────┘ └──────────┘ └──────────────┘  │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use companion_core::{load_config, Companion, GeminiBackend, SurfaceEvent};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let backend = GeminiBackend::new(config.backend_config());
//!     let (tx, mut rx) = mpsc::channel(100);
//!
//!     let mut companion = Companion::new(backend, config, tx);
//!     companion.start().await?;
//!
//!     companion
//!         .handle_event(SurfaceEvent::UserMessage {
//!             event_id: SurfaceEvent::new_event_id(),
//!             content: "How can I sleep better?".to_string(),
//!         })
//!         .await?;
//!
//!     while let Ok(msg) = rx.try_recv() {
//!         // Render message to UI
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`backend`]: Text-generation backend abstraction and response decoding
//! - [`companion`]: The session orchestrator
//! - [`config`]: Layered TOML/environment configuration
//! - [`events`]: Events from UI surfaces to the core
//! - [`game`]: Guess-the-word state machine
//! - [`history`]: Append-only questionnaire log
//! - [`messages`]: Messages from the core to UI surfaces
//! - [`questionnaire`]: WHO-5 scoring and mood ratings
//! - [`resolver`]: Prompt building and reply extraction
//! - [`safety`]: Crisis keyword classifier, helplines and coping content
//! - [`security`]: Input validation
//! - [`session`]: Chat transcript and game progress
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod companion;
pub mod config;
pub mod events;
pub mod game;
pub mod history;
pub mod messages;
pub mod questionnaire;
pub mod resolver;
pub mod safety;
pub mod security;
pub mod session;

// Re-exports for convenience
pub use backend::{BackendConfig, GeminiBackend, LlmBackend, LlmRequest, LlmResponse, ResponseShape};
pub use companion::Companion;
pub use config::{
    default_config_path, load_config, load_config_from_path, CompanionConfig, CompanionToml,
    ConfigError, ConfigSource,
};
pub use events::{SurfaceEvent, View};
pub use game::{GameError, GamePhase, GameState, GameView, GAME_QUESTIONS};
pub use history::{HistoryEntry, HistoryError, HistoryLog, HistoryRecord};
pub use messages::{
    CompanionMessage, CompanionState, ContentType, EventId, MessageId, MessageRole, NotifyLevel,
    SessionId,
};
pub use questionnaire::{score_who5, MoodRatings, ScoreError, Wellbeing, Who5Score};
pub use resolver::{ReplyResolver, ResolveError};
pub use safety::{classify, Helpline, SafetyLevel};
pub use security::{CompanionLimits, InputValidator, ValidationResult};
pub use session::{ConversationMessage, Session, SessionMetadata, SessionState};
