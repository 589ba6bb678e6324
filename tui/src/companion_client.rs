//! Companion Client
//!
//! Thin wrapper around the [`Companion`] for TUI integration.
//! The companion is embedded directly (no network); this client turns user
//! actions into [`SurfaceEvent`]s and drains the resulting messages.

use tokio::sync::mpsc;

use companion_core::{
    Companion, CompanionConfig, CompanionMessage, CompanionState, GeminiBackend, LlmBackend,
    MoodRatings, SurfaceEvent, View,
};

/// Channel depth between the companion and the surface
const CHANNEL_CAPACITY: usize = 100;

/// Client for communicating with the embedded companion
pub struct CompanionClient<B: LlmBackend = GeminiBackend> {
    /// The embedded companion instance
    companion: Companion<B>,
    /// Receiver for messages from the companion
    rx: mpsc::Receiver<CompanionMessage>,
}

impl CompanionClient<GeminiBackend> {
    /// Create a client talking to Gemini with the given configuration
    pub fn new(config: CompanionConfig) -> Self {
        let backend = GeminiBackend::new(config.backend_config());
        Self::with_backend(backend, config)
    }
}

impl<B: LlmBackend + 'static> CompanionClient<B> {
    /// Create a client around any backend
    pub fn with_backend(backend: B, config: CompanionConfig) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let companion = Companion::new(backend, config, tx);
        Self { companion, rx }
    }

    /// Start the companion (health check, session info)
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.companion.start().await
    }

    /// Connect this surface
    pub async fn connect(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::Connected {
            event_id: SurfaceEvent::new_event_id(),
        })
        .await
    }

    /// Send a chat message
    pub async fn send_message(&mut self, content: String) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::UserMessage {
            event_id: SurfaceEvent::new_event_id(),
            content,
        })
        .await
    }

    /// Submit WHO-5 answers
    pub async fn submit_who5(&mut self, answers: [u8; 5]) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::SubmitWho5 {
            event_id: SurfaceEvent::new_event_id(),
            answers,
        })
        .await
    }

    /// Save today's mood
    pub async fn save_mood(&mut self, ratings: MoodRatings) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::SaveMood {
            event_id: SurfaceEvent::new_event_id(),
            ratings,
        })
        .await
    }

    /// Guess the current riddle
    pub async fn guess(&mut self, guess: String) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::SubmitGuess {
            event_id: SurfaceEvent::new_event_id(),
            guess,
        })
        .await
    }

    /// Move to the next riddle
    pub async fn next_question(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::NextQuestion {
            event_id: SurfaceEvent::new_event_id(),
        })
        .await
    }

    /// Restart the game
    pub async fn play_again(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::PlayAgain {
            event_id: SurfaceEvent::new_event_id(),
        })
        .await
    }

    /// Switch to a view
    pub async fn open_view(&mut self, view: View) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::OpenView {
            event_id: SurfaceEvent::new_event_id(),
            view,
        })
        .await
    }

    /// Reload the history listing
    pub async fn request_history(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::RequestHistory {
            event_id: SurfaceEvent::new_event_id(),
        })
        .await
    }

    /// Notify the companion that the user wants to quit
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::QuitRequested {
            event_id: SurfaceEvent::new_event_id(),
        })
        .await
    }

    /// Send a raw event
    pub async fn send_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        self.companion.handle_event(event).await
    }

    /// Receive all pending messages (non-blocking)
    pub fn recv_all(&mut self) -> Vec<CompanionMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Current companion state
    pub fn state(&self) -> CompanionState {
        self.companion.state()
    }

    /// Whether the companion is accepting input
    pub fn is_ready(&self) -> bool {
        matches!(self.companion.state(), CompanionState::Ready)
    }
}
