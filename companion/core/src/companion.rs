//! Companion - The Session Orchestrator
//!
//! The companion is the headless core of the app. It owns the session and
//! handles one [`SurfaceEvent`] at a time to completion:
//! - chat messages go through the safety gate, then the reply resolver
//! - questionnaire submissions are scored and appended to the history log
//! - game actions drive the guess-the-word state machine
//!
//! Everything the surface should show is sent back as [`CompanionMessage`]s
//! over an mpsc channel. Nothing in here is fatal to the session: service
//! failures fall back to a canned reply, log failures become warnings and
//! invalid input is rejected without touching state.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::backend::LlmBackend;
use crate::config::CompanionConfig;
use crate::events::{SurfaceEvent, View};
use crate::game::{GameError, NextOutcome};
use crate::history::{HistoryEntry, HistoryLog, HistoryRecord};
use crate::messages::{
    CompanionMessage, CompanionState, ContentType, MessageRole, NotifyLevel, SessionId,
};
use crate::questionnaire::{score_who5, MoodRatings};
use crate::resolver::{ReplyResolver, FALLBACK_REPLY, FALLBACK_WARNING};
use crate::safety::{self, SafetyLevel, CRITICAL_REPLY, EMERGENCY_NOTICE, QUICK_TIPS};
use crate::security::{InputValidator, ValidationResult};
use crate::session::Session;

/// Hint shown when a surface connects
pub const CHAT_TIP: &str =
    "Tip: Ask about mood check-ins, exercises, or just say how your day was.";

/// Shown when the last game question has been answered
pub const GAME_FINISHED: &str = "That was the last question. Play again?";

/// The companion - headless session orchestrator
pub struct Companion<B: LlmBackend> {
    /// Configuration
    config: CompanionConfig,
    /// Text-generation backend
    backend: Arc<B>,
    /// Turns neutral messages into replies
    resolver: ReplyResolver,
    /// Questionnaire history
    history: HistoryLog,
    /// Current session
    session: Session,
    /// Current operational state
    state: CompanionState,
    /// View the surface last reported
    current_view: View,
    /// Whether the backend passed its health check
    assistant_available: bool,
    /// Channel to send messages to the surface
    tx: mpsc::Sender<CompanionMessage>,
    /// Input validator for user text
    input_validator: InputValidator,
}

impl<B: LlmBackend + 'static> Companion<B> {
    /// Create a new companion with the given backend
    pub fn new(backend: B, config: CompanionConfig, tx: mpsc::Sender<CompanionMessage>) -> Self {
        let session = Session::new_with_limit(config.model.clone(), config.max_chat_turns);
        let input_validator = InputValidator::new(config.limits.clone());

        Self {
            resolver: config.resolver(),
            history: config.history_log(),
            config,
            backend: Arc::new(backend),
            session,
            state: CompanionState::Initializing,
            current_view: View::default(),
            assistant_available: false,
            tx,
            input_validator,
        }
    }

    /// Get the session ID
    pub fn session_id(&self) -> &SessionId {
        &self.session.id
    }

    /// Get the session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get current state
    pub fn state(&self) -> CompanionState {
        self.state
    }

    /// View the surface last opened
    pub fn current_view(&self) -> View {
        self.current_view
    }

    /// The history log in use
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Start the companion
    ///
    /// Probes the backend once. An unavailable assistant is only a warning:
    /// chat keeps working through the fallback reply.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.set_state(CompanionState::Initializing).await;

        self.assistant_available = self.backend.health_check().await;
        if !self.assistant_available {
            tracing::warn!(backend = self.backend.name(), "Assistant health check failed");
            self.notify(
                NotifyLevel::Warning,
                "Assistant not available - chat will use fallback replies",
            )
            .await;
        }

        tracing::info!(
            session = %self.session.id.0,
            model = %self.config.model,
            history = %self.history.path().display(),
            assistant_available = self.assistant_available,
            "Companion started"
        );

        self.set_state(CompanionState::Ready).await;
        self.send_session_info().await;

        Ok(())
    }

    /// Handle an event from the surface
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        tracing::debug!(event_id = %event.event_id().0, "Handling surface event");

        match event {
            SurfaceEvent::Connected { .. } => {
                self.send(CompanionMessage::State { state: self.state })
                    .await;
                self.send_session_info().await;
                self.notify(NotifyLevel::Info, CHAT_TIP).await;
            }

            SurfaceEvent::UserMessage { content, .. } => {
                match self.input_validator.validate_message(&content) {
                    ValidationResult::Valid => self.handle_user_message(content.trim()).await,
                    ValidationResult::Invalid(reason) => {
                        tracing::warn!(reason = %reason, "Rejected user message");
                        self.notify(NotifyLevel::Warning, &reason).await;
                    }
                }
            }

            SurfaceEvent::SubmitWho5 { answers, .. } => self.handle_who5(answers).await,

            SurfaceEvent::SaveMood { ratings, .. } => self.handle_mood(ratings).await,

            SurfaceEvent::SubmitGuess { guess, .. } => {
                match self.input_validator.validate_guess(&guess) {
                    ValidationResult::Valid => self.handle_guess(&guess).await,
                    ValidationResult::Invalid(reason) => {
                        tracing::warn!(reason = %reason, "Rejected guess");
                        self.notify(NotifyLevel::Warning, &reason).await;
                    }
                }
            }

            SurfaceEvent::NextQuestion { .. } => self.handle_next_question().await,

            SurfaceEvent::PlayAgain { .. } => self.handle_play_again().await,

            SurfaceEvent::OpenView { view, .. } => self.open_view(view).await,

            SurfaceEvent::RequestHistory { .. } => self.send_history().await,

            SurfaceEvent::QuitRequested { .. } => self.shutdown().await?,
        }

        Ok(())
    }

    /// Handle a validated chat message
    async fn handle_user_message(&mut self, text: &str) {
        let user_msg_id = self.session.add_user_message(text.to_string());
        self.send(CompanionMessage::Message {
            id: user_msg_id,
            role: MessageRole::User,
            content: text.to_string(),
            content_type: ContentType::Plain,
        })
        .await;

        let level = safety::classify(text);
        tracing::debug!(level = level.label(), "Classified chat message");

        match level {
            SafetyLevel::Critical => {
                self.reply(CRITICAL_REPLY.to_string(), ContentType::Canned)
                    .await;
                self.notify(NotifyLevel::Error, EMERGENCY_NOTICE).await;
                self.send(CompanionMessage::Helplines {
                    helplines: safety::helplines(),
                })
                .await;
            }
            SafetyLevel::Sad => {
                let reply = random_sad_reply();
                self.reply(reply, ContentType::Canned).await;
            }
            SafetyLevel::Neutral => {
                self.set_state(CompanionState::Thinking).await;
                self.session.begin_turn();

                let result = self.resolver.resolve(self.backend.as_ref(), text).await;

                self.session.end_turn();
                match result {
                    Ok(reply) => self.reply(reply, ContentType::Generated).await,
                    Err(_) => {
                        self.session.add_system_message(FALLBACK_WARNING.to_string());
                        self.notify(NotifyLevel::Warning, FALLBACK_WARNING).await;
                        self.reply(FALLBACK_REPLY.to_string(), ContentType::Canned)
                            .await;
                    }
                }
                self.set_state(CompanionState::Ready).await;
            }
        }
    }

    /// Record and send an assistant turn
    async fn reply(&mut self, content: String, content_type: ContentType) {
        let id = self.session.add_assistant_message(content.clone());
        self.send(CompanionMessage::Message {
            id,
            role: MessageRole::Assistant,
            content,
            content_type,
        })
        .await;
    }

    /// Score, persist and report a WHO-5 submission
    async fn handle_who5(&mut self, answers: [u8; 5]) {
        let score = match score_who5(answers) {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected WHO-5 submission");
                self.notify(NotifyLevel::Warning, &e.to_string()).await;
                return;
            }
        };

        let saved = self.append_history(&HistoryEntry::who5(&score)).await;

        let level = if score.is_low() {
            NotifyLevel::Warning
        } else {
            NotifyLevel::Success
        };
        self.notify(level, &score.summary()).await;

        if score.is_low() {
            self.send(CompanionMessage::Helplines {
                helplines: safety::helplines(),
            })
            .await;
        }

        if saved {
            self.notify(NotifyLevel::Info, "Saved your WHO-5 entry.").await;
        }

        self.send(CompanionMessage::Who5Result { score, saved }).await;
    }

    /// Persist and report a mood entry
    async fn handle_mood(&mut self, ratings: MoodRatings) {
        if let Err(e) = ratings.validate() {
            tracing::warn!(error = %e, "Rejected mood ratings");
            self.notify(NotifyLevel::Warning, &e.to_string()).await;
            return;
        }

        let entry = HistoryEntry::mood(ratings);
        let saved = self.append_history(&entry).await;

        if saved {
            self.notify(
                NotifyLevel::Success,
                &format!("Saved today's mood ({}).", entry.ts),
            )
            .await;
        }

        self.send(CompanionMessage::MoodSaved {
            ratings,
            timestamp: entry.ts,
            saved,
        })
        .await;
    }

    /// Append to the log, turning a failure into a warning
    async fn append_history(&mut self, entry: &HistoryEntry) -> bool {
        self.set_state(CompanionState::Saving).await;

        let saved = match self.history.append(entry).await {
            Ok(total) => {
                tracing::info!(kind = entry.kind(), total, "Saved history entry");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save history entry");
                self.notify(
                    NotifyLevel::Warning,
                    &format!("Could not save your {} entry: {e}", kind_label(&entry.record)),
                )
                .await;
                false
            }
        };

        self.set_state(CompanionState::Ready).await;
        saved
    }

    /// Send the most recent history entries
    async fn send_history(&self) {
        let entries = self.history.recent(self.config.recent_limit).await;
        tracing::debug!(count = entries.len(), "Loaded history");
        self.send(CompanionMessage::History { entries }).await;
    }

    /// Handle a guess for the current game question
    async fn handle_guess(&mut self, guess: &str) {
        self.heal_game();

        match self.session.game.submit_guess(guess) {
            Ok(outcome) => {
                let level = if outcome.correct {
                    NotifyLevel::Success
                } else {
                    NotifyLevel::Warning
                };
                self.notify(level, &outcome.message()).await;
            }
            Err(e) => self.reject_game_action(e).await,
        }

        self.send_game().await;
    }

    /// Advance to the next game question
    async fn handle_next_question(&mut self) {
        self.heal_game();

        match self.session.game.next_question() {
            Ok(NextOutcome::Advanced(index)) => {
                tracing::debug!(index, "Advanced game question");
            }
            Ok(NextOutcome::Finished) => self.notify(NotifyLevel::Info, GAME_FINISHED).await,
            Err(e) => self.reject_game_action(e).await,
        }

        self.send_game().await;
    }

    /// Restart the game from the first question
    async fn handle_play_again(&mut self) {
        self.heal_game();

        if let Err(e) = self.session.game.play_again() {
            self.reject_game_action(e).await;
        }

        self.send_game().await;
    }

    fn heal_game(&mut self) {
        if self.session.game.heal() {
            tracing::warn!("Game index was out of range; restarted at the first question");
        }
    }

    async fn reject_game_action(&self, error: GameError) {
        tracing::debug!(error = %error, "Rejected game action");
        self.notify(NotifyLevel::Warning, &error.to_string()).await;
    }

    async fn send_game(&self) {
        self.send(CompanionMessage::Game {
            view: self.session.game.view(),
        })
        .await;
    }

    /// Switch view and send what it needs
    async fn open_view(&mut self, view: View) {
        self.current_view = view;
        self.send(CompanionMessage::ViewChanged { view }).await;

        match view {
            View::Helplines => {
                self.send(CompanionMessage::Helplines {
                    helplines: safety::helplines(),
                })
                .await;
                self.send(CompanionMessage::Tips {
                    tips: QUICK_TIPS.iter().map(|t| (*t).to_string()).collect(),
                })
                .await;
            }
            View::History => self.send_history().await,
            View::Game => {
                self.heal_game();
                self.send_game().await;
            }
            View::Chat | View::Who5 | View::Mood => {}
        }
    }

    /// Shut down the companion
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.set_state(CompanionState::ShuttingDown).await;
        self.session.end();

        tracing::info!(
            session = %self.session.id.0,
            turns = self.session.metadata.message_count,
            "Companion shutting down"
        );

        self.send(CompanionMessage::Quit {
            message: Some("Take care of yourself. Goodbye!".to_string()),
        })
        .await;

        Ok(())
    }

    async fn send_session_info(&self) {
        self.send(CompanionMessage::SessionInfo {
            session_id: self.session.id.clone(),
            model: self.config.model.clone(),
            assistant_available: self.assistant_available,
        })
        .await;
    }

    /// Set state and notify the surface
    async fn set_state(&mut self, state: CompanionState) {
        self.state = state;
        self.send(CompanionMessage::State { state }).await;
    }

    /// Send notification
    async fn notify(&self, level: NotifyLevel, message: &str) {
        self.send(CompanionMessage::Notify {
            level,
            title: None,
            message: message.to_string(),
        })
        .await;
    }

    /// Send a message to the surface
    async fn send(&self, msg: CompanionMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}

/// Pick one exercise and one joke
///
/// Kept out of async code: the thread-local RNG is not `Send`.
fn random_sad_reply() -> String {
    let mut rng = rand::thread_rng();
    safety::sad_reply(&mut rng)
}

fn kind_label(record: &HistoryRecord) -> &'static str {
    match record {
        HistoryRecord::Who5 { .. } => "WHO-5",
        HistoryRecord::Mood { .. } => "mood",
        HistoryRecord::Unknown { .. } => "history",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{LlmRequest, LlmResponse};
    use crate::game::GamePhase;
    use tempfile::TempDir;

    // Mock backend for testing
    struct MockBackend {
        healthy: bool,
    }

    #[async_trait::async_trait]
    impl LlmBackend for MockBackend {
        fn name(&self) -> &str {
            "Mock"
        }

        async fn health_check(&self) -> bool {
            self.healthy
        }

        async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse> {
            if !self.healthy {
                anyhow::bail!("offline");
            }
            Ok(LlmResponse::new(
                serde_json::json!({"text": "Hello!"}),
                &request.model,
            ))
        }
    }

    fn companion(
        healthy: bool,
    ) -> (
        TempDir,
        Companion<MockBackend>,
        mpsc::Receiver<CompanionMessage>,
    ) {
        let dir = TempDir::new().unwrap();
        let mut config = CompanionConfig::default();
        config.history_file = dir.path().join("history.json");
        let (tx, rx) = mpsc::channel(100);
        (dir, Companion::new(MockBackend { healthy }, config, tx), rx)
    }

    fn drain(rx: &mut mpsc::Receiver<CompanionMessage>) -> Vec<CompanionMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    fn assistant_replies(msgs: &[CompanionMessage]) -> Vec<String> {
        msgs.iter()
            .filter_map(|m| match m {
                CompanionMessage::Message {
                    role: MessageRole::Assistant,
                    content,
                    ..
                } => Some(content.clone()),
                _ => None,
            })
            .collect()
    }

    fn user_message(content: &str) -> SurfaceEvent {
        SurfaceEvent::UserMessage {
            event_id: SurfaceEvent::new_event_id(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_companion_creation() {
        let (_dir, companion, _rx) = companion(true);
        assert_eq!(companion.state(), CompanionState::Initializing);
        assert_eq!(companion.current_view(), View::Chat);
    }

    #[tokio::test]
    async fn test_companion_start() {
        let (_dir, mut companion, mut rx) = companion(true);
        companion.start().await.unwrap();
        assert_eq!(companion.state(), CompanionState::Ready);

        let msgs = drain(&mut rx);
        assert!(matches!(msgs[0], CompanionMessage::State { .. }));
        assert!(msgs.iter().any(|m| matches!(
            m,
            CompanionMessage::SessionInfo {
                assistant_available: true,
                ..
            }
        )));
    }

    #[tokio::test]
    async fn test_unhealthy_start_only_warns() {
        let (_dir, mut companion, mut rx) = companion(false);
        companion.start().await.unwrap();
        assert_eq!(companion.state(), CompanionState::Ready);

        let msgs = drain(&mut rx);
        assert!(msgs.iter().any(|m| matches!(
            m,
            CompanionMessage::Notify {
                level: NotifyLevel::Warning,
                ..
            }
        )));
    }

    #[tokio::test]
    async fn test_neutral_message_uses_backend() {
        let (_dir, mut companion, mut rx) = companion(true);
        companion.handle_event(user_message("How was your day?")).await.unwrap();

        let msgs = drain(&mut rx);
        assert_eq!(assistant_replies(&msgs), vec!["Hello!".to_string()]);
        assert_eq!(companion.session().message_count(), 2);
        assert_eq!(companion.state(), CompanionState::Ready);
    }

    #[tokio::test]
    async fn test_neutral_message_falls_back() {
        let (_dir, mut companion, mut rx) = companion(false);
        companion.handle_event(user_message("Tell me something")).await.unwrap();

        let msgs = drain(&mut rx);
        assert_eq!(assistant_replies(&msgs), vec![FALLBACK_REPLY.to_string()]);
        assert!(msgs.iter().any(|m| matches!(
            m,
            CompanionMessage::Notify { message, .. } if message == FALLBACK_WARNING
        )));

        let roles: Vec<_> = companion
            .session()
            .all_messages()
            .iter()
            .map(|m| m.role)
            .collect();
        assert_eq!(
            roles,
            vec![MessageRole::User, MessageRole::System, MessageRole::Assistant]
        );
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let (_dir, mut companion, mut rx) = companion(true);
        companion.handle_event(user_message("   ")).await.unwrap();

        let msgs = drain(&mut rx);
        assert!(assistant_replies(&msgs).is_empty());
        assert_eq!(companion.session().message_count(), 0);
    }

    #[tokio::test]
    async fn test_open_game_view_sends_snapshot() {
        let (_dir, mut companion, mut rx) = companion(true);
        companion
            .handle_event(SurfaceEvent::OpenView {
                event_id: SurfaceEvent::new_event_id(),
                view: View::Game,
            })
            .await
            .unwrap();

        assert_eq!(companion.current_view(), View::Game);
        let msgs = drain(&mut rx);
        assert!(msgs.iter().any(|m| matches!(
            m,
            CompanionMessage::Game { view } if view.question_number == 1 && view.phase == GamePhase::Awaiting
        )));
    }

    #[tokio::test]
    async fn test_shutdown_sends_quit() {
        let (_dir, mut companion, mut rx) = companion(true);
        companion
            .handle_event(SurfaceEvent::QuitRequested {
                event_id: SurfaceEvent::new_event_id(),
            })
            .await
            .unwrap();

        assert_eq!(companion.state(), CompanionState::ShuttingDown);
        let msgs = drain(&mut rx);
        assert!(matches!(msgs.last(), Some(CompanionMessage::Quit { .. })));
    }
}
