//! Session Management
//!
//! A session is one user's continuous interaction: the chat transcript and
//! the guess-the-word game progress. Nothing here is persisted; questionnaire
//! results go to the [`HistoryLog`](crate::history::HistoryLog) instead.

use serde::{Deserialize, Serialize};

use crate::game::GameState;
use crate::messages::{MessageId, MessageRole, SessionId};

/// One chat turn
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Unique message ID
    pub id: MessageId,
    /// Who sent this message
    pub role: MessageRole,
    /// Message content
    pub content: String,
    /// When the message was created (Unix timestamp ms)
    pub timestamp: u64,
}

impl ConversationMessage {
    /// Create a new message
    pub fn new(role: MessageRole, content: String) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content,
            timestamp: now_ms(),
        }
    }
}

/// Session state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Session is active and ready
    Active,
    /// Session is waiting on the assistant
    Busy,
    /// Session has ended
    Ended,
}

/// Session metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// When the session was created (Unix timestamp ms)
    pub created_at: u64,
    /// When the session was last active (Unix timestamp ms)
    pub last_active_at: u64,
    /// Total chat turns added, including pruned ones
    pub message_count: u32,
    /// Model used for this session
    pub model: String,
}

impl SessionMetadata {
    /// Create new metadata
    pub fn new(model: String) -> Self {
        let now = now_ms();
        Self {
            created_at: now,
            last_active_at: now,
            message_count: 0,
            model,
        }
    }

    /// Update last active timestamp
    pub fn touch(&mut self) {
        self.last_active_at = now_ms();
    }

    /// Increment message count
    pub fn add_message(&mut self) {
        self.message_count += 1;
        self.touch();
    }
}

/// A companion session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Unique session ID
    pub id: SessionId,
    /// Session state
    pub state: SessionState,
    /// Session metadata
    pub metadata: SessionMetadata,
    /// Chat transcript, oldest first
    pub messages: Vec<ConversationMessage>,
    /// Guess-the-word progress
    pub game: GameState,
    /// Maximum number of messages to keep (0 = unlimited)
    #[serde(default)]
    max_messages: usize,
}

impl Session {
    /// Create a new session without a transcript cap
    pub fn new(model: String) -> Self {
        Self::new_with_limit(model, 0)
    }

    /// Create a new session keeping at most `max_messages` turns
    pub fn new_with_limit(model: String, max_messages: usize) -> Self {
        Self {
            id: SessionId::new(),
            state: SessionState::Active,
            metadata: SessionMetadata::new(model),
            messages: Vec::new(),
            game: GameState::new(),
            max_messages,
        }
    }

    /// Add a user turn
    pub fn add_user_message(&mut self, content: String) -> MessageId {
        self.push(MessageRole::User, content)
    }

    /// Add an assistant turn
    pub fn add_assistant_message(&mut self, content: String) -> MessageId {
        self.push(MessageRole::Assistant, content)
    }

    /// Add a system note
    pub fn add_system_message(&mut self, content: String) -> MessageId {
        self.push(MessageRole::System, content)
    }

    fn push(&mut self, role: MessageRole, content: String) -> MessageId {
        let msg = ConversationMessage::new(role, content);
        let id = msg.id.clone();
        tracing::trace!(role = role.label(), id = %id.0, "Recorded turn");
        self.messages.push(msg);
        self.metadata.add_message();
        self.prune_if_needed();
        id
    }

    /// Mark the session as waiting on the assistant
    pub fn begin_turn(&mut self) {
        if self.state == SessionState::Active {
            self.state = SessionState::Busy;
        }
    }

    /// Mark the assistant turn as finished
    pub fn end_turn(&mut self) {
        if self.state == SessionState::Busy {
            self.state = SessionState::Active;
        }
    }

    /// Get all messages
    pub fn all_messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// End the session
    pub fn end(&mut self) {
        self.state = SessionState::Ended;
        self.metadata.touch();
    }

    /// Remove the oldest turns beyond the cap
    fn prune_if_needed(&mut self) {
        if self.max_messages == 0 || self.messages.len() <= self.max_messages {
            return;
        }

        let to_remove = self.messages.len() - self.max_messages;
        self.messages.drain(..to_remove);

        tracing::debug!(
            removed = to_remove,
            remaining = self.messages.len(),
            "Pruned session messages by count"
        );
    }

    /// Get current message count
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Configured transcript cap (0 = unlimited)
    pub fn limit(&self) -> usize {
        self.max_messages
    }
}

/// Get current timestamp in milliseconds
fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = Session::new("test-model".to_string());
        assert_eq!(session.state, SessionState::Active);
        assert!(session.messages.is_empty());
        assert_eq!(session.metadata.model, "test-model");
        assert_eq!(session.game, GameState::AwaitingGuess { index: 0 });
    }

    #[test]
    fn test_add_messages() {
        let mut session = Session::new("test".to_string());

        let user_id = session.add_user_message("Hello".to_string());
        session.add_assistant_message("Hi there".to_string());
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.metadata.message_count, 2);

        let msg = &session.all_messages()[0];
        assert_eq!(msg.id, user_id);
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_turn_state_transitions() {
        let mut session = Session::new("test".to_string());

        session.begin_turn();
        assert_eq!(session.state, SessionState::Busy);

        session.end_turn();
        assert_eq!(session.state, SessionState::Active);

        session.end();
        session.begin_turn();
        assert_eq!(session.state, SessionState::Ended);
    }

    #[test]
    fn test_session_with_limit() {
        let mut session = Session::new_with_limit("test".to_string(), 3);
        assert_eq!(session.limit(), 3);

        for i in 1..=5 {
            session.add_user_message(format!("Message {i}"));
        }

        assert_eq!(session.message_count(), 3);
        assert_eq!(session.metadata.message_count, 5);

        let messages: Vec<_> = session.all_messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(messages, vec!["Message 3", "Message 4", "Message 5"]);
    }
}
