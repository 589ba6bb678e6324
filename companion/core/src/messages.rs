//! Companion Messages
//!
//! Messages sent from the companion core to a UI surface. These cover
//! everything the session can ask a surface to show: chat turns, notices,
//! questionnaire results, history listings and game snapshots.
//!
//! # Design Philosophy
//!
//! The surface holds no business logic. It renders what it is told and
//! forwards what the user did as a [`SurfaceEvent`](crate::events::SurfaceEvent).

use serde::{Deserialize, Serialize};

use crate::events::View;
use crate::game::GameView;
use crate::history::HistoryEntry;
use crate::questionnaire::{MoodRatings, Who5Score};
use crate::safety::Helpline;

/// Messages from the companion core to a UI surface
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CompanionMessage {
    // ============================================
    // Conversation Messages
    // ============================================
    /// A complete chat turn to display
    Message {
        /// Unique message ID for tracking
        id: MessageId,
        /// Who sent this message
        role: MessageRole,
        /// The message content
        content: String,
        /// Content type hint for rendering
        #[serde(default)]
        content_type: ContentType,
    },

    // ============================================
    // Wellness Directives
    // ============================================
    /// Show the crisis helplines
    Helplines {
        /// Helplines in display order
        helplines: Vec<Helpline>,
    },

    /// A scored WHO-5 submission
    Who5Result {
        /// The score
        score: Who5Score,
        /// Whether the entry reached the log
        saved: bool,
    },

    /// A mood entry was recorded
    MoodSaved {
        /// Ratings to chart
        ratings: MoodRatings,
        /// Timestamp written to the log
        timestamp: String,
        /// Whether the entry reached the log
        saved: bool,
    },

    /// Recent history, newest first
    History {
        /// The entries
        entries: Vec<HistoryEntry>,
    },

    /// Current game snapshot
    Game {
        /// The snapshot
        view: GameView,
    },

    /// Quick coping tips for the helplines view
    Tips {
        /// The tips in display order
        tips: Vec<String>,
    },

    /// Surface should switch to a view
    ViewChanged {
        /// The view to show
        view: View,
    },

    // ============================================
    // System Messages
    // ============================================
    /// System notification
    Notify {
        /// Notification level
        level: NotifyLevel,
        /// Title (optional)
        title: Option<String>,
        /// Message content
        message: String,
    },

    /// Companion state change
    State {
        /// The new state
        state: CompanionState,
    },

    /// Session information
    SessionInfo {
        /// Session ID
        session_id: SessionId,
        /// Model being used
        model: String,
        /// Whether the assistant answered its health check
        assistant_available: bool,
    },

    /// Request surface to quit
    Quit {
        /// Optional goodbye message
        message: Option<String>,
    },
}

/// Message identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generate a new unique message ID
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self(format!("msg_{id}"))
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Event identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

/// Session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new unique session ID
    ///
    /// Combines a timestamp with an atomic counter so two sessions created in
    /// the same millisecond still differ.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};

        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let count = COUNTER.fetch_add(1, Ordering::SeqCst);
        let timestamp = chrono::Utc::now().timestamp_millis();
        Self(format!("session_{timestamp}_{count}"))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Who sent a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// User input
    User,
    /// The assistant
    Assistant,
    /// Companion note (fallback warnings and similar)
    System,
}

impl MessageRole {
    /// Label used in prompts and transcripts
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
            Self::System => "System",
        }
    }
}

/// Content type hints for message rendering
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ContentType {
    /// Plain text content
    #[default]
    Plain,
    /// Model-generated reply
    Generated,
    /// Canned reply (coping exercise, crisis message, fallback)
    Canned,
    /// Error message content
    Error,
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Success
    Success,
}

/// Companion operational states
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanionState {
    /// Starting up, not ready
    Initializing,
    /// Ready for input
    Ready,
    /// Waiting on the assistant
    Thinking,
    /// Writing to the history log
    Saving,
    /// Shutting down
    ShuttingDown,
}

impl CompanionState {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Initializing => "Starting up...",
            Self::Ready => "Ready",
            Self::Thinking => "Thinking...",
            Self::Saving => "Saving...",
            Self::ShuttingDown => "Shutting down...",
        }
    }
}
