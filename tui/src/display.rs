//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from [`CompanionMessage`]s and used for rendering.
//!
//! The TUI is a thin client: it renders what the companion tells it to and
//! keeps only what it needs to redraw a frame.

use std::collections::VecDeque;
use std::time::Duration;

use companion_core::{
    CompanionMessage, CompanionState, ContentType, GameView, Helpline, HistoryEntry, MessageId,
    MessageRole, MoodRatings, NotifyLevel, SessionId, View, Who5Score,
};

/// How long a notice stays in the status area
pub const NOTICE_TTL: Duration = Duration::from_secs(8);

/// Most notices kept at once
const MAX_NOTICES: usize = 4;

/// A rendered chat message
#[derive(Clone, Debug)]
pub struct DisplayMessage {
    /// Unique message ID
    pub id: MessageId,
    /// Who sent this message
    pub role: DisplayRole,
    /// The message content
    pub content: String,
    /// Rendering hint
    pub content_type: ContentType,
}

/// Display role for messages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayRole {
    /// User input
    User,
    /// The companion
    Assistant,
    /// System message
    System,
}

impl From<MessageRole> for DisplayRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => DisplayRole::User,
            MessageRole::Assistant => DisplayRole::Assistant,
            MessageRole::System => DisplayRole::System,
        }
    }
}

impl DisplayRole {
    /// Get the prefix for this role
    pub fn prefix(&self) -> &'static str {
        match self {
            DisplayRole::User => "You: ",
            DisplayRole::Assistant => "Companion: ",
            DisplayRole::System => "",
        }
    }
}

/// A transient notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NotifyLevel,
    /// Optional title
    pub title: Option<String>,
    /// Text
    pub message: String,
    /// Time since it arrived
    pub age: Duration,
}

impl Notice {
    /// One-line rendering
    pub fn text(&self) -> String {
        match &self.title {
            Some(title) => format!("{title}: {}", self.message),
            None => self.message.clone(),
        }
    }
}

/// Last WHO-5 result
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Who5Display {
    /// The score
    pub score: Who5Score,
    /// Whether it was written to the log
    pub saved: bool,
}

/// Last saved mood
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoodDisplay {
    /// Ratings to chart
    pub ratings: MoodRatings,
    /// Timestamp written to the log
    pub timestamp: String,
    /// Whether it was written to the log
    pub saved: bool,
}

/// Session details shown in the status bar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionDisplay {
    /// Session ID
    pub session_id: SessionId,
    /// Model name
    pub model: String,
    /// Whether the assistant answered its health check
    pub assistant_available: bool,
}

/// Complete display state derived from companion messages
#[derive(Clone, Debug)]
pub struct DisplayState {
    /// Chat transcript
    pub messages: Vec<DisplayMessage>,
    /// Active notices, oldest first
    pub notices: VecDeque<Notice>,
    /// Helplines to show
    pub helplines: Vec<Helpline>,
    /// Set when helplines arrived as an alert (crisis or low score)
    pub helplines_alert: bool,
    /// Quick tips
    pub tips: Vec<String>,
    /// Last WHO-5 result
    pub who5: Option<Who5Display>,
    /// Last saved mood
    pub mood: Option<MoodDisplay>,
    /// History entries, newest first
    pub history: Vec<HistoryEntry>,
    /// Whether a history listing has arrived
    pub history_loaded: bool,
    /// Current game snapshot
    pub game: Option<GameView>,
    /// View the companion asked for
    pub view: View,
    /// Companion state
    pub state: CompanionState,
    /// Session info
    pub session: Option<SessionDisplay>,
    /// Set once the companion says goodbye
    pub quit: bool,
    /// Goodbye text from the companion
    pub goodbye: Option<String>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            notices: VecDeque::new(),
            helplines: Vec::new(),
            helplines_alert: false,
            tips: Vec::new(),
            who5: None,
            mood: None,
            history: Vec::new(),
            history_loaded: false,
            game: None,
            view: View::default(),
            state: CompanionState::Initializing,
            session: None,
            quit: false,
            goodbye: None,
        }
    }
}

impl DisplayState {
    /// Create empty display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a companion message
    pub fn apply_message(&mut self, msg: CompanionMessage) {
        match msg {
            CompanionMessage::Message {
                id,
                role,
                content,
                content_type,
            } => {
                self.messages.push(DisplayMessage {
                    id,
                    role: role.into(),
                    content,
                    content_type,
                });
            }

            CompanionMessage::Helplines { helplines } => {
                self.helplines = helplines;
                if self.view != View::Helplines {
                    self.helplines_alert = true;
                }
            }

            CompanionMessage::Tips { tips } => self.tips = tips,

            CompanionMessage::Who5Result { score, saved } => {
                self.who5 = Some(Who5Display { score, saved });
            }

            CompanionMessage::MoodSaved {
                ratings,
                timestamp,
                saved,
            } => {
                self.mood = Some(MoodDisplay {
                    ratings,
                    timestamp,
                    saved,
                });
            }

            CompanionMessage::History { entries } => {
                self.history = entries;
                self.history_loaded = true;
            }

            CompanionMessage::Game { view } => self.game = Some(view),

            CompanionMessage::ViewChanged { view } => {
                if view != self.view {
                    self.helplines_alert = false;
                }
                self.view = view;
            }

            CompanionMessage::Notify {
                level,
                title,
                message,
            } => self.push_notice(level, title, message),

            CompanionMessage::State { state } => self.state = state,

            CompanionMessage::SessionInfo {
                session_id,
                model,
                assistant_available,
            } => {
                self.session = Some(SessionDisplay {
                    session_id,
                    model,
                    assistant_available,
                });
            }

            CompanionMessage::Quit { message } => {
                self.quit = true;
                self.goodbye = message;
            }
        }
    }

    /// Age notices and drop expired ones
    pub fn update(&mut self, delta: Duration) {
        for notice in &mut self.notices {
            notice.age += delta;
        }
        self.notices.retain(|n| n.age < NOTICE_TTL);
    }

    /// Most recent notice, if any
    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.back()
    }

    /// Number of chat messages
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    fn push_notice(&mut self, level: NotifyLevel, title: Option<String>, message: String) {
        self.notices.push_back(Notice {
            level,
            title,
            message,
            age: Duration::ZERO,
        });
        while self.notices.len() > MAX_NOTICES {
            self.notices.pop_front();
        }
    }
}
