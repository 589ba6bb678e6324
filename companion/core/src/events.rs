//! Surface Events
//!
//! Events sent from a UI surface to the companion core. Each one is a single
//! discrete user action; the core handles it to completion before the next.

use serde::{Deserialize, Serialize};

use crate::messages::EventId;
use crate::questionnaire::MoodRatings;

/// Events from UI surface to the companion core
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SurfaceEvent {
    // ============================================
    // Connection Events
    // ============================================
    /// Surface connected
    Connected {
        /// Event ID
        event_id: EventId,
    },

    // ============================================
    // User Input Events
    // ============================================
    /// User sent a chat message
    UserMessage {
        /// Event ID
        event_id: EventId,
        /// The message content
        content: String,
    },

    /// User submitted the WHO-5 form
    SubmitWho5 {
        /// Event ID
        event_id: EventId,
        /// Answers in item order, 0–5 each
        answers: [u8; 5],
    },

    /// User saved the mood tracker
    SaveMood {
        /// Event ID
        event_id: EventId,
        /// The ratings
        ratings: MoodRatings,
    },

    /// User guessed in the game
    SubmitGuess {
        /// Event ID
        event_id: EventId,
        /// The guess as typed
        guess: String,
    },

    /// User asked for the next game question
    NextQuestion {
        /// Event ID
        event_id: EventId,
    },

    /// User restarted the game
    PlayAgain {
        /// Event ID
        event_id: EventId,
    },

    // ============================================
    // Navigation Events
    // ============================================
    /// User switched view
    OpenView {
        /// Event ID
        event_id: EventId,
        /// The view opened
        view: View,
    },

    /// User asked to reload the history listing
    RequestHistory {
        /// Event ID
        event_id: EventId,
    },

    // ============================================
    // Lifecycle Events
    // ============================================
    /// User requested quit
    QuitRequested {
        /// Event ID
        event_id: EventId,
    },
}

impl SurfaceEvent {
    /// Generate a new event ID
    pub fn new_event_id() -> EventId {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        EventId(format!("evt_{}", id))
    }

    /// The event ID
    pub fn event_id(&self) -> &EventId {
        match self {
            Self::Connected { event_id }
            | Self::UserMessage { event_id, .. }
            | Self::SubmitWho5 { event_id, .. }
            | Self::SaveMood { event_id, .. }
            | Self::SubmitGuess { event_id, .. }
            | Self::NextQuestion { event_id }
            | Self::PlayAgain { event_id }
            | Self::OpenView { event_id, .. }
            | Self::RequestHistory { event_id }
            | Self::QuitRequested { event_id } => event_id,
        }
    }
}

/// The six views a surface offers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    /// Chat with the assistant
    #[default]
    Chat,
    /// WHO-5 questionnaire
    Who5,
    /// Mood tracker
    Mood,
    /// Helplines and coping tips
    Helplines,
    /// Questionnaire history
    History,
    /// Guess-the-word game
    Game,
}

impl View {
    /// Every view in navigation order
    pub const ALL: [View; 6] = [
        View::Chat,
        View::Who5,
        View::Mood,
        View::Helplines,
        View::History,
        View::Game,
    ];

    /// Tab title
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Chat => "Chat",
            Self::Who5 => "WHO-5",
            Self::Mood => "Mood Tracker",
            Self::Helplines => "Helplines & Tips",
            Self::History => "History",
            Self::Game => "Guess the Word",
        }
    }

    /// Position in [`View::ALL`]
    #[must_use]
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    /// The view after this one, wrapping
    #[must_use]
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The view before this one, wrapping
    #[must_use]
    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}
