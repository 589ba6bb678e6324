//! Guess-the-Word Game
//!
//! A five-question riddle game played one question at a time.
//!
//! # State Machine
//!
//! ```text
//!                 guess                    next (i+1 < N)
//! AwaitingGuess(i) ────► ShowingResult(i, ok) ────────────► AwaitingGuess(i+1)
//!        ▲                        │
//!        │   play again           │ next (i+1 == N): stays, offers play again
//!        └────────────────────────┘ (only from ShowingResult(N-1, _))
//! ```
//!
//! A stored index at or past the end of the catalog is treated as stale and
//! heals to `AwaitingGuess(0)` before any action or render.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A riddle and its expected answer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameQuestion {
    /// Riddle text
    pub prompt: &'static str,
    /// Expected answer (lower-case)
    pub answer: &'static str,
}

/// The fixed question catalog
pub const GAME_QUESTIONS: [GameQuestion; 5] = [
    GameQuestion {
        prompt: "I am round and often seen in the sky at night. What am I?",
        answer: "moon",
    },
    GameQuestion {
        prompt: "I have keys but no locks. What am I?",
        answer: "piano",
    },
    GameQuestion {
        prompt: "I can fly without wings and cry without eyes. What am I?",
        answer: "cloud",
    },
    GameQuestion {
        prompt: "I am the largest land animal. What am I?",
        answer: "elephant",
    },
    GameQuestion {
        prompt: "I have a neck but no head. What am I?",
        answer: "bottle",
    },
];

/// Actions that do not fit the current game state
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// Guess submitted while a result is showing
    #[error("This question has already been answered. Move on to the next one.")]
    AlreadyAnswered,

    /// "Next" requested before a guess was made
    #[error("Submit a guess before moving to the next question.")]
    NotAnswered,

    /// "Play again" requested before the last result
    #[error("Play again is available after the last question.")]
    NotFinished,

    /// Blank guess
    #[error("Please type a guess before submitting.")]
    EmptyGuess,
}

/// Session-scoped game state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Waiting for a guess on question `index`
    AwaitingGuess {
        /// Current question index
        index: usize,
    },
    /// Showing whether the guess for question `index` was right
    ShowingResult {
        /// Current question index
        index: usize,
        /// Whether the guess matched
        correct: bool,
    },
}

impl Default for GameState {
    fn default() -> Self {
        Self::AwaitingGuess { index: 0 }
    }
}

/// Result of a guess
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuessOutcome {
    /// Whether the guess matched
    pub correct: bool,
    /// The expected answer
    pub expected: &'static str,
}

impl GuessOutcome {
    /// User-facing feedback line
    #[must_use]
    pub fn message(&self) -> String {
        if self.correct {
            "Correct! ✅".to_string()
        } else {
            format!("Wrong! The correct answer is: {}", self.expected)
        }
    }
}

/// Result of a "next question" action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextOutcome {
    /// Moved on to the question at this index
    Advanced(usize),
    /// Already at the last question; play again is on offer
    Finished,
}

impl GameState {
    /// Fresh game at the first question
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of questions
    #[must_use]
    pub fn total() -> usize {
        GAME_QUESTIONS.len()
    }

    /// Current question index
    #[must_use]
    pub fn index(&self) -> usize {
        match *self {
            Self::AwaitingGuess { index } | Self::ShowingResult { index, .. } => index,
        }
    }

    /// Whether the current question has been answered
    #[must_use]
    pub fn is_answered(&self) -> bool {
        matches!(self, Self::ShowingResult { .. })
    }

    /// Whether the last question's result is showing
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ShowingResult { index, .. } if *index + 1 == Self::total())
    }

    /// Reset a stale index; returns true if a reset happened
    pub fn heal(&mut self) -> bool {
        if self.index() >= Self::total() {
            tracing::debug!(index = self.index(), "Resetting stale game index");
            *self = Self::default();
            true
        } else {
            false
        }
    }

    /// The current question
    #[must_use]
    pub fn question(&self) -> &'static GameQuestion {
        GAME_QUESTIONS
            .get(self.index())
            .unwrap_or(&GAME_QUESTIONS[0])
    }

    /// Submit a guess for the current question
    ///
    /// The guess is trimmed and lower-cased before an exact comparison.
    ///
    /// # Errors
    ///
    /// [`GameError::EmptyGuess`] for blank input and
    /// [`GameError::AlreadyAnswered`] while a result is showing. State is
    /// unchanged on error.
    pub fn submit_guess(&mut self, guess: &str) -> Result<GuessOutcome, GameError> {
        self.heal();

        let Self::AwaitingGuess { index } = *self else {
            return Err(GameError::AlreadyAnswered);
        };

        let normalized = guess.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(GameError::EmptyGuess);
        }

        let expected = GAME_QUESTIONS[index].answer;
        let correct = normalized == expected.to_lowercase();
        *self = Self::ShowingResult { index, correct };

        Ok(GuessOutcome { correct, expected })
    }

    /// Move to the next question
    ///
    /// # Errors
    ///
    /// [`GameError::NotAnswered`] if no guess has been made yet.
    pub fn next_question(&mut self) -> Result<NextOutcome, GameError> {
        self.heal();

        let Self::ShowingResult { index, .. } = *self else {
            return Err(GameError::NotAnswered);
        };

        if index + 1 < Self::total() {
            *self = Self::AwaitingGuess { index: index + 1 };
            Ok(NextOutcome::Advanced(index + 1))
        } else {
            Ok(NextOutcome::Finished)
        }
    }

    /// Restart from the first question
    ///
    /// # Errors
    ///
    /// [`GameError::NotFinished`] unless the last result is showing.
    pub fn play_again(&mut self) -> Result<(), GameError> {
        self.heal();

        if !self.is_terminal() {
            return Err(GameError::NotFinished);
        }

        *self = Self::default();
        Ok(())
    }

    /// Snapshot for rendering
    #[must_use]
    pub fn view(&self) -> GameView {
        let mut state = *self;
        state.heal();

        let question = state.question();
        let phase = match state {
            Self::AwaitingGuess { .. } => GamePhase::Awaiting,
            Self::ShowingResult { correct, .. } => GamePhase::Result {
                correct,
                answer: question.answer.to_string(),
            },
        };

        GameView {
            question_number: state.index() + 1,
            total: Self::total(),
            prompt: question.prompt.to_string(),
            phase,
            can_play_again: state.is_terminal(),
        }
    }
}

/// Phase of the current question, as rendered
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a guess
    Awaiting,
    /// Result is showing
    Result {
        /// Whether the guess matched
        correct: bool,
        /// The expected answer
        answer: String,
    },
}

/// Render snapshot of the game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// One-based question number
    pub question_number: usize,
    /// Number of questions
    pub total: usize,
    /// Riddle text
    pub prompt: String,
    /// Current phase
    pub phase: GamePhase,
    /// Whether "play again" is on offer
    pub can_play_again: bool,
}
