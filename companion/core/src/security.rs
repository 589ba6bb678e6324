//! Input Validation
//!
//! Free text enters the core in two places: chat messages and game guesses.
//! Both are checked here before anything else sees them. Rejected input
//! produces an inline warning and leaves session state untouched.

use serde::{Deserialize, Serialize};

/// Message shown for an empty chat submission
pub const EMPTY_MESSAGE_WARNING: &str = "Please type a message before sending.";

/// Size limits for user input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionLimits {
    /// Maximum size of a single chat message in bytes (default: 4KB)
    pub max_message_size: usize,
    /// Maximum size of a game guess in bytes (default: 64)
    pub max_guess_size: usize,
}

impl Default for CompanionLimits {
    fn default() -> Self {
        Self {
            max_message_size: 4 * 1024,
            max_guess_size: 64,
        }
    }
}

/// Result of input validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationResult {
    /// Input is valid
    Valid,
    /// Input is invalid with reason
    Invalid(String),
}

impl ValidationResult {
    /// Check if the result indicates valid input
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Validator for text typed by the user
#[derive(Clone, Debug, Default)]
pub struct InputValidator {
    limits: CompanionLimits,
}

impl InputValidator {
    /// Create a new input validator with the given limits
    pub fn new(limits: CompanionLimits) -> Self {
        Self { limits }
    }

    /// Validate a chat message
    pub fn validate_message(&self, content: &str) -> ValidationResult {
        if content.trim().is_empty() {
            return ValidationResult::Invalid(EMPTY_MESSAGE_WARNING.to_string());
        }

        if content.len() > self.limits.max_message_size {
            return ValidationResult::Invalid(format!(
                "Message too large: {} bytes (max: {})",
                content.len(),
                self.limits.max_message_size
            ));
        }

        check_control_chars(content, "Message")
    }

    /// Validate a game guess
    ///
    /// Blank guesses are left to the game itself, which reports them with
    /// its own wording.
    pub fn validate_guess(&self, guess: &str) -> ValidationResult {
        if guess.len() > self.limits.max_guess_size {
            return ValidationResult::Invalid(format!(
                "Guess too long: {} bytes (max: {})",
                guess.len(),
                self.limits.max_guess_size
            ));
        }

        check_control_chars(guess, "Guess")
    }

    /// Get the configured limits
    pub fn limits(&self) -> &CompanionLimits {
        &self.limits
    }
}

/// Reject control characters other than newline, tab and carriage return
fn check_control_chars(content: &str, what: &str) -> ValidationResult {
    if content
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\t' && c != '\r')
    {
        return ValidationResult::Invalid(format!("{what} contains invalid control characters"));
    }
    ValidationResult::Valid
}
