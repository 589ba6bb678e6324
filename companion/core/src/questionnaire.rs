//! Questionnaire Scoring
//!
//! Pure scoring for the two self-report forms:
//!
//! - **WHO-5**: five answers 0–5, raw score 0–25, percent = raw × 4.
//!   Percent below 50 is low wellbeing.
//! - **Mood tracker**: five independent 1–5 ratings keyed by fixed mood
//!   names, stored verbatim with no aggregate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// WHO-5 item texts, in order
pub const WHO5_QUESTIONS: [&str; 5] = [
    "Over the last two weeks I have felt cheerful and in good spirits.",
    "Over the last two weeks I have felt calm and relaxed.",
    "Over the last two weeks I have felt active and vigorous.",
    "Over the last two weeks I woke up feeling fresh and rested.",
    "Over the last two weeks my daily life has been filled with things that interest me.",
];

/// Highest WHO-5 answer value
pub const WHO5_MAX_ANSWER: u8 = 5;

/// Percent threshold below which wellbeing is low
pub const WHO5_LOW_THRESHOLD: u8 = 50;

/// Mood names, in display and storage order
pub const MOOD_NAMES: [&str; 5] = ["Happiness", "Calmness", "Energy", "Freshness", "Enjoyment"];

/// Lowest mood rating
pub const MOOD_MIN: u8 = 1;

/// Highest mood rating
pub const MOOD_MAX: u8 = 5;

/// Default slider position for a mood rating
pub const MOOD_DEFAULT: u8 = 3;

/// Errors raised for out-of-range form input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    /// A WHO-5 answer was above 5
    #[error("WHO-5 answer {index} is {value}, expected 0-5")]
    Who5OutOfRange {
        /// Zero-based item index
        index: usize,
        /// Offending value
        value: u8,
    },

    /// A mood rating was outside 1-5
    #[error("{mood} rating is {value}, expected 1-5")]
    MoodOutOfRange {
        /// Mood name
        mood: &'static str,
        /// Offending value
        value: u8,
    },
}

/// Wellbeing classification of a WHO-5 score
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wellbeing {
    /// Percent below 50; helplines should be shown
    Low,
    /// Percent 50 or above
    Acceptable,
}

/// A scored WHO-5 submission
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Who5Score {
    /// Sum of answers, 0–25
    pub raw: u8,
    /// raw × 4, 0–100
    pub percent: u8,
    /// The five answers as submitted
    pub answers: [u8; 5],
}

impl Who5Score {
    /// Wellbeing band for this score
    #[must_use]
    pub fn wellbeing(&self) -> Wellbeing {
        if self.percent < WHO5_LOW_THRESHOLD {
            Wellbeing::Low
        } else {
            Wellbeing::Acceptable
        }
    }

    /// Whether helplines should accompany this result
    #[must_use]
    pub fn is_low(&self) -> bool {
        self.wellbeing() == Wellbeing::Low
    }

    /// User-facing summary line
    #[must_use]
    pub fn summary(&self) -> String {
        match self.wellbeing() {
            Wellbeing::Low => format!(
                "Your WHO-5 score is {}/100 — this is a low score. Consider seeking support.",
                self.percent
            ),
            Wellbeing::Acceptable => format!(
                "Your WHO-5 score is {}/100 — looks okay. Keep practicing self-care.",
                self.percent
            ),
        }
    }
}

/// Score five WHO-5 answers
///
/// # Errors
///
/// Returns [`ScoreError::Who5OutOfRange`] for any answer above 5.
pub fn score_who5(answers: [u8; 5]) -> Result<Who5Score, ScoreError> {
    if let Some((index, &value)) = answers
        .iter()
        .enumerate()
        .find(|(_, v)| **v > WHO5_MAX_ANSWER)
    {
        return Err(ScoreError::Who5OutOfRange { index, value });
    }

    let raw: u8 = answers.iter().sum();
    Ok(Who5Score {
        raw,
        percent: raw * 4,
        answers,
    })
}

/// Five mood ratings keyed by fixed names
///
/// Field order matches [`MOOD_NAMES`], which is also the key order in the
/// persisted JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodRatings {
    /// Happiness rating
    #[serde(rename = "Happiness")]
    pub happiness: u8,
    /// Calmness rating
    #[serde(rename = "Calmness")]
    pub calmness: u8,
    /// Energy rating
    #[serde(rename = "Energy")]
    pub energy: u8,
    /// Freshness rating
    #[serde(rename = "Freshness")]
    pub freshness: u8,
    /// Enjoyment rating
    #[serde(rename = "Enjoyment")]
    pub enjoyment: u8,
}

impl Default for MoodRatings {
    fn default() -> Self {
        Self::from_array([MOOD_DEFAULT; 5])
    }
}

impl MoodRatings {
    /// Build from ratings in [`MOOD_NAMES`] order
    #[must_use]
    pub fn from_array(values: [u8; 5]) -> Self {
        Self {
            happiness: values[0],
            calmness: values[1],
            energy: values[2],
            freshness: values[3],
            enjoyment: values[4],
        }
    }

    /// Ratings in [`MOOD_NAMES`] order
    #[must_use]
    pub fn to_array(&self) -> [u8; 5] {
        [
            self.happiness,
            self.calmness,
            self.energy,
            self.freshness,
            self.enjoyment,
        ]
    }

    /// (name, rating) pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u8)> {
        MOOD_NAMES.into_iter().zip(self.to_array())
    }

    /// Check every rating is within 1–5
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::MoodOutOfRange`] for the first bad rating.
    pub fn validate(&self) -> Result<(), ScoreError> {
        match self.iter().find(|(_, v)| !(MOOD_MIN..=MOOD_MAX).contains(v)) {
            Some((mood, value)) => Err(ScoreError::MoodOutOfRange { mood, value }),
            None => Ok(()),
        }
    }

    /// Compact `Name:value` rendering used by history listings
    #[must_use]
    pub fn summary(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{name}:{value}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
