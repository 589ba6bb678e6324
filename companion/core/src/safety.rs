//! Safety Classification
//!
//! Maps free text to a [`SafetyLevel`] by keyword containment, and holds the
//! static support material (helplines, coping exercises, jokes, tips) the
//! orchestrator shows for each level.
//!
//! Classification is case-insensitive substring matching. Critical phrases
//! are always checked before sadness words, so a message containing both is
//! [`SafetyLevel::Critical`].

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Self-harm phrases that trigger the crisis path
pub const CRITICAL_KEYWORDS: &[&str] = &[
    "suicide",
    "kill myself",
    "want to die",
    "end my life",
    "hurt myself",
    "cant go on",
    "can't go on",
];

/// Words that indicate low mood
pub const SAD_KEYWORDS: &[&str] = &["sad", "unhappy", "depressed", "low", "down"];

/// Assistant reply on the crisis path
pub const CRITICAL_REPLY: &str = "I'm worried you mentioned something serious. \
     Please contact emergency services or one of these helplines immediately.";

/// Banner shown above the helpline list
pub const EMERGENCY_NOTICE: &str =
    "If you are in immediate danger, please call local emergency services right now.";

/// Result of classifying a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyLevel {
    /// Mentions self-harm; show helplines
    Critical,
    /// Low mood; offer an exercise and a joke
    Sad,
    /// Anything else; ask the assistant
    Neutral,
}

impl SafetyLevel {
    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Sad => "sad",
            Self::Neutral => "neutral",
        }
    }
}

/// Classify free text
#[must_use]
pub fn classify(text: &str) -> SafetyLevel {
    let lower = text.to_lowercase();

    if CRITICAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        SafetyLevel::Critical
    } else if SAD_KEYWORDS.iter().any(|k| lower.contains(k)) {
        SafetyLevel::Sad
    } else {
        SafetyLevel::Neutral
    }
}

/// A crisis-support contact
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Helpline {
    /// Service name
    pub name: String,
    /// Phone number(s)
    pub number: String,
    /// Availability / scope note
    pub note: String,
}

impl Helpline {
    fn new(name: &str, number: &str, note: &str) -> Self {
        Self {
            name: name.to_string(),
            number: number.to_string(),
            note: note.to_string(),
        }
    }
}

/// The trusted helpline list
#[must_use]
pub fn helplines() -> Vec<Helpline> {
    vec![
        Helpline::new(
            "Tele-MANAS (India)",
            "14416 / 1800-891-4416",
            "24/7 free mental-health support.",
        ),
        Helpline::new(
            "KIRAN (India Rehab helpline)",
            "1800-599-0019",
            "24/7 mental health rehab.",
        ),
        Helpline::new(
            "iCALL (TISS)",
            "022-25521111 / 9152987821",
            "telephone & email counseling.",
        ),
    ]
}

/// Short coping exercises offered on the sad path
pub const EXERCISES: &[&str] = &[
    "Try 4-4-6 breathing: inhale 4s, hold 4s, exhale 6s. Repeat 6 times.",
    "Take a 5-minute mindful walk, noticing your surroundings slowly.",
    "Grounding: name 5 things you can see, 4 things you can feel, 3 things you can hear.",
];

/// Light jokes offered on the sad path
pub const JOKES: &[&str] = &[
    "Why don't skeletons fight each other? They don't have the guts!",
    "I told my computer I needed a break. It sent me a Kit-Kat.",
    "Why did the math book look sad? Because it had too many problems.",
];

/// Quick coping suggestions for the helplines/tips view
pub const QUICK_TIPS: &[&str] = &[
    "Try 4-4-6 breathing (inhale 4s, hold 4s, exhale 6s) for 2 minutes.",
    "5-minute mindful walk.",
    "Grounding: name 5 things you see, 4 you feel, 3 you hear, 2 you smell, 1 you taste.",
];

/// Build the sad-path reply from one random exercise and one random joke
pub fn sad_reply<R: Rng + ?Sized>(rng: &mut R) -> String {
    let exercise = EXERCISES.choose(rng).copied().unwrap_or(EXERCISES[0]);
    let joke = JOKES.choose(rng).copied().unwrap_or(JOKES[0]);
    format!("💡 Exercise: {exercise}\n😂 Joke: {joke}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_critical_phrase() {
        assert_eq!(classify("I want to end my life"), SafetyLevel::Critical);
        assert_eq!(classify("Sometimes I think about SUICIDE"), SafetyLevel::Critical);
        assert_eq!(classify("i cant go on like this"), SafetyLevel::Critical);
        assert_eq!(classify("I can't go on"), SafetyLevel::Critical);
    }

    #[test]
    fn test_critical_wins_over_sad() {
        assert_eq!(
            classify("I'm so sad and depressed, I want to die"),
            SafetyLevel::Critical
        );
        assert_eq!(classify("feeling down, might hurt myself"), SafetyLevel::Critical);
    }

    #[test]
    fn test_sad_words() {
        assert_eq!(classify("I feel so down today"), SafetyLevel::Sad);
        assert_eq!(classify("Pretty UNHAPPY lately"), SafetyLevel::Sad);
    }

    #[test]
    fn test_sad_matches_substrings() {
        // plain containment, no word boundaries
        assert_eq!(classify("the download finished"), SafetyLevel::Sad);
        assert_eq!(classify("follow the plan"), SafetyLevel::Sad);
    }

    #[test]
    fn test_neutral() {
        assert_eq!(classify("How was your day?"), SafetyLevel::Neutral);
        assert_eq!(classify(""), SafetyLevel::Neutral);
    }

    #[test]
    fn test_helplines_catalog() {
        let list = helplines();
        assert_eq!(list.len(), 3);
        assert!(list.iter().any(|h| h.number.contains("14416")));
        assert!(list.iter().all(|h| !h.note.is_empty()));
    }

    #[test]
    fn test_sad_reply_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let reply = sad_reply(&mut rng);
        let (exercise, joke) = reply.split_once('\n').unwrap();
        assert!(exercise.starts_with("💡 Exercise: "));
        assert!(joke.starts_with("😂 Joke: "));
        assert!(EXERCISES.iter().any(|e| exercise.ends_with(e)));
        assert!(JOKES.iter().any(|j| joke.ends_with(j)));
    }

    #[test]
    fn test_level_label() {
        assert_eq!(SafetyLevel::Critical.label(), "critical");
        assert_eq!(SafetyLevel::Neutral.label(), "neutral");
    }
}
