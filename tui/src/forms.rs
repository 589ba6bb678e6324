//! Form State
//!
//! Keyboard-driven state for the WHO-5 and mood forms. Values are clamped to
//! their legal range here, so only well-formed answers ever leave the surface.

use companion_core::questionnaire::{
    MOOD_DEFAULT, MOOD_MAX, MOOD_MIN, MOOD_NAMES, WHO5_MAX_ANSWER, WHO5_QUESTIONS,
};
use companion_core::MoodRatings;

/// A five-item form of bounded integers
#[derive(Clone, Debug, PartialEq, Eq)]
struct BoundedItems {
    values: [u8; 5],
    selected: usize,
    min: u8,
    max: u8,
}

impl BoundedItems {
    fn new(initial: u8, min: u8, max: u8) -> Self {
        Self {
            values: [initial; 5],
            selected: 0,
            min,
            max,
        }
    }

    fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.values.len();
    }

    fn select_previous(&mut self) {
        self.selected = (self.selected + self.values.len() - 1) % self.values.len();
    }

    fn increment(&mut self) {
        let value = &mut self.values[self.selected];
        *value = value.saturating_add(1).min(self.max);
    }

    fn decrement(&mut self) {
        let value = &mut self.values[self.selected];
        *value = value.saturating_sub(1).max(self.min);
    }

    /// Set the selected item from a typed digit; out-of-range digits are ignored
    fn set_digit(&mut self, digit: char) -> bool {
        match digit.to_digit(10) {
            Some(d) if (u32::from(self.min)..=u32::from(self.max)).contains(&d) => {
                // d <= max <= u8::MAX
                self.values[self.selected] = u8::try_from(d).unwrap_or(self.max);
                true
            }
            _ => false,
        }
    }
}

/// WHO-5 questionnaire form (answers 0 to 5, starting at 0)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Who5Form {
    items: BoundedItems,
}

impl Default for Who5Form {
    fn default() -> Self {
        Self {
            items: BoundedItems::new(0, 0, WHO5_MAX_ANSWER),
        }
    }
}

impl Who5Form {
    /// Fresh form
    pub fn new() -> Self {
        Self::default()
    }

    /// Questions with their current answers
    pub fn rows(&self) -> impl Iterator<Item = (&'static str, u8)> + '_ {
        WHO5_QUESTIONS.into_iter().zip(self.items.values)
    }

    /// Index of the highlighted question
    pub fn selected(&self) -> usize {
        self.items.selected
    }

    /// Highlight the next question
    pub fn select_next(&mut self) {
        self.items.select_next();
    }

    /// Highlight the previous question
    pub fn select_previous(&mut self) {
        self.items.select_previous();
    }

    /// Raise the highlighted answer
    pub fn increment(&mut self) {
        self.items.increment();
    }

    /// Lower the highlighted answer
    pub fn decrement(&mut self) {
        self.items.decrement();
    }

    /// Set the highlighted answer from a digit key
    pub fn set_digit(&mut self, digit: char) -> bool {
        self.items.set_digit(digit)
    }

    /// Answers to submit
    pub fn answers(&self) -> [u8; 5] {
        self.items.values
    }
}

/// Mood tracker form (ratings 1 to 5, starting at 3)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoodForm {
    items: BoundedItems,
}

impl Default for MoodForm {
    fn default() -> Self {
        Self {
            items: BoundedItems::new(MOOD_DEFAULT, MOOD_MIN, MOOD_MAX),
        }
    }
}

impl MoodForm {
    /// Fresh form
    pub fn new() -> Self {
        Self::default()
    }

    /// Mood names with their current ratings
    pub fn rows(&self) -> impl Iterator<Item = (&'static str, u8)> + '_ {
        MOOD_NAMES.into_iter().zip(self.items.values)
    }

    /// Index of the highlighted mood
    pub fn selected(&self) -> usize {
        self.items.selected
    }

    /// Highlight the next mood
    pub fn select_next(&mut self) {
        self.items.select_next();
    }

    /// Highlight the previous mood
    pub fn select_previous(&mut self) {
        self.items.select_previous();
    }

    /// Raise the highlighted rating
    pub fn increment(&mut self) {
        self.items.increment();
    }

    /// Lower the highlighted rating
    pub fn decrement(&mut self) {
        self.items.decrement();
    }

    /// Set the highlighted rating from a digit key
    pub fn set_digit(&mut self, digit: char) -> bool {
        self.items.set_digit(digit)
    }

    /// Ratings to save
    pub fn ratings(&self) -> MoodRatings {
        MoodRatings::from_array(self.items.values)
    }
}
