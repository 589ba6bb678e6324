//! Theme and Colors
//!
//! The companion's palette: calm greens and blues, with warm accents kept
//! for warnings and crisis notices.

use ratatui::style::{Color, Modifier, Style};

use companion_core::{CompanionState, ContentType, NotifyLevel};

use crate::display::DisplayRole;

// ============================================================================
// UI Colors
// ============================================================================

/// Companion's signature teal (for text/accents)
pub const COMPANION_TEAL: Color = Color::Rgb(94, 196, 182);

/// User input green
pub const USER_GREEN: Color = Color::Rgb(130, 220, 130);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Fades at the edge of scrolled content
pub const FADE_DARK: Color = Color::Rgb(80, 80, 80);

/// Second fade step
pub const FADE_LIGHT: Color = Color::Rgb(120, 120, 120);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Warning amber
pub const WARNING_AMBER: Color = Color::Rgb(255, 196, 90);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Calm blue for info notices and chart bars
pub const CALM_BLUE: Color = Color::Rgb(100, 180, 255);

// ============================================================================
// Styles
// ============================================================================

/// Style for a chat line by sender and content type
pub fn message_style(role: DisplayRole, content_type: &ContentType) -> Style {
    match (role, content_type) {
        (_, ContentType::Error) => Style::default().fg(ERROR_RED),
        (DisplayRole::User, _) => Style::default().fg(USER_GREEN),
        (DisplayRole::Assistant, ContentType::Canned) => {
            Style::default().fg(COMPANION_TEAL).add_modifier(Modifier::ITALIC)
        }
        (DisplayRole::Assistant, _) => Style::default().fg(COMPANION_TEAL),
        (DisplayRole::System, _) => Style::default().fg(Color::DarkGray),
    }
}

/// Style for a notice
pub fn notice_style(level: NotifyLevel) -> Style {
    let color = match level {
        NotifyLevel::Info => CALM_BLUE,
        NotifyLevel::Warning => WARNING_AMBER,
        NotifyLevel::Error => ERROR_RED,
        NotifyLevel::Success => SUCCESS_GREEN,
    };
    Style::default().fg(color)
}

/// Style for the status bar
pub fn status_style(state: CompanionState) -> Style {
    match state {
        CompanionState::Initializing | CompanionState::Thinking | CompanionState::Saving => {
            Style::default().fg(COMPANION_TEAL)
        }
        _ => Style::default().fg(Color::DarkGray),
    }
}

/// Highlighted row in a form or list
pub fn selected_style() -> Style {
    Style::default()
        .fg(COMPANION_TEAL)
        .add_modifier(Modifier::BOLD)
}
