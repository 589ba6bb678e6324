//! Wellness TUI - Terminal interface for the wellness companion
//!
//! A full-screen terminal UI with six views: chat, WHO-5, mood tracker,
//! helplines, history and a guessing game.
//!
//! # Architecture
//!
//! - **App**: Event loop, key mapping and per-view rendering
//! - **CompanionClient**: Embeds the headless companion core
//! - **Display**: State derived from companion messages
//! - **Forms**: WHO-5 and mood form editing
//! - **Widgets**: Borderless scrollable text blocks

pub mod app;
pub mod companion_client;
pub mod display;
pub mod forms;
pub mod theme;
pub mod widgets;

pub use app::{Action, App};
pub use companion_client::CompanionClient;
pub use display::DisplayState;
