//! Wellness TUI Entry Point
//!
//! Launches the terminal UI for the wellness companion.
//!
//! Usage:
//!   wellness-tui
//!
//! Configuration comes from `companion.toml` and `COMPANION_*` /
//! `GEMINI_API_KEY` environment variables. Logs go to
//! `$XDG_DATA_HOME/wellness-companion/wellness-tui.log`, filtered by `RUST_LOG`.

use std::io::{self, IsTerminal};
use std::panic;
use std::sync::Mutex;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use companion_core::{load_config, load_config_from_path, CompanionConfig};
use wellness_tui::App;

const LOG_FILE_NAME: &str = "wellness-tui.log";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: wellness-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  - Running in a non-interactive environment (CI, container)");
        eprintln!("  - SSH without -t flag");
        eprintln!("  - Piped stdin/stdout");
        std::process::exit(1);
    }

    // Log to a file so log lines never land on the alternate screen
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(log_writer()),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = resolve_config();

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(config);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;

    println!("\n\x1b[36mCompanion:\x1b[0m {}\n", app.goodbye());
    Ok(())
}

/// Load configuration, falling back to defaults + env on a bad file
fn resolve_config() -> CompanionConfig {
    match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Config file ignored: {}", e);
            load_config_from_path(None).unwrap_or_else(|e| {
                tracing::warn!("Environment config ignored: {}", e);
                CompanionConfig::default()
            })
        }
    }
}

/// Append-mode log file in the data dir, or a sink if it cannot be opened
fn log_writer() -> BoxMakeWriter {
    let Some(dir) = dirs::data_dir().map(|d| d.join("wellness-companion")) else {
        return BoxMakeWriter::new(io::sink);
    };

    let file = std::fs::create_dir_all(&dir).and_then(|()| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE_NAME))
    });

    match file {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(io::sink),
    }
}
