//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code in the TUI and the companion core MUST NOT call sleep methods.
//! **Exceptions**: Frame rate limiting in the TUI event loop, test code.
//!
//! Waiting on the assistant is bounded by `tokio::time::timeout`, never by sleeping.

use std::path::Path;

use architectural_enforcement::{code_part, production_lines, rust_files, PRODUCTION_DIRS};

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Sleep calls found in production code!\n");

        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }

        eprintln!("\n✅ ACCEPTABLE sleep uses:");
        eprintln!("  - Frame rate limiting in the TUI event loop");
        eprintln!("  - Test code");
        eprintln!("\n❌ FORBIDDEN:");
        eprintln!("  - Sleep in polling loops");
        eprintln!("  - Sleep as poor man's synchronization");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

fn find_sleep_violations() -> Vec<String> {
    let mut violations = Vec::new();

    for dir in PRODUCTION_DIRS {
        for path in rust_files(dir) {
            let lines = production_lines(&path);

            for (idx, line) in lines.iter().enumerate() {
                let code = code_part(line);
                if !(code.contains("::sleep(") || code.contains(".sleep(")) {
                    continue;
                }

                if is_tui_app(&path) && is_frame_limiting_context(&lines, idx) {
                    continue;
                }

                violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
            }
        }
    }

    violations
}

fn is_tui_app(path: &Path) -> bool {
    path.ends_with("tui/src/app.rs")
}

/// Check if sleep is used for frame rate limiting (acceptable in the TUI)
fn is_frame_limiting_context(lines: &[String], current_idx: usize) -> bool {
    let context_range = current_idx.saturating_sub(10)..std::cmp::min(current_idx + 5, lines.len());

    lines[context_range].iter().any(|line| {
        let line = line.to_lowercase();
        line.contains("frame") || line.contains("fps") || line.contains("tick_rate")
    })
}

#[test]
fn test_frame_limiting_detection() {
    let lines: Vec<String> = [
        "let frame_duration = Duration::from_millis(100);",
        "_ = tokio::time::sleep(frame_duration) => {}",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect();
    assert!(is_frame_limiting_context(&lines, 1));
}
