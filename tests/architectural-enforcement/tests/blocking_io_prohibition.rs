//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: Async code in the TUI and the companion core MUST NOT use blocking I/O.
//! **Required**: Use `tokio::fs`, `tokio::net`, `tokio::process`, not `std::fs`, `std::net`, `std::process`
//!
//! Non-async functions (config loading, log file setup before the runtime
//! does real work) and test code are exempt.

use architectural_enforcement::{
    code_part, enclosing_fn, production_lines, rust_files, EnclosingFn, PRODUCTION_DIRS,
};

/// Test that async production code does not use blocking I/O
#[test]
fn test_no_blocking_io_in_production_code() {
    let violations = find_blocking_io_violations();

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Blocking I/O calls found in production code!\n");

        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }

        eprintln!("\n❌ FORBIDDEN blocking I/O:");
        eprintln!("  - std::fs::read(), std::fs::write(), std::fs::File");
        eprintln!("  - std::net::TcpStream, std::net::TcpListener");
        eprintln!("  - std::process::Command::output()");
        eprintln!("  - reqwest::blocking::*");
        eprintln!("\n✅ REQUIRED async I/O:");
        eprintln!("  - tokio::fs::read().await, tokio::fs::write().await");
        eprintln!("  - reqwest::Client::post().send().await");
        eprintln!("\n✅ ACCEPTABLE blocking I/O:");
        eprintln!("  - Non-async functions");
        eprintln!("  - Test code");

        panic!(
            "\nFound {} blocking I/O violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

/// Find all blocking I/O calls in production code
fn find_blocking_io_violations() -> Vec<String> {
    let mut violations = Vec::new();

    for dir in PRODUCTION_DIRS {
        for path in rust_files(dir) {
            let lines = production_lines(&path);

            for (idx, line) in lines.iter().enumerate() {
                let code = code_part(line);
                let kind = enclosing_fn(&lines, idx);

                // reqwest's blocking client is never acceptable
                if code.contains("reqwest::blocking") {
                    violations.push(format!(
                        "{}:{} - Blocking HTTP client: {}",
                        path.display(),
                        idx + 1,
                        line.trim()
                    ));
                    continue;
                }

                if kind == EnclosingFn::Sync {
                    continue;
                }

                let category = if code.contains("std::fs") {
                    Some("Blocking file I/O")
                } else if code.contains("std::net") {
                    Some("Blocking network I/O")
                } else if code.contains("std::process::Command") {
                    Some("Blocking process I/O")
                } else if code.contains("std::thread::sleep") {
                    Some("Blocking sleep")
                } else {
                    None
                };

                if let Some(category) = category {
                    violations.push(format!(
                        "{}:{} - {}: {}",
                        path.display(),
                        idx + 1,
                        category,
                        line.trim()
                    ));
                }
            }
        }
    }

    violations
}
