//! Integration Test: Headless Core
//!
//! **Policy**: The companion core has zero dependencies on ratatui, crossterm,
//! or any other UI framework. Surfaces depend on the core, never the reverse.

use std::fs;

use architectural_enforcement::{production_lines, rust_files, workspace_root};

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_ui_crates() {
    let manifest = fs::read_to_string(workspace_root().join("companion/core/Cargo.toml"))
        .expect("core manifest should be readable");

    for krate in UI_CRATES {
        assert!(
            !manifest.lines().any(|l| l.trim_start().starts_with(krate)),
            "companion-core must not depend on {krate}"
        );
    }
}

#[test]
fn test_core_sources_do_not_reference_ui_crates() {
    let mut violations = Vec::new();

    for path in rust_files("companion/core/src") {
        for (idx, line) in production_lines(&path).iter().enumerate() {
            if UI_CRATES
                .iter()
                .any(|k| line.contains(&format!("{k}::")) || line.contains(&format!("use {k}")))
            {
                violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "UI framework references in companion-core:\n{}",
        violations.join("\n")
    );
}
