//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No sleep() calls in production code
//! - Async I/O inside async functions
//! - No UI dependencies in the companion core
//!
//! The helpers here scan workspace sources line by line. Everything after a
//! file's `#[cfg(test)]` marker is treated as test code and skipped.

use std::fs;
use std::path::{Path, PathBuf};

/// Production source directories, relative to the workspace root
pub const PRODUCTION_DIRS: &[&str] = &["companion/core/src", "tui/src"];

/// Workspace root (two levels above this package)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// All `.rs` files under `dir` (relative to the workspace root)
///
/// # Panics
///
/// Panics if the directory is missing, so a moved crate cannot make a scan
/// pass vacuously.
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    assert!(path.exists(), "source directory not found: {}", path.display());

    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Lines of a file up to its test module
pub fn production_lines(path: &Path) -> Vec<String> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };

    content
        .lines()
        .take_while(|line| line.trim() != "#[cfg(test)]")
        .map(str::to_string)
        .collect()
}

/// Strip a trailing `//` comment
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// Kind of the function enclosing a line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnclosingFn {
    /// Inside an `async fn`
    Async,
    /// Inside a plain `fn`
    Sync,
    /// Module level
    None,
}

/// Find the nearest function declaration above `current_idx`
pub fn enclosing_fn<S: AsRef<str>>(lines: &[S], current_idx: usize) -> EnclosingFn {
    for line in lines[..=current_idx.min(lines.len().saturating_sub(1))]
        .iter()
        .rev()
    {
        let decl = line
            .as_ref()
            .trim()
            .trim_start_matches("pub(crate) ")
            .trim_start_matches("pub ");

        if decl.starts_with("async fn ") {
            return EnclosingFn::Async;
        }
        if decl.starts_with("fn ") {
            return EnclosingFn::Sync;
        }
    }
    EnclosingFn::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_async_function_detection() {
        let code = [
            "pub async fn bad_function() {",
            "    let contents = std::fs::read_to_string(\"file.txt\")?;",
            "}",
        ];
        assert_eq!(enclosing_fn(&code, 1), EnclosingFn::Async);
    }

    #[test]
    fn test_non_async_function_detection() {
        let code = [
            "fn main() {",
            "    let contents = std::fs::read_to_string(\"config.toml\")?;",
            "}",
        ];
        assert_eq!(enclosing_fn(&code, 1), EnclosingFn::Sync);
    }

    #[test]
    fn test_module_level_detection() {
        let code = ["use std::fs;"];
        assert_eq!(enclosing_fn(&code, 0), EnclosingFn::None);
    }

    #[test]
    fn test_comment_stripped() {
        assert_eq!(code_part("let x = 1; // std::fs"), "let x = 1; ");
    }

    #[test]
    fn test_production_dirs_exist() {
        for dir in PRODUCTION_DIRS {
            assert!(!rust_files(dir).is_empty(), "{dir} has no sources");
        }
    }
}
