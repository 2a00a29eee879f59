//! Architecture guard tests for the whatif workspace.
//!
//! These tests scan source files to enforce design-level consistency:
//! - Error types use thiserror, no hand-written Display
//! - No `Result<_, String>` (or `type Err = String`) in whatif-core
//! - Shared state uses parking_lot, never std locks
//! - Library code logs through tracing, never stdout
//! - File size limits
//!
//! Run: `cargo test --package whatif-core --test architecture_guards -- --nocapture`

use std::fs;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Walk `dir` recursively, collecting .rs files that pass `filter`.
fn collect_rs_files(dir: &Path, filter: &dyn Fn(&Path) -> bool) -> Vec<PathBuf> {
    let mut result = Vec::new();
    if !dir.exists() {
        return result;
    }
    for entry in walkdir(dir) {
        if entry.extension().is_some_and(|e| e == "rs") && filter(&entry) {
            result.push(entry);
        }
    }
    result
}

fn walkdir(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(walkdir(&path));
            } else {
                files.push(path);
            }
        }
    }
    files
}

/// Return the workspace root (two levels up from whatif-core/tests/).
fn workspace_root() -> PathBuf {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")); // crates/whatif-core
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("cannot determine workspace root")
        .to_path_buf()
}

fn is_test_file(path: &Path) -> bool {
    let s = path.to_string_lossy();
    s.contains("/tests/") || s.ends_with("/tests.rs") || s.ends_with("_test.rs")
}

fn rel(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// Non-comment lines of every non-test source file under `dir`
fn scan_lines(dir: &Path, root: &Path, check: &dyn Fn(&str) -> bool) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir, &|p| !is_test_file(p)) {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        let relative = rel(&file, root);
        // unit test modules sit at the end of the file
        let body = content.split("#[cfg(test)]\nmod tests").next().unwrap_or("");
        for (i, line) in body.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with("//") || trimmed.starts_with('*') {
                continue;
            }
            if check(trimmed) {
                violations.push(format!("  {}:{} -> {}", relative, i + 1, trimmed));
            }
        }
    }
    violations
}

fn fail(rule: &str, hint: &str, violations: &[String]) {
    if !violations.is_empty() {
        panic!("\n[{rule}] {hint}\n\n{}\n", violations.join("\n"));
    }
}

// ---------------------------------------------------------------------------
// RS-ERR-01: Error types must use thiserror, no hand-written Display
// ---------------------------------------------------------------------------

#[test]
fn test_error_types_use_thiserror() {
    let root = workspace_root();
    let violations = scan_lines(&root.join("crates"), &root, &|line| {
        line.starts_with("impl")
            && line
                .split("Display for ")
                .nth(1)
                .and_then(|rest| rest.split_whitespace().next())
                .is_some_and(|ty| ty.ends_with("Error"))
    });
    fail(
        "RS-ERR-01",
        "Hand-written Display for Error types detected. Use #[derive(thiserror::Error)] instead.",
        &violations,
    );
}

// ---------------------------------------------------------------------------
// RS-ERR-02: No Result<_, String> in whatif-core (use WhatIfError)
// ---------------------------------------------------------------------------

#[test]
fn test_no_result_string_in_core() {
    let root = workspace_root();
    let violations = scan_lines(&root.join("crates/whatif-core/src"), &root, &|line| {
        let string_result = line.find("Result<").is_some_and(|pos| {
            let after = &line[pos..];
            after.contains(", String>") || after.contains(",String>")
        });
        // FromStr impls spell the same thing through an associated type
        string_result || line.starts_with("type Err = String")
    });
    fail(
        "RS-ERR-02",
        "Result<_, String> found in whatif-core. Use WhatIfResult instead.",
        &violations,
    );
}

// ---------------------------------------------------------------------------
// RS-SYNC-01: Bucket, cache and monitor locks come from parking_lot
// ---------------------------------------------------------------------------

#[test]
fn test_no_std_locks_in_core() {
    let root = workspace_root();
    let violations = scan_lines(&root.join("crates/whatif-core/src"), &root, &|line| {
        line.contains("std::sync::Mutex")
            || line.contains("std::sync::RwLock")
            || (line.starts_with("use std::sync::{") && (line.contains("Mutex") || line.contains("RwLock")))
    });
    fail(
        "RS-SYNC-01",
        "std::sync locks found in whatif-core. Use parking_lot::Mutex.",
        &violations,
    );
}

// ---------------------------------------------------------------------------
// RS-LOG-01: Library code logs through tracing
// ---------------------------------------------------------------------------

#[test]
fn test_no_stdout_in_core() {
    let root = workspace_root();
    let violations = scan_lines(&root.join("crates/whatif-core/src"), &root, &|line| {
        line.contains("println!") || line.contains("eprintln!") || line.contains("dbg!(")
    });
    fail(
        "RS-LOG-01",
        "Direct console output found in whatif-core. Use tracing macros.",
        &violations,
    );
}

// ---------------------------------------------------------------------------
// RS-SIZE-01: File size limits (500 lines for non-test files)
// ---------------------------------------------------------------------------

#[test]
fn test_file_size_limits() {
    const MAX_LINES: usize = 500;

    let root = workspace_root();
    let mut violations = Vec::new();
    for file in collect_rs_files(&root.join("crates"), &|p| !is_test_file(p)) {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        let line_count = content.lines().count();
        if line_count > MAX_LINES {
            violations.push(format!("  {} ({} lines)", rel(&file, &root), line_count));
        }
    }
    fail(
        "RS-SIZE-01",
        &format!("Files exceeding {MAX_LINES} lines (split into submodules):"),
        &violations,
    );
}
