//! Backends for the `ls` and `read_file` tools.
//!
//! Both functions return the final response text directly: every failure —
//! an out-of-root path, a missing entry, an I/O error — has already been
//! absorbed into a message by the time the dispatcher sees the result. Tool
//! failures are soft by contract; only the protocol layer can fail harder.

use std::path::Path;

use crate::project::guard::PathGuard;

/// Fixed text for paths the guard refuses.
pub const INVALID_PATH: &str = "error: invalid path (escapes the project root)";

/// Lists the direct children of a directory inside the project.
///
/// Directory entries get a trailing `/`; entries appear in the underlying
/// enumeration order, which is not guaranteed to be sorted.
#[must_use]
pub fn list_directory(guard: &PathGuard, path: &str) -> String {
    let Ok(full_path) = guard.resolve(path) else {
        return INVALID_PATH.to_string();
    };

    if !full_path.is_dir() {
        return format!("error: directory not found: {path}");
    }

    match read_entries(&full_path) {
        Ok(entries) => entries.join("\n"),
        Err(e) => format!("error: {e}"),
    }
}

fn read_entries(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let mut name = entry.file_name().to_string_lossy().into_owned();
        // Follows symlinks: a link to a directory is marked as one
        if entry.path().is_dir() {
            name.push('/');
        }
        entries.push(name);
    }
    Ok(entries)
}

/// Reads the full contents of a file inside the project, unmodified.
#[must_use]
pub fn read_file(guard: &PathGuard, path: &str) -> String {
    let Ok(full_path) = guard.resolve(path) else {
        return INVALID_PATH.to_string();
    };

    if !full_path.is_file() {
        return format!("error: file not found: {path}");
    }

    match std::fs::read_to_string(&full_path) {
        Ok(contents) => contents,
        Err(e) => format!("error: {e}"),
    }
}
