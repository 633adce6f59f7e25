// src/util.rs

use anyhow::{Context, Result};
use std::path::Path;

/// Read a UTF-8 file into a String with a clear error message.
///
/// This is mainly used for:
/// - code files passed to `exec`
/// - the console's `:code` command
pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file {:?}", path))
}

/// Ensure a directory exists (create it if missing).
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {:?}", path))
}

/// Write a string to a file, creating parent directories as needed.
///
/// This is used when:
/// - `generate --out` saves code to disk
/// - the console's `:save` command
pub fn write_string(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file {:?}", path))
}
