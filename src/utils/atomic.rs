//! Atomic file writes
//!
//! The store file must never be observable in a half-written state, even if
//! the process dies mid-save.
//!
//! # Pattern
//!
//! 1. Write the full content to a temporary file (.tmp)
//! 2. Call sync_all() to flush to disk
//! 3. Rename the temp file over the final path (atomic on most filesystems)
//!
//! A crash therefore leaves either the old version or the new version on
//! disk, never a partial one.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Atomically replace the file at `path` with `content`.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;

    // Sync to disk (ensure data is durable)
    file.sync_all()?;

    // Atomic rename
    fs::rename(&temp_path, path)?;

    Ok(())
}
