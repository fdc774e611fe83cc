//! Common file system operations with unified durability handling

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Write a file atomically: temp sibling in the same directory, then rename
/// over the target
///
/// A crash between the two steps leaves the original untouched; readers only
/// ever observe the old or the new contents, never a partial write. Parent
/// directories are created as needed.
pub fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
