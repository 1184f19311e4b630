use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("containing directory missing or not writable: {0}")]
    ParentDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the directory that will contain `target` exists; create if missing.
fn ensure_parent_dir(target: &Path) -> Result<(), PersistError> {
    let Some(dir) = target.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::ParentDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::ParentDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::ParentDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write `content` to `target` by writing a temp file in the
/// same directory and renaming it into place.
pub fn atomic_write(target: &Path, content: &str) -> Result<(), PersistError> {
    ensure_parent_dir(target)?;

    let dir = target.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new_in(".")?,
    };
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    // Replace existing file if present to keep determinism.
    if target.exists() {
        fs::remove_file(target)?;
    }
    tmp.persist(target).map_err(|e| PersistError::Io(e.error))?;
    Ok(())
}
