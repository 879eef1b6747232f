use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("directory {path} unusable: {reason}")]
    Dir { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Creates `dir` if needed and checks a file can be created in it.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    let unusable = |reason: String| PersistError::Dir {
        path: dir.to_path_buf(),
        reason,
    };
    if dir.exists() && !dir.is_dir() {
        return Err(unusable("not a directory".into()));
    }
    fs::create_dir_all(dir).map_err(|e| unusable(e.to_string()))?;
    NamedTempFile::new_in(dir).map_err(|e| unusable(e.to_string()))?;
    Ok(())
}

/// Writes `contents` to `dir/filename` through a temp file and rename, so a
/// reader never sees a half-written file.
pub fn write_atomic(dir: &Path, filename: &str, contents: &[u8]) -> Result<PathBuf, PersistError> {
    ensure_dir(dir)?;
    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
    Ok(target)
}
