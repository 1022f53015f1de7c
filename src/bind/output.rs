//! Writing finished artifacts to the output directory.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::bind::errors::BindError;
use crate::bind::printer::Printer;

/// Ensure the output directory exists, creating it if necessary.
///
/// An existing directory is fine; a missing one is created with its
/// parents.
pub fn ensure_dir(path: &Path) -> Result<(), BindError> {
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|source| BindError::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Write `contents` to `dir/file_name`, replacing any previous file.
///
/// The file handle is closed before this returns, on success and on error.
pub fn write_artifact(dir: &Path, file_name: &str, contents: &Printer) -> Result<PathBuf, BindError> {
    let path = dir.join(file_name);
    {
        let mut file = File::create(&path).map_err(|source| BindError::CreateFile {
            path: path.clone(),
            source,
        })?;
        file.write_all(contents.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| BindError::WriteFile {
                path: path.clone(),
                source,
            })?;
    }
    tracing::debug!("wrote {} ({} bytes)", path.display(), contents.len());
    Ok(path)
}
