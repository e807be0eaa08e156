//! Async file system operations used by copy tasks
//!
//! Both operations are safe to call concurrently for the same target:
//! directory creation tolerates a racing creator and file copies overwrite.

use crate::error::{IoResultExt, Result, SortError};
use std::path::Path;

/// Create `dir` and any missing parents.
///
/// Succeeds when the directory already exists, including when another task
/// created it between our check and our call.
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir).await.with_path(dir)
}

/// Copy file contents and permissions from `source` to `dest`, replacing
/// any existing file. Returns the number of bytes copied.
///
/// Fails with `SameFile` when `dest` already is `source`; copying a file onto
/// itself would truncate it.
pub async fn copy_file(source: &Path, dest: &Path) -> Result<u64> {
    if is_same_file(source, dest).await? {
        return Err(SortError::SameFile(source.to_path_buf()));
    }
    tokio::fs::copy(source, dest).await.with_path(source)
}

/// True when both paths resolve to the same existing file
async fn is_same_file(source: &Path, dest: &Path) -> Result<bool> {
    let dest = match tokio::fs::canonicalize(dest).await {
        Ok(dest) => dest,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(SortError::io(dest, e)),
    };
    let source = tokio::fs::canonicalize(source).await.with_path(source)?;
    Ok(source == dest)
}
