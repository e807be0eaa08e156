//! Destination path classification
//!
//! Maps a source file to `<dest_root>/<extension>/<file name>`. Pure path
//! arithmetic, no I/O.

use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Where a source file lands in the destination tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationSpec {
    /// Destination root joined with the extension name
    pub subdir: PathBuf,
    /// Base name of the source file
    pub file_name: OsString,
}

impl DestinationSpec {
    /// Full destination path of the file
    pub fn path(&self) -> PathBuf {
        self.subdir.join(&self.file_name)
    }
}

/// Lowercased extension of the file's base name, without the dot.
///
/// Empty when the name has no extension (`README`, `.bashrc`). Extensions
/// that are not valid UTF-8 keep their raw bytes; only ASCII letters are
/// lowercased there.
pub fn extension_name(path: &Path) -> OsString {
    match path.extension() {
        Some(ext) => match ext.to_str() {
            Some(ext) => OsString::from(ext.to_lowercase()),
            None => lowercase_raw(ext),
        },
        None => OsString::new(),
    }
}

#[cfg(unix)]
fn lowercase_raw(ext: &OsStr) -> OsString {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};
    OsString::from_vec(ext.as_bytes().to_ascii_lowercase())
}

#[cfg(not(unix))]
fn lowercase_raw(ext: &OsStr) -> OsString {
    OsString::from(ext.to_string_lossy().to_lowercase())
}

/// Classify `source` under `dest_root`.
///
/// An empty extension joins as an empty component, which places the file
/// directly in `dest_root`.
pub fn classify(source: &Path, dest_root: &Path) -> DestinationSpec {
    classify_with(source, dest_root, None)
}

/// Classify `source`, routing extension-less files into `no_extension_dir`
/// when one is given.
pub fn classify_with(source: &Path, dest_root: &Path, no_extension_dir: Option<&str>) -> DestinationSpec {
    let ext = extension_name(source);
    let bucket = match no_extension_dir {
        Some(name) if ext.is_empty() => OsStr::new(name),
        _ => ext.as_os_str(),
    };

    let file_name = source
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| source.as_os_str().to_os_string());

    DestinationSpec {
        subdir: dest_root.join(bucket),
        file_name,
    }
}
