//! File locking and atomic writes for the task store
//!
//! - Advisory exclusive lock (fs2/flock) on `<data file>.lock`, held by a
//!   server for as long as it owns the data file
//! - Atomic replace: temp file in the target's directory, fsync, close, rename

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Error, Result};

/// Prefix of the temporary files written next to the target.
const TEMP_PREFIX: &str = ".tasks-";
const TEMP_SUFFIX: &str = ".tmp";

fn is_lock_contended(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }

    // On Windows, fs2/libc can surface lock/sharing violations as "Other".
    #[cfg(windows)]
    {
        matches!(err.raw_os_error(), Some(32) | Some(33))
    }
    #[cfg(not(windows))]
    {
        false
    }
}

/// Path of the lock file guarding `data_path`.
pub fn lock_path_for(data_path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.lock", data_path.display()))
}

/// A file lock guard that releases the lock when dropped
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Take an exclusive lock on `path` without waiting
    ///
    /// The lock file (and its parent directory) is created if missing.
    /// Returns `Ok(None)` while another handle holds the lock.
    pub fn try_acquire(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        let file = open_lock_file(path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(FileLock {
                file,
                path: path.to_path_buf(),
            })),
            Err(e) if is_lock_contended(&e) => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Get the path to the locked file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn open_lock_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    Ok(OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?)
}

/// Atomically replace `path` with `data`
///
/// Writes a temporary file in the same directory as `path`, syncs and
/// closes it, then renames it over `path`. The rename is the only step that
/// touches `path`, so readers see either the old or the new contents.
/// On any failure the temporary file is removed and `path` is untouched.
///
/// The parent directory must already exist.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;

    // Closes the handle; the TempPath still deletes the file if dropped.
    let temp_path = temp.into_temp_path();
    temp_path.persist(path).map_err(|e| Error::Io(e.error))?;

    Ok(())
}
