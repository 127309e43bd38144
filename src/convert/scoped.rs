use std::path::{Path, PathBuf};

use log::debug;

/// Removes an intermediate file when dropped.
///
/// Removal is best effort. Errors are logged and ignored.
#[derive(Debug)]
pub struct ScopedFile {
    path: PathBuf,
    remove: bool,
}

impl ScopedFile {
    /// Creates a guard for `path`. The file is only removed if `remove` is
    /// set.
    pub fn new(path: impl Into<PathBuf>, remove: bool) -> ScopedFile {
        Self {
            path: path.into(),
            remove,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScopedFile {
    fn drop(&mut self) {
        if !self.remove || !self.path.exists() {
            return;
        }

        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("removed {}", self.path.display()),
            Err(e) => debug!("could not remove {}: {e}", self.path.display()),
        }
    }
}
