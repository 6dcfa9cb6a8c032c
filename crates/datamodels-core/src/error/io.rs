use super::Error;
use std::path::{Path, PathBuf};

/// Filesystem error while resetting or writing the output tree.
#[derive(Debug)]
pub(super) struct IoError {
    path: PathBuf,
    source: std::io::Error,
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "I/O error at {}: {}", self.path.display(), self.source)
    }
}

impl Error {
    /// Creates a filesystem error for the given path.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Error {
        Error::from(super::ErrorKind::Io(IoError {
            path: path.as_ref().to_path_buf(),
            source,
        }))
    }

    /// Returns `true` if this error is a filesystem error.
    pub fn is_io(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Io(_))
    }
}
