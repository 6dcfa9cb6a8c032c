use super::Error;

/// Error when two distinct table identifiers would be written to the same directory.
#[derive(Debug)]
pub(super) struct PathCollision {
    first: Box<str>,
    second: Box<str>,
}

impl std::error::Error for PathCollision {}

impl core::fmt::Display for PathCollision {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "tables `{}` and `{}` map to the same output directory",
            self.first, self.second
        )
    }
}

impl Error {
    /// Creates a path collision error between two table identifiers.
    pub fn path_collision(first: impl Into<String>, second: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::PathCollision(PathCollision {
            first: first.into().into(),
            second: second.into().into(),
        }))
    }

    /// Returns `true` if this error is a path collision error.
    pub fn is_path_collision(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::PathCollision(_))
    }
}
