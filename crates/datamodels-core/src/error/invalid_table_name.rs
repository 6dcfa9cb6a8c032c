use super::Error;

/// Error when a table identifier cannot be used as an output directory name.
///
/// Table directories are named verbatim after the source identifier, so an
/// identifier must be a single, normal path component.
#[derive(Debug)]
pub(super) struct InvalidTableName {
    table: Box<str>,
    reason: Box<str>,
}

impl std::error::Error for InvalidTableName {}

impl core::fmt::Display for InvalidTableName {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid table name `{}`: {}", self.table, self.reason)
    }
}

impl Error {
    /// Creates an invalid table name error.
    pub fn invalid_table_name(table: impl Into<String>, reason: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidTableName(InvalidTableName {
            table: table.into().into(),
            reason: reason.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid table name error.
    pub fn is_invalid_table_name(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidTableName(_))
    }
}
