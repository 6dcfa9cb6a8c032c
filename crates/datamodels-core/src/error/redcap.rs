use super::Error;

/// Error payload returned by a REDCap API.
#[derive(Debug)]
pub(super) struct RedcapError {
    message: Box<str>,
}

impl std::error::Error for RedcapError {}

impl core::fmt::Display for RedcapError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "REDCap API error: {}", self.message)
    }
}

impl Error {
    /// Creates an error from a REDCap API error message.
    pub fn redcap(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Redcap(RedcapError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a REDCap API error.
    pub fn is_redcap(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Redcap(_))
    }
}
