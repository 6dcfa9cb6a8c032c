mod adhoc;
mod driver;
mod invalid_connection_url;
mod invalid_table_name;
mod io;
mod path_collision;
mod redcap;
mod task_failed;

use adhoc::AdhocError;
use driver::DriverError;
use invalid_connection_url::InvalidConnectionUrl;
use invalid_table_name::InvalidTableName;
use io::IoError;
use path_collision::PathCollision;
use redcap::RedcapError;
use std::sync::Arc;
use task_failed::TaskFailed;

/// Returns early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error raised while extracting or emitting a data model.
///
/// A single pointer wide. Cloning shares the underlying error, which lets one
/// failure be reported by a task and still be returned by its coordinator.
#[derive(Clone)]
pub struct Error {
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

#[derive(Debug)]
enum ErrorKind {
    Adhoc(AdhocError),
    Driver(DriverError),
    Io(IoError),
    InvalidConnectionUrl(InvalidConnectionUrl),
    InvalidTableName(InvalidTableName),
    PathCollision(PathCollision),
    Redcap(RedcapError),
    TaskFailed(TaskFailed),
}

impl Error {
    /// Wraps this error in `consequent`, which is displayed first.
    ///
    /// `consequent` is usually an [`err!`](crate::err) describing the step
    /// that failed, e.g. `emitting table `users``.
    pub fn context(self, consequent: Error) -> Error {
        let ErrorInner { kind, cause } = match Arc::try_unwrap(consequent.inner) {
            Ok(inner) => inner,
            Err(shared) => ErrorInner {
                kind: ErrorKind::Adhoc(AdhocError::new(shared.kind.to_string())),
                cause: shared.cause.clone(),
            },
        };

        // Keep the consequent's own chain above this error.
        let cause = match cause {
            Some(existing) => existing.context(self),
            None => self,
        };

        Error {
            inner: Arc::new(ErrorInner {
                kind,
                cause: Some(cause),
            }),
        }
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        std::iter::successors(Some(self), |err| err.inner.cause.as_ref())
    }

    fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Arc::new(ErrorInner { kind, cause: None }),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Driver(err) => Some(err),
            ErrorKind::Io(err) => Some(err),
            ErrorKind::TaskFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Adhoc(err) => std::fmt::Display::fmt(err, f),
            ErrorKind::Driver(err) => std::fmt::Display::fmt(err, f),
            ErrorKind::Io(err) => std::fmt::Display::fmt(err, f),
            ErrorKind::InvalidConnectionUrl(err) => std::fmt::Display::fmt(err, f),
            ErrorKind::InvalidTableName(err) => std::fmt::Display::fmt(err, f),
            ErrorKind::PathCollision(err) => std::fmt::Display::fmt(err, f),
            ErrorKind::Redcap(err) => std::fmt::Display::fmt(err, f),
            ErrorKind::TaskFailed(err) => std::fmt::Display::fmt(err, f),
        }
    }
}

/// Renders the chain outermost first: `emitting table `users`: I/O error at ...`.
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, err) in self.chain().enumerate() {
            if i > 0 {
                f.write_str(": ")?;
            }
            std::fmt::Display::fmt(err.kind(), f)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            f.debug_struct("Error")
                .field("kind", &self.inner.kind)
                .field("cause", &self.inner.cause)
                .finish()
        } else {
            std::fmt::Display::fmt(self, f)
        }
    }
}
