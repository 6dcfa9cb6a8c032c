use super::Error;

/// A spawned emission or project task panicked or was aborted.
#[derive(Debug)]
pub(super) struct TaskFailed {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for TaskFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for TaskFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "task failed: {}", self.inner)
    }
}

impl Error {
    /// Creates an error for a task that did not run to completion.
    pub fn task_failed(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::TaskFailed(TaskFailed {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error is a task failure.
    pub fn is_task_failed(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TaskFailed(_))
    }
}
