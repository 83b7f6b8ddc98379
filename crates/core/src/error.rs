// Central Error Type for the Queue Store

use std::fmt;
use thiserror::Error;

/// Queue-level error type
#[derive(Error, Debug)]
pub enum QueueError {
    /// The job class has no queue selector, or the selector yielded nothing.
    #[error("No queue defined for job {job}")]
    NoQueue { job: String },

    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    /// Error raised by a job's `perform` or one of its hooks, passed through unmodified.
    #[error(transparent)]
    Job(anyhow::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QueueError {
    pub fn no_queue(job: impl Into<String>) -> Self {
        QueueError::NoQueue { job: job.into() }
    }

    /// The job error carried by this value, if it came from a job.
    pub fn as_job_error(&self) -> Option<&anyhow::Error> {
        match self {
            QueueError::Job(err) => Some(err),
            _ => None,
        }
    }

    /// The assertion failure carried by this value, if any.
    pub fn as_assertion(&self) -> Option<&AssertionFailure> {
        match self {
            QueueError::Assertion(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Result type alias using QueueError
pub type Result<T> = std::result::Result<T, QueueError>;

/// A queue assertion that did not hold.
///
/// The message is the whole observable surface: it names the job class, the
/// expected arguments (when given) and the queue, so a test failure can be
/// read without re-running anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    message: String,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AssertionFailure {}
