//! Fault classification and reporting for pipeline stages.

use std::fmt;

/// Errors raised while processing a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum StageError {
    /// The frame (or one line of it) is lost; the loop keeps going.
    Recoverable(String),
    /// A stage could not be (re)configured.
    Fatal(String),
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::Recoverable(msg) => write!(f, "Recoverable error: {}", msg),
            StageError::Fatal(msg) => write!(f, "Fatal error: {}", msg),
        }
    }
}

impl std::error::Error for StageError {}

/// Trait for reporting stage errors.
pub trait ErrorReporter: Send + Sync {
    /// Reports an error from a stage.
    fn report(&self, stage: &str, error: &StageError);
}

/// Reporter that forwards to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, stage: &str, error: &StageError) {
        match error {
            StageError::Recoverable(_) => log::warn!("[{}] {}", stage, error),
            StageError::Fatal(_) => log::error!("[{}] {}", stage, error),
        }
    }
}
