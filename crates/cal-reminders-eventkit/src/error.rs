//! Error types for calendar source operations.

use std::fmt;
use thiserror::Error;

/// The category of a source error.
///
/// This enum provides a high-level classification of errors so the app can
/// decide between the no-access state and keeping the previous display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorCode {
    /// Calendar access was denied by the user or by policy.
    AccessDenied,
    /// A script or permission request did not finish in time.
    Timeout,
    /// The bridge process could not be started or driven.
    Launch,
    /// The bridge script ran but reported a failure.
    Script,
    /// The bridge produced output that could not be parsed.
    InvalidOutput,
    /// A fixture file was missing or malformed.
    Fixture,
}

impl SourceErrorCode {
    /// Returns a stable lowercase name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessDenied => "access_denied",
            Self::Timeout => "timeout",
            Self::Launch => "launch",
            Self::Script => "script",
            Self::InvalidOutput => "invalid_output",
            Self::Fixture => "fixture",
        }
    }
}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while talking to a calendar source.
#[derive(Debug, Error)]
pub struct SourceError {
    /// The error code categorizing this error.
    code: SourceErrorCode,
    /// A human-readable message describing the error.
    message: String,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Creates a new source error with the given code and message.
    pub fn new(code: SourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates an access-denied error.
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::AccessDenied, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Timeout, message)
    }

    /// Creates a launch error.
    pub fn launch(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Launch, message)
    }

    /// Creates a script error.
    pub fn script(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Script, message)
    }

    /// Creates an invalid-output error.
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::InvalidOutput, message)
    }

    /// Creates a fixture error.
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Fixture, message)
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> SourceErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if this error means calendar access is unavailable.
    pub fn is_access_denied(&self) -> bool {
        self.code == SourceErrorCode::AccessDenied
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;
