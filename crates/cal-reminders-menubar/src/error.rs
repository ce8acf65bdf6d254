//! Menu-bar binary error types.

use std::fmt;

use cal_reminders_eventkit::SourceError;

/// Result type for menu-bar operations.
pub type MenubarResult<T> = Result<T, MenubarError>;

/// Errors that can occur in the menu-bar binary.
#[derive(Debug)]
pub enum MenubarError {
    /// Configuration error.
    Config(String),
    /// Calendar source error.
    Source(SourceError),
    /// IO error.
    Io(std::io::Error),
    /// Action failed (open, copy, osascript, signal).
    Action(String),
    /// Pidfile error (another instance running, unwritable path).
    Pidfile(String),
}

impl fmt::Display for MenubarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Source(err) => write!(f, "calendar source error: {}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Action(msg) => write!(f, "action failed: {}", msg),
            Self::Pidfile(msg) => write!(f, "pidfile error: {}", msg),
        }
    }
}

impl std::error::Error for MenubarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MenubarError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<SourceError> for MenubarError {
    fn from(err: SourceError) -> Self {
        Self::Source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = MenubarError::Config("bad value for refresh_interval_seconds".into());
        assert_eq!(
            err.to_string(),
            "configuration error: bad value for refresh_interval_seconds"
        );

        let err = MenubarError::Action("no running instance".into());
        assert_eq!(err.to_string(), "action failed: no running instance");
    }

    #[test]
    fn source_errors_keep_their_cause() {
        use std::error::Error;

        let err = MenubarError::from(SourceError::script("exit status 1"));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("exit status 1"));
    }
}
