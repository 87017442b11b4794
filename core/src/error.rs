//! Error types for the snipe-core library.

use thiserror::Error;

/// Result type alias for snipe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving ports and inspecting processes.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to execute a system command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// Failed to parse command output.
    #[error("Failed to parse output: {0}")]
    ParseError(String),

    /// Nothing matched. Resolution strategies use this to hand over to the next fallback.
    #[error("not found: {0}")]
    NotFound(String),

    /// A required external tool is missing.
    #[error("{0}")]
    ToolUnavailable(String),

    /// A port argument is not a valid port.
    #[error("invalid port: {0}")]
    InvalidPort(String),

    /// A port number outside 1-65535.
    #[error("port out of range: {0}")]
    PortOutOfRange(i64),

    /// A port range argument is reversed or malformed.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// A port range argument spans too many ports.
    #[error("range too large (max {max}): {arg}")]
    RangeTooLarge { arg: String, max: u16 },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error only means "nothing here", as opposed to a real failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Errors that can occur while delivering a termination signal.
#[derive(Debug, Error)]
pub enum KillError {
    /// The specified process was not found
    #[error("Process with PID {0} not found")]
    ProcessNotFound(u32),

    /// Permission denied to kill the process
    #[error("Permission denied to kill process {0}")]
    PermissionDenied(u32),

    /// The pid cannot address a single process (0, or beyond the platform range)
    #[error("Invalid PID {0}")]
    InvalidPid(u32),

    /// Failed to execute the kill command
    #[error("Failed to execute kill command: {0}")]
    CommandFailed(String),

    /// The process could not be terminated
    #[error("Failed to terminate process {0}: {1}")]
    TerminationFailed(u32, String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kill_error_display() {
        let err = KillError::ProcessNotFound(1234);
        assert!(err.to_string().contains("1234"));

        let err = KillError::PermissionDenied(5678);
        assert!(err.to_string().contains("5678"));

        let err = KillError::CommandFailed("test error".to_string());
        assert!(err.to_string().contains("test error"));
    }

    #[test]
    fn test_range_error_display() {
        let err = Error::RangeTooLarge {
            arg: "1-500".to_string(),
            max: 100,
        };
        assert_eq!(err.to_string(), "range too large (max 100): 1-500");
        assert_eq!(Error::PortOutOfRange(70000).to_string(), "port out of range: 70000");
    }

    #[test]
    fn test_not_found_classification() {
        assert!(Error::NotFound("port 3000".into()).is_not_found());
        assert!(!Error::CommandFailed("lsof".into()).is_not_found());
    }
}
