//! Process domain models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating-system process id.
///
/// A foreign handle into the OS process table: it may stop referring to a
/// live process at any moment after it was read.
pub type Pid = u32;

/// Rendering used for metadata that could not be read.
pub const UNKNOWN: &str = "-";

// ============================================================================
// ProcessInfo
// ============================================================================

/// Descriptive metadata for a single process, captured at lookup time.
///
/// Both fields are `None` when the corresponding data could not be read.
/// Use [`ProcessInfo::command_or_unknown`] and
/// [`ProcessInfo::file_path_or_unknown`] when rendering, so formatting code
/// never has to special-case missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    /// Full command line.
    pub command: Option<String>,
    /// Script or binary the command runs, absolute when it could be resolved.
    pub file_path: Option<String>,
}

impl ProcessInfo {
    /// Metadata for a process nothing could be read about.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Create from a command line and the path extracted from it.
    pub fn new(command: impl Into<String>, file_path: Option<String>) -> Self {
        Self {
            command: Some(command.into()),
            file_path,
        }
    }

    /// Whether no command line could be read.
    pub fn is_unknown(&self) -> bool {
        self.command.is_none()
    }

    /// Command line, or [`UNKNOWN`].
    pub fn command_or_unknown(&self) -> &str {
        self.command.as_deref().unwrap_or(UNKNOWN)
    }

    /// File path, or [`UNKNOWN`].
    pub fn file_path_or_unknown(&self) -> &str {
        self.file_path.as_deref().unwrap_or(UNKNOWN)
    }
}

impl fmt::Display for ProcessInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.command_or_unknown(),
            self.file_path_or_unknown()
        )
    }
}

// ============================================================================
// Listener
// ============================================================================

/// A process found listening on a port, with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listener {
    pub port: u16,
    pub pid: Pid,
    #[serde(flatten)]
    pub info: ProcessInfo,
}
