//! Snipe Core Library
//!
//! Finds the processes listening on a TCP port and terminates them.
//! Provides functionality to:
//! - Resolve a port to its owning pids through layered fallbacks
//! - Describe a process (command line and the file it runs)
//! - Kill a process forcefully, or gracefully with escalation
//! - Parse port arguments and read user configuration
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure business logic and data models
//! - `ports`: Trait definitions (interfaces)
//! - `adapters`: Operating system implementations
//! - `application`: Use case services
//!
//! # Platform Support
//! - macOS/BSD: Uses `lsof` and `ps`
//! - Linux: Uses `lsof`, then `ss`, then `/proc`
//! - Windows: Uses `netstat`, `wmic`, `tasklist` and the Win32 API

// Hexagonal architecture layers
pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub mod config;
pub mod error;

// Re-export domain types (primary API)
pub use domain::{
    extract_path, looks_like_file, parse_pid_list, parse_ports, Listener, Pid, ProcessInfo,
    UNKNOWN,
};

// Re-export other commonly used types
pub use adapters::{check_dependencies, KillTimings};
pub use application::{PlatformSnipeService, SnipeService};
pub use config::{Config, ConfigStore};
pub use error::{Error, KillError, Result};
