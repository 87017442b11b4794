//! Domain layer - Pure business logic and data models.
//!
//! This module contains domain entities and the text heuristics that
//! interpret tool output. These have no I/O dependencies and can be
//! tested in isolation.

mod command_path;
mod pid_list;
mod port_args;
mod process;

// Re-export all domain types
pub use command_path::{extract_path, file_extension, looks_like_file, SCRIPT_EXTENSIONS};
pub use pid_list::{parse_pid_list, PidSet};
pub use port_args::{parse_ports, DEFAULT_MAX_RANGE_SPAN};
pub use process::{Listener, Pid, ProcessInfo, UNKNOWN};
