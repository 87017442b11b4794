//! Adapters layer - Operating system implementations.
//!
//! This module contains implementations of the port traits defined in `ports`.
//! Each adapter handles communication with the OS or its inspection tools.

pub mod inspector;
pub mod killer;
pub mod procfs;
pub mod resolver;
pub mod system;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use inspector::{platform_inspector, PlatformInspector, UnixInspector, WindowsInspector};
pub use killer::{platform_terminator, wait_dead, KillTimings, PlatformTerminator, Terminator};
pub use procfs::ProcFs;
pub use resolver::{platform_resolver, NetstatResolver, PlatformResolver, SsParser, UnixResolver};
pub use system::{check_dependencies, find_program, SystemCommandRunner};
