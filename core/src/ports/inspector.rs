//! Process inspector port (interface).

use crate::domain::{Pid, ProcessInfo};

/// Port for reading descriptive metadata about a live process.
pub trait ProcessInspector: Send + Sync {
    /// Read the command line and file path of `pid`.
    ///
    /// Never fails: unreadable data comes back as unknown fields.
    fn describe(&self, pid: Pid) -> impl std::future::Future<Output = ProcessInfo> + Send;
}
