//! Listener resolver port (interface).

use crate::domain::Pid;
use crate::error::Result;

/// Port for mapping a TCP port to the processes listening on it.
///
/// Implementations handle platform-specific details (lsof, ss, procfs,
/// netstat) and their fallback order.
pub trait ListenerResolver: Send + Sync {
    /// Resolve the owning pids of `port`, deduplicated in first-seen order.
    ///
    /// Returns [`crate::Error::NotFound`] when nothing listens on the port.
    fn resolve(&self, port: u16) -> impl std::future::Future<Output = Result<Vec<Pid>>> + Send;
}
