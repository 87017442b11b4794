//! Process killer ports (interfaces).

use crate::domain::Pid;
use crate::error::KillError;

/// Port for killing processes.
///
/// Both operations report `true` only once the process is confirmed gone.
pub trait ProcessKillerPort: Send + Sync {
    /// Send the unconditional termination signal and wait for death.
    fn kill_forceful(&self, pid: Pid) -> impl std::future::Future<Output = bool> + Send;

    /// Request cooperative shutdown, escalating to a forceful kill if the
    /// process outlives the grace period.
    fn kill_graceful(&self, pid: Pid) -> impl std::future::Future<Output = bool> + Send;
}

/// Port for the raw, platform-specific signal primitives.
pub trait Signaller: Send + Sync {
    /// Deliver the cooperative termination request (SIGTERM, WM_CLOSE).
    fn terminate(
        &self,
        pid: Pid,
    ) -> impl std::future::Future<Output = Result<(), KillError>> + Send;

    /// Deliver the unconditional termination (SIGKILL, TerminateProcess).
    fn force(&self, pid: Pid)
        -> impl std::future::Future<Output = Result<(), KillError>> + Send;

    /// Probe liveness without affecting the process.
    fn is_alive(&self, pid: Pid) -> bool;

    /// Whether a cooperative request refused by a live process
    /// ([`KillError::CommandFailed`]) should go straight to the forceful kill
    /// instead of failing the graceful kill. A missing or protected process
    /// always fails.
    fn escalates_refused_terminate(&self) -> bool {
        false
    }
}
