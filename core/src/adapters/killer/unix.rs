//! POSIX signal delivery.
//!
//! Uses the standard Unix signals:
//! - SIGTERM (15): Graceful termination request
//! - SIGKILL (9): Immediate forced termination
//! - signal 0: Liveness probe, delivers nothing

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid as NixPid;
use tracing::debug;

use crate::domain::Pid;
use crate::error::KillError;
use crate::ports::Signaller;

/// Delivers POSIX signals with `kill(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnixSignaller;

impl UnixSignaller {
    pub fn new() -> Self {
        Self
    }

    fn send(&self, pid: Pid, signal: Signal) -> Result<(), KillError> {
        debug!(pid = pid, signal = %signal, "Sending signal to process");

        kill(to_nix_pid(pid)?, signal).map_err(|errno| match errno {
            Errno::ESRCH => KillError::ProcessNotFound(pid),
            Errno::EPERM => KillError::PermissionDenied(pid),
            other => KillError::TerminationFailed(pid, other.desc().to_string()),
        })
    }
}

/// Convert to a kernel pid, refusing values that address more than one process.
///
/// `kill(2)` treats 0 and negative pids as process groups.
fn to_nix_pid(pid: Pid) -> Result<NixPid, KillError> {
    match i32::try_from(pid) {
        Ok(raw) if raw > 0 => Ok(NixPid::from_raw(raw)),
        _ => Err(KillError::InvalidPid(pid)),
    }
}

impl Signaller for UnixSignaller {
    async fn terminate(&self, pid: Pid) -> Result<(), KillError> {
        self.send(pid, Signal::SIGTERM)
    }

    async fn force(&self, pid: Pid) -> Result<(), KillError> {
        self.send(pid, Signal::SIGKILL)
    }

    fn is_alive(&self, pid: Pid) -> bool {
        let Ok(pid) = to_nix_pid(pid) else {
            return false;
        };
        // EPERM: the process exists but belongs to someone else.
        matches!(kill(pid, None), Ok(()) | Err(Errno::EPERM))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::killer::{KillTimings, Terminator};
    use crate::ports::ProcessKillerPort;

    const FAKE_PID: Pid = 999_999_999;

    #[test]
    fn test_is_alive_current_process() {
        assert!(UnixSignaller::new().is_alive(std::process::id()));
    }

    #[test]
    fn test_is_alive_nonexistent() {
        assert!(!UnixSignaller::new().is_alive(FAKE_PID));
    }

    #[test]
    fn test_rejects_group_addressing_pids() {
        assert!(matches!(to_nix_pid(0), Err(KillError::InvalidPid(0))));
        assert!(matches!(to_nix_pid(u32::MAX), Err(KillError::InvalidPid(_))));
        assert!(!UnixSignaller::new().is_alive(0));
    }

    #[tokio::test]
    async fn test_signal_nonexistent_process() {
        let result = UnixSignaller::new().terminate(FAKE_PID).await;
        assert!(matches!(result, Err(KillError::ProcessNotFound(FAKE_PID))));
    }

    #[tokio::test]
    async fn test_kill_nonexistent_process_reports_failure() {
        let terminator = Terminator::new(UnixSignaller::new(), KillTimings::default());
        let start = std::time::Instant::now();

        assert!(!terminator.kill_graceful(FAKE_PID).await);
        assert!(!terminator.kill_forceful(FAKE_PID).await);
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
    }
}
