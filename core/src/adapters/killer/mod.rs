//! Process termination with graceful-then-forceful escalation.
//!
//! # Graceful Kill Pattern
//!
//! 1. Send SIGTERM (or a close request on Windows)
//! 2. Poll for death every 50ms for up to 2s
//! 3. If still running, send SIGKILL (or TerminateProcess on Windows)
//! 4. Poll for death for up to 1s more
//!
//! A forceful kill is steps 3 and 4 alone. Success is only ever reported
//! once the process is observed gone.
//!
//! Pids are not reserved between lookup and kill: if the process exits and
//! its pid is reused in between, the new process receives the signal.

#[cfg(unix)]
mod unix;

#[cfg(windows)]
mod windows;

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::domain::Pid;
use crate::error::KillError;
use crate::ports::{ProcessKillerPort, Signaller};

#[cfg(unix)]
pub use unix::UnixSignaller;

#[cfg(windows)]
pub use windows::WindowsSignaller;

/// Signaller used on the current platform.
#[cfg(unix)]
pub type PlatformSignaller = UnixSignaller;

#[cfg(windows)]
pub type PlatformSignaller = WindowsSignaller;

/// Terminator used on the current platform.
pub type PlatformTerminator = Terminator<PlatformSignaller>;

/// Create the terminator for the current platform.
pub fn platform_terminator(timings: KillTimings) -> PlatformTerminator {
    Terminator::new(PlatformSignaller::new(), timings)
}

/// Deadlines governing the kill sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillTimings {
    /// How long a process gets to exit after the cooperative request.
    pub grace_period: Duration,
    /// How long to wait for death after the unconditional kill.
    pub force_wait: Duration,
    /// Pause between liveness probes.
    pub poll_interval: Duration,
}

impl Default for KillTimings {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_secs(2),
            force_wait: Duration::from_secs(1),
            poll_interval: Duration::from_millis(50),
        }
    }
}

/// Poll `is_alive` until it reports the process gone or `timeout` elapses.
///
/// Returns `true` as soon as the process is gone. The last probe happens at
/// the deadline, so this never waits longer than `timeout`.
pub async fn wait_dead(is_alive: impl Fn() -> bool, timeout: Duration, interval: Duration) -> bool {
    let deadline = Instant::now() + timeout;

    loop {
        if !is_alive() {
            return true;
        }

        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        sleep(interval.min(deadline - now)).await;
    }
}

/// Drives a [`Signaller`] through the kill sequence.
pub struct Terminator<S> {
    signaller: S,
    timings: KillTimings,
}

impl<S: Signaller> Terminator<S> {
    pub fn new(signaller: S, timings: KillTimings) -> Self {
        Self { signaller, timings }
    }

    async fn wait_dead(&self, pid: Pid, timeout: Duration) -> bool {
        let dead = wait_dead(
            || self.signaller.is_alive(pid),
            timeout,
            self.timings.poll_interval,
        )
        .await;
        debug!(pid = pid, dead = dead, timeout_ms = timeout.as_millis() as u64, "Finished waiting for exit");
        dead
    }
}

impl<S: Signaller> ProcessKillerPort for Terminator<S> {
    async fn kill_forceful(&self, pid: Pid) -> bool {
        debug!(pid = pid, "Force killing process");

        if let Err(e) = self.signaller.force(pid).await {
            warn!(pid = pid, error = %e, "Failed to force kill");
            return false;
        }

        self.wait_dead(pid, self.timings.force_wait).await
    }

    async fn kill_graceful(&self, pid: Pid) -> bool {
        debug!(pid = pid, "Attempting graceful kill");

        match self.signaller.terminate(pid).await {
            Ok(()) => {
                if self.wait_dead(pid, self.timings.grace_period).await {
                    return true;
                }
                debug!(pid = pid, "Process outlived grace period, escalating");
            }
            Err(e @ KillError::CommandFailed(_))
                if self.signaller.escalates_refused_terminate() =>
            {
                debug!(pid = pid, error = %e, "Graceful request refused, escalating");
            }
            Err(e) => {
                warn!(pid = pid, error = %e, "Failed to request graceful shutdown");
                return false;
            }
        }

        // The process may exit between the probe and the signal; the wait below decides.
        if let Err(e) = self.signaller.force(pid).await {
            debug!(pid = pid, error = %e, "Escalation signal not delivered");
        }

        self.wait_dead(pid, self.timings.force_wait).await
    }
}
