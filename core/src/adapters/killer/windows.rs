//! Windows process termination.
//!
//! - `taskkill /PID xxx` for the graceful request (sends WM_CLOSE)
//! - `TerminateProcess` for forced termination
//! - `WaitForSingleObject` with a zero timeout as the liveness probe:
//!   a process handle is signalled once the process has exited

use tokio::process::Command;
use tracing::{debug, warn};
use windows::Win32::Foundation::{CloseHandle, E_ACCESSDENIED, HANDLE, WAIT_TIMEOUT};
use windows::Win32::System::Threading::{
    OpenProcess, TerminateProcess, WaitForSingleObject, PROCESS_ACCESS_RIGHTS, PROCESS_SYNCHRONIZE,
    PROCESS_TERMINATE,
};

use crate::domain::Pid;
use crate::error::KillError;
use crate::ports::Signaller;

/// Delivers termination requests through taskkill and the Win32 API.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsSignaller;

impl WindowsSignaller {
    pub fn new() -> Self {
        Self
    }
}

/// Owned process handle, closed on drop.
struct ProcessHandle(HANDLE);

impl ProcessHandle {
    fn open(pid: Pid, access: PROCESS_ACCESS_RIGHTS) -> windows::core::Result<Self> {
        // SAFETY: OpenProcess has no preconditions; failure is reported through the Result.
        unsafe { OpenProcess(access, false, pid) }.map(Self)
    }
}

/// `ERROR_ACCESS_DENIED` surfaces as `E_ACCESSDENIED` once wrapped in an HRESULT.
fn is_access_denied(err: &windows::core::Error) -> bool {
    err.code() == E_ACCESSDENIED
}

fn open_error(pid: Pid, err: &windows::core::Error) -> KillError {
    if is_access_denied(err) {
        KillError::PermissionDenied(pid)
    } else {
        KillError::ProcessNotFound(pid)
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // SAFETY: the handle came from OpenProcess and is closed exactly once.
        let _ = unsafe { CloseHandle(self.0) };
    }
}

impl Signaller for WindowsSignaller {
    /// Executes: `taskkill /PID <pid>`
    async fn terminate(&self, pid: Pid) -> Result<(), KillError> {
        debug!(pid = pid, "Executing taskkill");

        let output = Command::new("taskkill")
            .arg("/PID")
            .arg(pid.to_string())
            .output()
            .await?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let combined = format!("{} {}", stdout, stderr);

        if combined.contains("not found") || combined.contains("could not be found") {
            return Err(KillError::ProcessNotFound(pid));
        }

        if combined.contains("Access is denied") || combined.contains("access denied") {
            warn!(pid = pid, "Access denied to kill process");
            return Err(KillError::PermissionDenied(pid));
        }

        Err(KillError::CommandFailed(format!(
            "taskkill /PID {} failed: {}",
            pid,
            combined.trim()
        )))
    }

    async fn force(&self, pid: Pid) -> Result<(), KillError> {
        debug!(pid = pid, "Calling TerminateProcess");

        let handle =
            ProcessHandle::open(pid, PROCESS_TERMINATE).map_err(|e| open_error(pid, &e))?;

        // SAFETY: the handle is valid for the lifetime of `handle`.
        unsafe { TerminateProcess(handle.0, 1) }.map_err(|e| {
            if is_access_denied(&e) {
                KillError::PermissionDenied(pid)
            } else {
                KillError::TerminationFailed(pid, e.message().to_string())
            }
        })
    }

    fn is_alive(&self, pid: Pid) -> bool {
        match ProcessHandle::open(pid, PROCESS_SYNCHRONIZE) {
            Ok(handle) => {
                // SAFETY: the handle is valid for the lifetime of `handle`.
                let state = unsafe { WaitForSingleObject(handle.0, 0) };
                state == WAIT_TIMEOUT
            }
            // Access denied: the process exists but is protected or elevated.
            Err(e) => is_access_denied(&e),
        }
    }

    /// Console programs refuse WM_CLOSE, so a refused request from a live
    /// process goes straight to TerminateProcess.
    fn escalates_refused_terminate(&self) -> bool {
        true
    }
}
