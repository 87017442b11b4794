//! Listener resolver adapters.
//!
//! Platform-specific strategy chains mapping a TCP port to its owning pids.
//! Fast, authoritative sources are tried first:
//! - POSIX: `lsof`
//! - Linux: `lsof`, then `ss`, then the raw procfs socket tables
//! - Windows: `netstat`

mod lsof;
mod netstat;
mod ss;

use tracing::debug;

use crate::adapters::procfs::ProcFs;
use crate::adapters::system::SystemCommandRunner;
use crate::domain::Pid;
use crate::error::{Error, Result};
use crate::ports::{CommandRunner, ListenerResolver};

pub use netstat::NetstatResolver;
pub use ss::SsParser;

/// Resolver used on the current platform.
#[cfg(unix)]
pub type PlatformResolver = UnixResolver<SystemCommandRunner>;

#[cfg(windows)]
pub type PlatformResolver = NetstatResolver<SystemCommandRunner>;

/// Create the resolver for the current platform.
pub fn platform_resolver() -> Result<PlatformResolver> {
    #[cfg(unix)]
    {
        UnixResolver::new(SystemCommandRunner::new())
    }

    #[cfg(windows)]
    {
        Ok(NetstatResolver::new(SystemCommandRunner::new()))
    }
}

/// Fallbacks for when `lsof` is missing or finds nothing.
struct LinuxFallbacks {
    ss: SsParser,
    procfs: ProcFs,
}

/// POSIX resolver: `lsof` first, with the Linux fallbacks when enabled.
pub struct UnixResolver<C> {
    runner: C,
    linux: Option<LinuxFallbacks>,
}

impl<C: CommandRunner> UnixResolver<C> {
    /// Create the resolver for the current POSIX flavour.
    pub fn new(runner: C) -> Result<Self> {
        if cfg!(target_os = "linux") {
            Self::with_linux_fallbacks(runner, ProcFs::new())
        } else {
            Ok(Self::lsof_only(runner))
        }
    }

    /// Resolve with `lsof` alone.
    pub fn lsof_only(runner: C) -> Self {
        Self {
            runner,
            linux: None,
        }
    }

    /// Resolve with `lsof`, then `ss`, then the socket tables under `procfs`.
    pub fn with_linux_fallbacks(runner: C, procfs: ProcFs) -> Result<Self> {
        Ok(Self {
            runner,
            linux: Some(LinuxFallbacks {
                ss: SsParser::new()?,
                procfs,
            }),
        })
    }
}

impl<C: CommandRunner> ListenerResolver for UnixResolver<C> {
    async fn resolve(&self, port: u16) -> Result<Vec<Pid>> {
        let result = lsof::listening_pids(&self.runner, port).await;
        if let Some(pids) = accept(port, "lsof", result) {
            return Ok(pids);
        }

        if let Some(linux) = &self.linux {
            let result = linux.ss.listening_pids(&self.runner, port).await;
            if let Some(pids) = accept(port, "ss", result) {
                return Ok(pids);
            }

            let result = linux.procfs.listening_pids(port);
            if let Some(pids) = accept(port, "procfs", result) {
                return Ok(pids);
            }
        }

        Err(Error::NotFound(format!("no process listening on port {}", port)))
    }
}

/// Keep a strategy's result if it found anything, logging the fall-through otherwise.
fn accept(port: u16, strategy: &str, result: Result<Vec<Pid>>) -> Option<Vec<Pid>> {
    match result {
        Ok(pids) if !pids.is_empty() => {
            debug!(port = port, strategy = strategy, count = pids.len(), "Resolved listeners");
            Some(pids)
        }
        Ok(_) => {
            debug!(port = port, strategy = strategy, "Strategy found nothing, falling back");
            None
        }
        Err(e) => {
            debug!(port = port, strategy = strategy, error = %e, "Strategy failed, falling back");
            None
        }
    }
}
