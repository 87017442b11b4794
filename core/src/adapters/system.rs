//! Access to external tools: spawning them and locating them on `PATH`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::trace;

use crate::error::{Error, Result};
use crate::ports::CommandRunner;

/// Runs real programs with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        trace!(program = program, args = ?args, "Running command");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run {}: {}", program, e)))?;

        if !output.status.success() {
            return Err(Error::CommandFailed(format!(
                "{} exited with {}",
                program, output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Locate an executable named `name` on `PATH`.
pub fn find_program(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    find_in(&path, name)
}

/// Locate an executable named `name` in a `PATH`-style directory list.
pub fn find_in(path_var: &OsStr, name: &str) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Verify that at least one listener-inspection tool is installed.
///
/// On POSIX systems `lsof` is required, with `ss` accepted instead on Linux.
/// Windows ships everything needed.
pub fn check_dependencies() -> Result<()> {
    check_dependencies_with(|name| find_program(name).is_some())
}

fn check_dependencies_with(has_program: impl Fn(&str) -> bool) -> Result<()> {
    if cfg!(windows) || has_program("lsof") {
        return Ok(());
    }

    if cfg!(target_os = "linux") {
        if has_program("ss") {
            return Ok(());
        }
        return Err(Error::ToolUnavailable(
            "lsof or ss required, install one: apt install lsof".to_string(),
        ));
    }

    Err(Error::ToolUnavailable("lsof not found".to_string()))
}
