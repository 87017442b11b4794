//! Windows process inspector using `wmic` and `tasklist`.
//!
//! Windows offers no way to read another process's working directory, so
//! relative script paths are reported as they appear on the command line.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::domain::{Pid, ProcessInfo};
use crate::ports::{CommandRunner, ProcessInspector};

use super::describe_command;

/// Windows process inspector.
pub struct WindowsInspector<C> {
    runner: C,
}

impl<C: CommandRunner> WindowsInspector<C> {
    pub fn new(runner: C) -> Self {
        Self { runner }
    }

    /// Executes: `wmic process where processid=<pid> get commandline /value`
    async fn wmic_command_line(&self, pid: Pid) -> Option<String> {
        let filter = format!("processid={}", pid);
        match self
            .runner
            .run("wmic", &["process", "where", &filter, "get", "commandline", "/value"])
            .await
        {
            Ok(output) => parse_wmic_command_line(&output),
            Err(e) => {
                debug!(pid = pid, error = %e, "wmic failed");
                None
            }
        }
    }

    /// Executes: `tasklist /FI "PID eq <pid>" /FO CSV /NH`
    async fn tasklist_image_name(&self, pid: Pid) -> Option<String> {
        let filter = format!("PID eq {}", pid);
        match self
            .runner
            .run("tasklist", &["/FI", &filter, "/FO", "CSV", "/NH"])
            .await
        {
            Ok(output) => parse_tasklist_image_name(&output),
            Err(e) => {
                debug!(pid = pid, error = %e, "tasklist failed");
                None
            }
        }
    }
}

impl<C: CommandRunner> ProcessInspector for WindowsInspector<C> {
    async fn describe(&self, pid: Pid) -> ProcessInfo {
        if let Some(command) = self.wmic_command_line(pid).await {
            return describe_command(command, || async move {
                trace!(pid = pid, "Working directory lookup unsupported on Windows");
                None::<PathBuf>
            })
            .await;
        }

        // The image name alone says nothing about the file being run.
        match self.tasklist_image_name(pid).await {
            Some(image) => ProcessInfo::new(image, None),
            None => ProcessInfo::unknown(),
        }
    }
}

/// Read the `CommandLine=` record of `wmic ... /value` output.
///
/// ```text
///
/// CommandLine="C:\Program Files\nodejs\node.exe" server.js
///
/// ```
fn parse_wmic_command_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("CommandLine="))
        .filter(|command| !command.is_empty())
        .map(str::to_string)
}

/// Read the image name from the first CSV field of `tasklist /FO CSV /NH`.
///
/// ```text
/// "node.exe","5432","Console","1","45,000 K"
/// ```
fn parse_tasklist_image_name(output: &str) -> Option<String> {
    let line = output.trim();
    if line.is_empty() || line.contains("No tasks") {
        return None;
    }

    let first = line.split(',').next()?.trim_matches('"');
    (!first.is_empty()).then(|| first.to_string())
}
