//! POSIX process inspector using procfs (Linux), `ps` and `lsof`.

use std::path::PathBuf;

use tracing::debug;

use crate::adapters::procfs::ProcFs;
use crate::domain::{Pid, ProcessInfo};
use crate::ports::{CommandRunner, ProcessInspector};

use super::describe_command;

/// POSIX process inspector.
pub struct UnixInspector<C> {
    runner: C,
    procfs: Option<ProcFs>,
}

impl<C: CommandRunner> UnixInspector<C> {
    /// Create the inspector for the current POSIX flavour.
    pub fn new(runner: C) -> Self {
        if cfg!(target_os = "linux") {
            Self::with_procfs(runner, ProcFs::new())
        } else {
            Self::without_procfs(runner)
        }
    }

    /// Read procfs first, then fall back to the tools.
    pub fn with_procfs(runner: C, procfs: ProcFs) -> Self {
        Self {
            runner,
            procfs: Some(procfs),
        }
    }

    /// Use the tools only.
    pub fn without_procfs(runner: C) -> Self {
        Self {
            runner,
            procfs: None,
        }
    }

    async fn command_line(&self, pid: Pid) -> Option<String> {
        if let Some(cmdline) = self.procfs.as_ref().and_then(|procfs| procfs.cmdline(pid)) {
            return Some(cmdline);
        }

        // Executes: `ps -p <pid> -o args=`
        let pid_arg = pid.to_string();
        match self.runner.run("ps", &["-p", &pid_arg, "-o", "args="]).await {
            Ok(output) => {
                let command = output.trim();
                (!command.is_empty()).then(|| command.to_string())
            }
            Err(e) => {
                debug!(pid = pid, error = %e, "Failed to read command line");
                None
            }
        }
    }

    async fn cwd(&self, pid: Pid) -> Option<PathBuf> {
        if let Some(cwd) = self.procfs.as_ref().and_then(|procfs| procfs.cwd(pid)) {
            return Some(cwd);
        }

        // Executes: `lsof -p <pid> -Fn`
        let pid_arg = pid.to_string();
        match self.runner.run("lsof", &["-p", &pid_arg, "-Fn"]).await {
            Ok(output) => parse_lsof_cwd(&output),
            Err(e) => {
                debug!(pid = pid, error = %e, "Failed to read working directory");
                None
            }
        }
    }
}

impl<C: CommandRunner> ProcessInspector for UnixInspector<C> {
    async fn describe(&self, pid: Pid) -> ProcessInfo {
        let Some(command) = self.command_line(pid).await else {
            debug!(pid = pid, "No command line available");
            return ProcessInfo::unknown();
        };

        describe_command(command, || self.cwd(pid)).await
    }
}

/// Find the `cwd` record in `lsof -F` field output.
///
/// ```text
/// p4242
/// fcwd
/// n/home/dev/app
/// ftxt
/// n/usr/bin/node
/// ```
fn parse_lsof_cwd(output: &str) -> Option<PathBuf> {
    let mut lines = output.lines();
    while let Some(line) = lines.next() {
        if line == "fcwd" {
            return lines
                .next()
                .and_then(|name| name.strip_prefix('n'))
                .map(PathBuf::from);
        }
    }
    None
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::adapters::procfs::tests::fake_procfs;
    use crate::adapters::testing::ScriptedRunner;
    use std::fs;

    const LSOF_CWD: &str = "p4242\nfcwd\nn/home/dev/app\nftxt\nn/usr/bin/node\n";

    #[test]
    fn test_parse_lsof_cwd() {
        assert_eq!(parse_lsof_cwd(LSOF_CWD), Some(PathBuf::from("/home/dev/app")));
        assert_eq!(parse_lsof_cwd("p1\nftxt\nn/bin/sh\n"), None);
        assert_eq!(parse_lsof_cwd("p1\nfcwd\n"), None);
    }

    #[tokio::test]
    async fn test_describe_from_procfs() {
        let procfs = fake_procfs(None, &[]);
        let pid_dir = procfs.path().join("4242");
        fs::create_dir_all(&pid_dir).unwrap();
        fs::write(pid_dir.join("cmdline"), b"node\0--inspect\0src/server.js\0").unwrap();
        std::os::unix::fs::symlink("/srv/app", pid_dir.join("cwd")).unwrap();

        let runner = ScriptedRunner::new();
        let inspector = UnixInspector::with_procfs(&runner, ProcFs::with_root(procfs.path()));

        let info = inspector.describe(4242).await;
        assert_eq!(info.command.as_deref(), Some("node --inspect src/server.js"));
        assert_eq!(info.file_path.as_deref(), Some("/srv/app/src/server.js"));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_describe_falls_back_to_ps_and_lsof() {
        let runner = ScriptedRunner::new()
            .respond("ps -p 4242 -o args=", "python app.py\n")
            .respond("lsof -p 4242 -Fn", LSOF_CWD);
        let inspector = UnixInspector::without_procfs(&runner);

        let info = inspector.describe(4242).await;
        assert_eq!(info.command.as_deref(), Some("python app.py"));
        assert_eq!(info.file_path.as_deref(), Some("/home/dev/app/app.py"));
    }

    #[tokio::test]
    async fn test_describe_keeps_relative_path_without_cwd() {
        let runner = ScriptedRunner::new().respond("ps -p 7 -o args=", "ruby server.rb\n");
        let inspector = UnixInspector::without_procfs(&runner);

        let info = inspector.describe(7).await;
        assert_eq!(info.file_path.as_deref(), Some("server.rb"));
    }

    #[tokio::test]
    async fn test_describe_skips_cwd_for_bare_commands() {
        let runner = ScriptedRunner::new().respond("ps -p 9 -o args=", "nginx\n");
        let inspector = UnixInspector::without_procfs(&runner);

        let info = inspector.describe(9).await;
        assert_eq!(info.command.as_deref(), Some("nginx"));
        assert_eq!(info.file_path.as_deref(), Some("nginx"));
        assert!(!runner.called("lsof"));
    }

    #[tokio::test]
    async fn test_describe_unknown_process() {
        let procfs = fake_procfs(None, &[]);
        let runner = ScriptedRunner::new();
        let inspector = UnixInspector::with_procfs(&runner, ProcFs::with_root(procfs.path()));

        let info = inspector.describe(31337).await;
        assert!(info.is_unknown());
        assert_eq!(info.file_path_or_unknown(), "-");
    }
}
