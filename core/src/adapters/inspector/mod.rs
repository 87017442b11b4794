//! Process metadata adapters.
//!
//! Read a live process's command line, pick the file it runs, and anchor
//! relative file names at the process's working directory where the
//! platform allows looking it up.

mod unix;
mod windows;

use std::path::{Path, PathBuf};

use crate::adapters::system::SystemCommandRunner;
use crate::domain::{extract_path, looks_like_file, ProcessInfo};
use crate::error::Result;

pub use unix::UnixInspector;
pub use windows::WindowsInspector;

/// Inspector used on the current platform.
#[cfg(unix)]
pub type PlatformInspector = UnixInspector<SystemCommandRunner>;

#[cfg(windows)]
pub type PlatformInspector = WindowsInspector<SystemCommandRunner>;

/// Create the inspector for the current platform.
pub fn platform_inspector() -> Result<PlatformInspector> {
    #[cfg(unix)]
    {
        Ok(UnixInspector::new(SystemCommandRunner::new()))
    }

    #[cfg(windows)]
    {
        Ok(WindowsInspector::new(SystemCommandRunner::new()))
    }
}

/// Whether the path extracted from a command line should be joined onto the
/// process's working directory.
fn needs_cwd(file_path: &str) -> bool {
    !Path::new(file_path).is_absolute() && looks_like_file(file_path)
}

/// Join a relative file path onto a working directory, dropping `.` components.
fn anchor(cwd: &Path, file_path: &str) -> String {
    cwd.join(file_path)
        .components()
        .collect::<PathBuf>()
        .to_string_lossy()
        .into_owned()
}

/// Build process info from a command line, resolving the extracted path with `cwd`.
async fn describe_command<F, Fut>(command: String, cwd: F) -> ProcessInfo
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Option<PathBuf>>,
{
    let mut file_path = extract_path(&command).to_string();

    if needs_cwd(&file_path) {
        if let Some(dir) = cwd().await {
            file_path = anchor(&dir, &file_path);
        }
    }

    ProcessInfo::new(command, Some(file_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_needs_cwd() {
        assert!(needs_cwd("server.js"));
        assert!(needs_cwd("src/index.js"));
        assert!(!needs_cwd("/app/server.js"));
        assert!(!needs_cwd("node"));
        assert!(!needs_cwd("redis-server"));
    }

    #[cfg(unix)]
    #[test]
    fn test_anchor_normalizes_current_dir() {
        assert_eq!(anchor(Path::new("/srv/app"), "server.js"), "/srv/app/server.js");
        assert_eq!(anchor(Path::new("/srv/app"), "./src/index.js"), "/srv/app/src/index.js");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_describe_command_only_looks_up_cwd_when_needed() {
        let mut looked_up = false;
        let info = describe_command("node /app/server.js".to_string(), || {
            looked_up = true;
            async { None::<PathBuf> }
        })
        .await;
        assert!(!looked_up);
        assert_eq!(info.file_path.as_deref(), Some("/app/server.js"));

        let info = describe_command("python app.py".to_string(), || async { None::<PathBuf> }).await;
        assert_eq!(info.file_path.as_deref(), Some("app.py"));
    }
}
