//! Readers for the Linux process filesystem.
//!
//! Used when the inspection tools are missing, as in minimal containers.
//! Every read is a snapshot of a table that keeps changing underneath us:
//! processes vanishing mid-scan are skipped, never reported as errors.

use std::collections::HashSet;
use std::fs::{read_dir, read_link, read_to_string};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::domain::{Pid, PidSet};
use crate::error::{Error, Result};

const SOCKET_PREFIX: &str = "socket:[";

/// Socket tables, IPv4 first. The IPv6 table is only read when the IPv4 one is unavailable.
const TCP_TABLES: [&str; 2] = ["net/tcp", "net/tcp6"];

/// Column holding `local_address:port` in a socket table row.
const LOCAL_ADDRESS_COLUMN: usize = 1;

/// Column holding the socket inode in a socket table row.
const INODE_COLUMN: usize = 9;

/// A procfs mount.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcFs {
    /// The host procfs at `/proc`.
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// A procfs rooted elsewhere (for testing).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn pid_path(&self, pid: Pid) -> PathBuf {
        self.root.join(pid.to_string())
    }

    /// Pids owning a TCP socket bound to `port`.
    pub fn listening_pids(&self, port: u16) -> Result<Vec<Pid>> {
        let inodes = self.socket_inodes(port)?;
        if inodes.is_empty() {
            return Err(Error::NotFound(format!("no socket on port {} in procfs", port)));
        }
        debug!(port = port, inodes = inodes.len(), "Mapping socket inodes to processes");
        self.pids_for_inodes(&inodes)
            .into_found("no process owns the socket")
    }

    /// Inodes of sockets whose local port is `port`.
    pub fn socket_inodes(&self, port: u16) -> Result<HashSet<u64>> {
        let table = TCP_TABLES
            .iter()
            .find_map(|table| read_to_string(self.root.join(table)).ok())
            .ok_or_else(|| Error::NotFound("tcp socket table not available".to_string()))?;

        Ok(parse_socket_table(&table, port))
    }

    /// Scan every process's file descriptors for links to the given sockets.
    ///
    /// Processes are visited in ascending pid order.
    pub fn pids_for_inodes(&self, inodes: &HashSet<u64>) -> PidSet {
        let mut pids: Vec<Pid> = match read_dir(&self.root) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| entry.file_name().to_str()?.parse().ok())
                .collect(),
            Err(e) => {
                debug!(root = %self.root.display(), error = %e, "Cannot list processes");
                return PidSet::new();
            }
        };
        pids.sort_unstable();

        pids.into_iter()
            .filter(|&pid| self.holds_any_socket(pid, inodes))
            .collect()
    }

    fn holds_any_socket(&self, pid: Pid, inodes: &HashSet<u64>) -> bool {
        let Ok(fds) = read_dir(self.pid_path(pid).join("fd")) else {
            trace!(pid = pid, "Skipping process with unreadable fd table");
            return false;
        };

        fds.filter_map(|entry| entry.ok())
            .filter_map(|entry| read_link(entry.path()).ok())
            .filter_map(|link| socket_inode(&link))
            .any(|inode| inodes.contains(&inode))
    }

    /// Command line of `pid` with NUL separators turned into spaces.
    pub fn cmdline(&self, pid: Pid) -> Option<String> {
        let raw = std::fs::read(self.pid_path(pid).join("cmdline")).ok()?;
        let cmdline = String::from_utf8_lossy(&raw).replace('\0', " ");
        let cmdline = cmdline.trim();
        (!cmdline.is_empty()).then(|| cmdline.to_string())
    }

    /// Current working directory of `pid`.
    pub fn cwd(&self, pid: Pid) -> Option<PathBuf> {
        read_link(self.pid_path(pid).join("cwd")).ok()
    }
}

/// Collect inodes of rows in a `/proc/net/tcp{,6}` table whose local port is `port`.
///
/// ```text
///   sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
///    0: 00000000:0BB8 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 53001 1 ...
/// ```
fn parse_socket_table(table: &str, port: u16) -> HashSet<u64> {
    let hex_port = format!("{:04X}", port);

    table
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() <= INODE_COLUMN {
                return None;
            }
            let (_, local_port) = fields[LOCAL_ADDRESS_COLUMN].split_once(':')?;
            if !local_port.eq_ignore_ascii_case(&hex_port) {
                return None;
            }
            fields[INODE_COLUMN].parse().ok()
        })
        .filter(|&inode| inode != 0)
        .collect()
}

fn socket_inode(link: &Path) -> Option<u64> {
    let link = link.to_str()?;
    link.strip_prefix(SOCKET_PREFIX)?
        .strip_suffix(']')?
        .parse()
        .ok()
}

#[cfg(all(test, unix))]
pub(crate) mod tests {
    use super::*;
    use std::fs;

    pub(crate) const TCP_TABLE: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
   0: 00000000:0BB8 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 53001 1 0000000000000000 100 0 0 10 0
   1: 0100007F:1F90 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 53002 1 0000000000000000 100 0 0 10 0
   2: 0100007F:0bb8 0100007F:A2C4 01 00000000:00000000 00:00000000 00000000  1000        0 53003 1 0000000000000000 20 4 30 10 -1
   3: 0100007F:0BB8 0100007F:A2C6 06 00000000:00000000 03:00000ABC 00000000     0        0 0 3 0000000000000000
   garbage line
";

    /// Build a fake procfs with the given socket table and per-process fd links.
    pub(crate) fn fake_procfs(
        table: Option<(&str, &str)>,
        processes: &[(Pid, &[&str])],
    ) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        if let Some((name, content)) = table {
            fs::create_dir_all(dir.path().join("net")).unwrap();
            fs::write(dir.path().join("net").join(name), content).unwrap();
        }
        for (pid, links) in processes {
            let fd_dir = dir.path().join(pid.to_string()).join("fd");
            fs::create_dir_all(&fd_dir).unwrap();
            for (fd, target) in links.iter().enumerate() {
                std::os::unix::fs::symlink(target, fd_dir.join(fd.to_string())).unwrap();
            }
        }
        dir
    }

    #[test]
    fn test_parse_socket_table_matches_port_case_insensitively() {
        let inodes = parse_socket_table(TCP_TABLE, 3000);
        assert_eq!(inodes, HashSet::from([53001, 53003]));

        let inodes = parse_socket_table(TCP_TABLE, 8080);
        assert_eq!(inodes, HashSet::from([53002]));

        assert!(parse_socket_table(TCP_TABLE, 9999).is_empty());
    }

    #[test]
    fn test_socket_inode() {
        assert_eq!(socket_inode(Path::new("socket:[53001]")), Some(53001));
        assert_eq!(socket_inode(Path::new("pipe:[53001]")), None);
        assert_eq!(socket_inode(Path::new("/dev/null")), None);
        assert_eq!(socket_inode(Path::new("socket:[abc]")), None);
    }

    #[test]
    fn test_listening_pids_maps_inodes() {
        let dir = fake_procfs(
            Some(("tcp", TCP_TABLE)),
            &[
                (42, &["/dev/null", "socket:[53001]"]),
                (7, &["socket:[99999]", "pipe:[1]"]),
                (100, &["socket:[53003]", "socket:[53001]"]),
                (9, &["socket:[53002]"]),
            ],
        );
        fs::create_dir_all(dir.path().join("self")).unwrap();

        let procfs = ProcFs::with_root(dir.path());
        assert_eq!(procfs.listening_pids(3000).unwrap(), vec![42, 100]);
        assert_eq!(procfs.listening_pids(8080).unwrap(), vec![9]);
        assert!(procfs.listening_pids(9999).unwrap_err().is_not_found());
    }

    #[test]
    fn test_falls_back_to_ipv6_table() {
        let tcp6 = "  sl  local_address                         remote_address                        st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
   0: 00000000000000000000000000000000:1F90 00000000000000000000000000000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 61000 1 0000000000000000 100 0 0 10 0
";
        let dir = fake_procfs(Some(("tcp6", tcp6)), &[(300, &["socket:[61000]"])]);

        let procfs = ProcFs::with_root(dir.path());
        assert_eq!(procfs.listening_pids(8080).unwrap(), vec![300]);
    }

    #[test]
    fn test_missing_tables_is_not_found() {
        let dir = fake_procfs(None, &[]);
        let procfs = ProcFs::with_root(dir.path());
        assert!(procfs.listening_pids(3000).unwrap_err().is_not_found());
    }

    #[test]
    fn test_cmdline_and_cwd() {
        let dir = fake_procfs(None, &[]);
        let pid_dir = dir.path().join("55");
        fs::create_dir_all(&pid_dir).unwrap();
        fs::write(pid_dir.join("cmdline"), b"node\0--inspect\0server.js\0").unwrap();
        std::os::unix::fs::symlink("/srv/app", pid_dir.join("cwd")).unwrap();

        let procfs = ProcFs::with_root(dir.path());
        assert_eq!(procfs.cmdline(55).as_deref(), Some("node --inspect server.js"));
        assert_eq!(procfs.cwd(55), Some(PathBuf::from("/srv/app")));
        assert_eq!(procfs.cmdline(56), None);
        assert_eq!(procfs.cwd(56), None);
    }

    #[test]
    fn test_empty_cmdline_is_none() {
        let dir = fake_procfs(None, &[]);
        let pid_dir = dir.path().join("2");
        fs::create_dir_all(&pid_dir).unwrap();
        fs::write(pid_dir.join("cmdline"), b"").unwrap();

        assert_eq!(ProcFs::with_root(dir.path()).cmdline(2), None);
    }
}
