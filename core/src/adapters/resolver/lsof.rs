//! `lsof` strategy: the authoritative listener lookup on POSIX systems.

use crate::domain::{parse_pid_list, Pid};
use crate::error::Result;
use crate::ports::CommandRunner;

/// Pids listening on TCP `port`.
///
/// Executes: `lsof -nP -t -iTCP:<port> -sTCP:LISTEN`
///
/// Flags explained:
/// - -n -P: no host or service name lookups
/// - -t: terse output, one pid per line
/// - -iTCP:<port>: only TCP sockets on the port
/// - -sTCP:LISTEN: only listening sockets
pub(super) async fn listening_pids<C: CommandRunner>(runner: &C, port: u16) -> Result<Vec<Pid>> {
    let filter = format!("-iTCP:{}", port);
    let output = runner
        .run("lsof", &["-nP", "-t", &filter, "-sTCP:LISTEN"])
        .await?;
    parse_pid_list(&output)
}
