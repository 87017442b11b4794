//! Windows listener lookup using `netstat`.

use tracing::debug;

use crate::domain::{Pid, PidSet};
use crate::error::Result;
use crate::ports::{CommandRunner, ListenerResolver};

/// Resolves listeners from `netstat -ano`.
pub struct NetstatResolver<C> {
    runner: C,
}

impl<C: CommandRunner> NetstatResolver<C> {
    pub fn new(runner: C) -> Self {
        Self { runner }
    }
}

impl<C: CommandRunner> ListenerResolver for NetstatResolver<C> {
    /// Executes: `netstat -ano`
    async fn resolve(&self, port: u16) -> Result<Vec<Pid>> {
        let output = self.runner.run("netstat", &["-ano"]).await?;
        let pids = parse_netstat_output(&output, port)?;
        debug!(port = port, strategy = "netstat", count = pids.len(), "Resolved listeners");
        Ok(pids)
    }
}

/// Pids of `LISTENING` rows whose local address ends in `:<port>`.
///
/// Example output:
/// ```text
/// Active Connections
///
///   Proto  Local Address          Foreign Address        State           PID
///   TCP    0.0.0.0:135            0.0.0.0:0              LISTENING       1020
///   TCP    [::]:445               [::]:0                 LISTENING       4
///   TCP    127.0.0.1:3000         0.0.0.0:0              LISTENING       5432
/// ```
fn parse_netstat_output(output: &str, port: u16) -> Result<Vec<Pid>> {
    let suffix = format!(":{}", port);

    output
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 || !fields[3].eq_ignore_ascii_case("LISTENING") {
                return None;
            }
            if !fields[1].ends_with(&suffix) {
                return None;
            }
            fields.last()?.parse::<Pid>().ok()
        })
        .collect::<PidSet>()
        .into_found("no listener in netstat output")
}
