//! `ss` strategy: socket statistics with owning processes (Linux).

use regex::Regex;

use crate::domain::{Pid, PidSet};
use crate::error::{Error, Result};
use crate::ports::CommandRunner;

/// `pid=<digits>` entries inside the `users:((...))` column.
const PID_PATTERN: &str = r"pid=([^,)\s]*)";

/// Extracts owning pids from `ss -p` output.
#[derive(Debug, Clone)]
pub struct SsParser {
    pid_pattern: Regex,
}

impl SsParser {
    pub fn new() -> Result<Self> {
        let pid_pattern = Regex::new(PID_PATTERN)
            .map_err(|e| Error::ParseError(format!("Invalid ss pid pattern: {}", e)))?;
        Ok(Self { pid_pattern })
    }

    /// Pids listening on TCP `port`.
    ///
    /// Executes: `ss -tlnp sport = :<port>`
    ///
    /// Flags explained:
    /// -t, --tcp           display only TCP sockets
    /// -l, --listening     display listening sockets
    /// -n, --numeric       don't resolve service names
    /// -p, --processes     show process using socket
    pub async fn listening_pids<C: CommandRunner>(&self, runner: &C, port: u16) -> Result<Vec<Pid>> {
        let filter = format!(":{}", port);
        let output = runner
            .run("ss", &["-tlnp", "sport", "=", &filter])
            .await?;
        self.parse(&output)
    }

    /// Parse ss output into pids.
    ///
    /// Expected ss output format:
    /// ```text
    /// State  Recv-Q Send-Q Local Address:Port Peer Address:Port Process
    /// LISTEN 0      511          0.0.0.0:3000      0.0.0.0:*     users:(("node",pid=4242,fd=19))
    /// ```
    ///
    /// A socket shared by several processes lists every one of them.
    pub fn parse(&self, output: &str) -> Result<Vec<Pid>> {
        output
            .lines()
            .flat_map(|line| self.pid_pattern.captures_iter(line))
            .filter_map(|caps| caps[1].parse::<Pid>().ok())
            .collect::<PidSet>()
            .into_found("no pid in ss output")
    }
}
