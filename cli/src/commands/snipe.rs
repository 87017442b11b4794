//! Snipe command - find and kill the processes listening on ports.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::Result;
use serde::Serialize;
use snipe_core::ports::{ListenerResolver, ProcessInspector, ProcessKillerPort};
use snipe_core::{
    check_dependencies, parse_ports, Config, ConfigStore, Listener, PlatformSnipeService,
    SnipeService,
};
use tracing::{debug, warn};

use crate::output::Printer;

/// What to do with each process found on a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Kill without asking.
    Kill,
    /// Show the process and ask before killing it.
    Interactive,
    /// Show what would be killed.
    DryRun,
    /// Show the process only.
    List,
}

impl Mode {
    fn kills(self) -> bool {
        matches!(self, Mode::Kill | Mode::Interactive)
    }
}

#[derive(Debug, Clone)]
pub struct Options {
    pub ports: Vec<String>,
    pub mode: Mode,
    pub quiet: bool,
    pub graceful: bool,
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
enum Action {
    Found,
    DryRun,
    Killed,
    Skipped,
    Failed,
}

/// One line of the `--json` report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Outcome {
    #[serde(flatten)]
    listener: Listener,
    action: Action,
}

/// Per-run settings and sinks shared by every port.
struct Session<'a, W, In> {
    mode: Mode,
    quiet: bool,
    graceful: bool,
    printer: &'a mut Printer<W>,
    input: &'a mut In,
    report: Option<Vec<Outcome>>,
}

pub async fn run(options: &Options) -> Result<ExitCode> {
    let config = match ConfigStore::new() {
        Ok(store) => load_config(&store).await,
        Err(e) => {
            warn!(error = %e, "No config location, using defaults");
            Config::default()
        }
    };

    let ports = parse_ports(&options.ports, config.max_range_span)?;
    check_dependencies()?;

    let service = PlatformSnipeService::platform(config.kill_timings())?;
    let graceful = options.graceful || config.graceful;
    debug!(ports = ports.len(), mode = ?options.mode, graceful, "Sniping");

    let mut printer = Printer::stdout();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut session = Session {
        mode: options.mode,
        quiet: options.quiet || options.json,
        graceful,
        printer: &mut printer,
        input: &mut input,
        report: options.json.then(Vec::new),
    };

    let mut total = 0;
    for port in ports {
        total += snipe_port(&service, port, &mut session).await?;
    }

    if let Some(report) = session.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(exit_code(total, options.mode))
}

/// Read the user configuration. An unreadable file only costs the user
/// their overrides.
async fn load_config(store: &ConfigStore) -> Config {
    match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %store.path().display(), error = %e, "Ignoring config file");
            Config::default()
        }
    }
}

/// Handle every process listening on `port`. Returns how many were
/// killed, or in list and dry-run modes how many were shown.
async fn snipe_port<R, I, K, W, In>(
    service: &SnipeService<R, I, K>,
    port: u16,
    session: &mut Session<'_, W, In>,
) -> Result<usize>
where
    R: ListenerResolver,
    I: ProcessInspector,
    K: ProcessKillerPort,
    W: Write,
    In: BufRead,
{
    let listeners = service.listeners(port).await;
    if listeners.is_empty() {
        if !session.quiet {
            session.printer.not_found(port)?;
        }
        return Ok(0);
    }

    let mut count = 0;
    for listener in listeners {
        let action = match session.mode {
            Mode::List => {
                if !session.quiet {
                    session.printer.found(&listener)?;
                }
                count += 1;
                Action::Found
            }
            Mode::DryRun => {
                if !session.quiet {
                    session.printer.dry_run(&listener)?;
                }
                count += 1;
                Action::DryRun
            }
            Mode::Kill | Mode::Interactive => {
                if session.mode == Mode::Interactive {
                    session.printer.found(&listener)?;
                    if !session.printer.confirm("  kill?", &mut *session.input)? {
                        debug!(pid = listener.pid, "Skipped by user");
                        record(session, listener, Action::Skipped);
                        continue;
                    }
                }

                if service.kill(listener.pid, session.graceful).await {
                    if !session.quiet {
                        session.printer.killed(&listener)?;
                    }
                    count += 1;
                    Action::Killed
                } else {
                    if !session.quiet {
                        session.printer.kill_failed(&listener)?;
                    }
                    Action::Failed
                }
            }
        };
        record(session, listener, action);
    }

    Ok(count)
}

fn record<W, In>(session: &mut Session<'_, W, In>, listener: Listener, action: Action) {
    if let Some(report) = session.report.as_mut() {
        report.push(Outcome { listener, action });
    }
}

/// Killing modes fail when nothing died; list and dry-run always succeed.
fn exit_code(total: usize, mode: Mode) -> ExitCode {
    if succeeded(total, mode) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn succeeded(total: usize, mode: Mode) -> bool {
    total > 0 || !mode.kills()
}
