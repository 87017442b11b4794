//! Snipe CLI - kill whatever is listening on a port
//!
//! Resolves each requested port to the processes listening on it, shows
//! what they are and terminates them, forcefully or with a grace period.

mod commands;
mod logging;
mod output;

use std::process::ExitCode;

use clap::{ArgAction, Parser};

use commands::snipe::{Mode, Options};

#[derive(Parser, Debug)]
#[command(name = "snipe")]
#[command(author, version, about = "Kill processes listening on a port")]
#[command(disable_version_flag = true)]
#[command(after_help = "Examples:\n  snipe 3000\n  snipe 3000 8080\n  snipe 3000-3005\n  snipe -l 3000\n  snipe -g 8080")]
struct Cli {
    /// Ports or ranges (3000, 3000-3005)
    #[arg(value_name = "PORT", required = true)]
    ports: Vec<String>,

    /// Show what would be killed without killing it
    #[arg(short, long)]
    dry_run: bool,

    /// List the listening processes only
    #[arg(short, long)]
    list: bool,

    /// Ask before each kill
    #[arg(short, long, conflicts_with = "json")]
    interactive: bool,

    /// Print nothing, report through the exit code
    #[arg(short, long, conflicts_with = "json")]
    quiet: bool,

    /// Ask politely first, force after the grace period
    #[arg(short, long)]
    graceful: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Log resolution and kill steps to stderr
    #[arg(long)]
    verbose: bool,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
}

impl Cli {
    fn options(&self) -> Options {
        let mode = if self.list {
            Mode::List
        } else if self.dry_run {
            Mode::DryRun
        } else if self.interactive {
            Mode::Interactive
        } else {
            Mode::Kill
        };

        Options {
            ports: self.ports.clone(),
            mode,
            quiet: self.quiet,
            graceful: self.graceful,
            json: self.json,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let options = cli.options();
    match commands::snipe::run(&options).await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "snipe failed");
            output::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
