//! Diagnostic logging.
//!
//! Everything goes to stderr so stdout stays clean for the kill report
//! and `--json` output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive, e.g. `snipe_core=trace`.
pub const LOG_ENV: &str = "SNIPE_LOG";

/// Initialize the global subscriber.
///
/// `--verbose` forces debug level; otherwise `SNIPE_LOG` applies, falling
/// back to warnings only.
pub fn init(verbose: bool) {
    let filter = filter(verbose, std::env::var(LOG_ENV).ok().as_deref());

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(atty::is(atty::Stream::Stderr));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}

fn filter(verbose: bool, directive: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
